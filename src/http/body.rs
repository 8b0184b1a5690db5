//! Response body types
//!
//! Small pages are buffered; files are read off disk in chunks so large
//! assets never sit in memory whole.

use futures_util::stream;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Body type of every response the server produces
pub type ResponseBody = UnsyncBoxBody<Bytes, std::io::Error>;

const CHUNK_SIZE: usize = 64 * 1024;

/// Buffered body
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn empty() -> ResponseBody {
    full(Bytes::new())
}

/// Body that streams `file` from its current position to EOF
pub fn file_body(file: File) -> ResponseBody {
    let chunks = stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0; CHUNK_SIZE];
        let n = file.read(&mut buf).await?;
        if n == 0 {
            return Ok::<_, std::io::Error>(None);
        }
        buf.truncate(n);
        Ok(Some((Frame::data(Bytes::from(buf)), file)))
    });

    StreamBody::new(chunks).boxed_unsync()
}
