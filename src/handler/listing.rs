//! Directory listing module
//!
//! Renders the HTML index shown for directories that have no index file.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::Write;
use std::path::Path;
use tokio::fs;

use crate::http::response::escape_html;

/// Characters left as-is in listing links: unreserved plus `/`
const LINK_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Text shown to the user: `dir/` for directories, `name@` for symlinks
    fn display_name(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Relative link target; directories keep the trailing slash so the
    /// browser does not need the redirect
    fn link(&self) -> String {
        let target = if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        };
        utf8_percent_encode(&target, LINK_ENCODE_SET).to_string()
    }
}

/// Read the entries of `dir`, sorted case-insensitively by name
///
/// Entries whose names are not valid UTF-8 are skipped.
pub async fn read_listing(dir: &Path) -> std::io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let file_type = entry.file_type().await?;
        // Follow symlinks to decide whether the target is a directory
        let is_dir = if file_type.is_symlink() {
            fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir())
        } else {
            file_type.is_dir()
        };

        entries.push(ListingEntry {
            name,
            is_dir,
            is_symlink: file_type.is_symlink(),
        });
    }

    entries.sort_by_cached_key(|entry| entry.name.to_lowercase());
    Ok(entries)
}

/// Render the listing page
///
/// # Arguments
/// * `display_path` - Decoded request path shown in the title, e.g. `/assets/`
/// * `entries` - Directory entries in display order
pub fn render_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));

    let mut html = String::new();
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>\n</head>\n<body>");
    let _ = writeln!(html, "<h1>{title}</h1>");
    html.push_str("<hr>\n<ul>\n");
    for entry in entries {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            entry.link(),
            escape_html(&entry.display_name())
        );
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, is_symlink: bool) -> ListingEntry {
        ListingEntry {
            name: name.to_string(),
            is_dir,
            is_symlink,
        }
    }

    #[test]
    fn test_render_listing() {
        let html = render_listing(
            "/assets/",
            &[
                entry("fonts", true, false),
                entry("logo.svg", false, false),
            ],
        );
        assert!(html.contains("<title>Directory listing for /assets/</title>"));
        assert!(html.contains("<li><a href=\"fonts/\">fonts/</a></li>"));
        assert!(html.contains("<li><a href=\"logo.svg\">logo.svg</a></li>"));
    }

    #[test]
    fn test_names_are_encoded_and_escaped() {
        let html = render_listing("/<x>/", &[entry("a b&c<d>.txt", false, false)]);
        assert!(html.contains("href=\"a%20b%26c%3Cd%3E.txt\""));
        assert!(html.contains(">a b&amp;c&lt;d&gt;.txt</a>"));
        assert!(html.contains("Directory listing for /&lt;x&gt;/"));
    }

    #[test]
    fn test_symlink_display() {
        let html = render_listing("/", &[entry("models", true, true)]);
        assert!(html.contains("<a href=\"models/\">models@</a>"));
    }

    #[tokio::test]
    async fn test_read_listing_sorted_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("A.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("c")).unwrap();

        let entries = read_listing(dir.path()).await.unwrap();
        assert_eq!(
            entries,
            vec![
                entry("A.txt", false, false),
                entry("b.txt", false, false),
                entry("c", true, false),
            ]
        );
    }

    #[tokio::test]
    async fn test_read_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_listing(&dir.path().join("gone")).await.is_err());
    }
}
