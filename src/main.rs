use std::process::ExitCode;

use coi_serve::config::Config;
use coi_serve::server::{self, Server};
use coi_serve::{logger, ServeError};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ServeError> {
    let cfg = Config::load()?;

    // 创建 Tokio 运行时，根据 workers 配置设置线程数
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), ServeError> {
    logger::init(&cfg)?;

    let server = Server::bind(cfg)?;
    let addr = server.local_addr();

    logger::log_banner(&addr);
    logger::log_server_config(&addr, &server.state().config, &server.state().root);

    server.run(server::shutdown_signal()).await;

    logger::log_shutdown();
    Ok(())
}
