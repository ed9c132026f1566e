use std::sync::Arc;

use quill::config::Config;
use quill::server::{console, listener};
use quill::state::AppState;
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(cfg.worker_threads)
        .enable_all()
        .build()?;

    // Dropping the runtime on return abandons in-flight sessions rather
    // than draining them.
    runtime.block_on(serve(cfg))
}

async fn serve(cfg: Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(&cfg));
    let commands = console::spawn_stdin_reader();

    tokio::select! {
        res = listener::run(&cfg, state.clone()) => {
            res?;
        }

        _ = console::run(commands, state.clone()) => {
            info!("Terminate requested from console");
        }

        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
