use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::config::Config;
use crate::http::session;
use crate::server::tls;
use crate::state::AppState;

/// Binds the listen socket and accepts connections until the server stops.
///
/// Each accepted connection becomes one spawned session task; a session
/// failing never unwinds back to the accept loop.
pub async fn run(cfg: &Config, state: Arc<AppState>) -> anyhow::Result<()> {
    let acceptor = tls::build_acceptor(&cfg.cert_path, &cfg.key_path)?;
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on {}", cfg.listen_addr);

    loop {
        let (socket, peer) = listener.accept().await?;
        debug!(peer = %peer, "Accepted connection");

        let acceptor = acceptor.clone();
        let state = state.clone();
        tokio::spawn(async move {
            session::run_tls(acceptor, socket, state).await;
        });
    }
}
