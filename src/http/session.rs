//! Per-connection protocol state machine.
//!
//! One session is one spawned task owning one TLS stream. The task drives an
//! explicit state value through handshake, read, dispatch, write, and
//! shutdown; because the task is the only place the session's stream and
//! buffers are touched, no two operations of the same session can ever run
//! concurrently, while different sessions run in parallel across the
//! runtime's worker threads.

use std::io;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, warn};

use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::{Method, Request, form_fields};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::state::AppState;

/// Value of the fixed server-identification header.
const SERVER_NAME: &str = "quill";

/// Upper bound on a buffered request before the connection is dropped.
const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Accepts the TLS handshake, then drives the session to completion.
///
/// A connection that fails the handshake is logged and dropped without ever
/// reaching the dispatch loop.
pub async fn run_tls(acceptor: TlsAcceptor, socket: TcpStream, ctx: Arc<AppState>) {
    let stream = match acceptor.accept(socket).await {
        Ok(stream) => stream,
        Err(e) => {
            debug!(error = %e, "TLS handshake failed");
            return;
        }
    };

    let _live = LiveSession::track(&ctx);
    Session::new(stream, ctx).run().await;
}

/// The state machine and resources for one connection.
pub struct Session<S> {
    stream: S,
    buffer: BytesMut,
    state: SessionState,
    /// The session's bound anti-forgery token, at most one at a time.
    token: Option<String>,
    authorized: bool,
    ctx: Arc<AppState>,
}

enum SessionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closing,
    Closed,
}

/// Outcome of one wait for a complete request.
enum ReadEvent {
    Request(Request),
    Eof,
    /// Peer closed without a TLS close_notify; a normal close, not an error.
    TruncatedClose,
    Failed(io::Error),
    Malformed(ParseError),
}

impl<S: AsyncRead + AsyncWrite + Unpin> Session<S> {
    pub fn new(stream: S, ctx: Arc<AppState>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            state: SessionState::Reading,
            token: None,
            authorized: false,
            ctx,
        }
    }

    /// Drives the state machine until the connection is closed.
    ///
    /// Requests and responses alternate strictly: the next request is not
    /// read until the previous response has been written in full. Errors
    /// stay inside the session; none propagate to the listener.
    pub async fn run(mut self) {
        loop {
            self.state = match std::mem::replace(&mut self.state, SessionState::Closed) {
                SessionState::Reading => self.read_state().await,
                SessionState::Processing(request) => {
                    let response = self.dispatch(&request);
                    SessionState::Writing(ResponseWriter::new(&response))
                }
                SessionState::Writing(mut writer) => {
                    match writer.write_to_stream(&mut self.stream).await {
                        Ok(()) => SessionState::Reading,
                        Err(e) => {
                            warn!(error = %e, "Write failed");
                            SessionState::Closing
                        }
                    }
                }
                SessionState::Closing => {
                    // Graceful shutdown sends close_notify on TLS streams.
                    // Logged but never retried.
                    if let Err(e) = self.stream.shutdown().await {
                        debug!(error = %e, "Shutdown error");
                    }
                    SessionState::Closed
                }
                SessionState::Closed => break,
            };
        }
        self.ctx.tokens.revoke(self.token.take());
    }

    /// One `Reading` wait under the idle deadline.
    ///
    /// The deadline is re-armed on every entry and dropped when the read
    /// completes first, so a stale expiry can never fire for a finished
    /// wait. An expiry revokes the session token and forces `Closing`.
    async fn read_state(&mut self) -> SessionState {
        match timeout(self.ctx.idle_timeout, self.next_event()).await {
            Err(_) => {
                debug!("Idle deadline expired");
                self.ctx.tokens.revoke(self.token.take());
                SessionState::Closing
            }
            Ok(ReadEvent::Request(request)) => SessionState::Processing(request),
            Ok(ReadEvent::Eof) => {
                debug!("End of stream");
                SessionState::Closing
            }
            Ok(ReadEvent::TruncatedClose) => {
                debug!("Peer closed without close_notify");
                SessionState::Closing
            }
            Ok(ReadEvent::Failed(e)) => {
                warn!(error = %e, "Read failed");
                SessionState::Closing
            }
            Ok(ReadEvent::Malformed(e)) => {
                warn!(error = ?e, "Malformed request");
                SessionState::Closing
            }
        }
    }

    /// Reads until the buffer holds one complete request.
    async fn next_event(&mut self) -> ReadEvent {
        loop {
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return ReadEvent::Request(request);
                }
                Err(ParseError::Incomplete) => {}
                Err(e) => return ReadEvent::Malformed(e),
            }

            if self.buffer.len() > MAX_REQUEST_BYTES {
                return ReadEvent::Failed(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "buffered request too large",
                ));
            }

            match self.stream.read_buf(&mut self.buffer).await {
                Ok(0) => return ReadEvent::Eof,
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return ReadEvent::TruncatedClose;
                }
                Err(e) => return ReadEvent::Failed(e),
            }
        }
    }

    /// Produces the response for one request.
    pub fn dispatch(&mut self, request: &Request) -> Response {
        let builder = match &request.method {
            Method::GET => self.get_response(request),
            Method::POST => self.post_response(request),
            other => ResponseBuilder::new(StatusCode::BadRequest)
                .header("Content-Type", "text/plain")
                .body(format!("Invalid request method '{}'", other.as_str()).into_bytes()),
        };

        builder
            .header("Server", SERVER_NAME)
            .header("Connection", "keep-alive")
            .build()
    }

    fn get_response(&mut self, request: &Request) -> ResponseBuilder {
        if forbidden_path(&request.path) {
            return self.page(StatusCode::Forbidden, "403.html");
        }

        if let Some(body) = self.ctx.blogs.serve(&request.path) {
            return html(StatusCode::Ok).body(body);
        }

        match request.path.as_str() {
            "/" => self.page(StatusCode::Ok, "index.html"),
            "/favicon.ico" => ResponseBuilder::new(StatusCode::Ok)
                .header("Content-Type", "image/vnd.microsoft.icon")
                .body(self.ctx.pages.load("favicon.ico")),
            "/about" => self.page(StatusCode::Ok, "about.html"),
            "/blogs" => self.page(StatusCode::Ok, "blogs.html"),
            // Every other target lands on the login/admin branch; the server
            // has no 404 arm for GET.
            _ => self.protected_page(),
        }
    }

    fn post_response(&mut self, request: &Request) -> ResponseBuilder {
        if forbidden_path(&request.path) {
            return self.page(StatusCode::Forbidden, "403.html");
        }

        let body = String::from_utf8_lossy(&request.body).into_owned();
        if !self.ctx.tokens.validate(self.token.as_deref(), &body) {
            // A mismatched or missing token answers 404, the same weak
            // signal an unknown action gets.
            return self.page(StatusCode::NotFound, "404.html");
        }

        if self.authorized {
            match request.path.as_str() {
                "/logout" => {
                    self.authorized = false;
                    self.ctx.tokens.revoke(self.token.take());
                    let template = self.ctx.pages.load("login.html");
                    html(StatusCode::Ok).body(self.ctx.tokens.render(None, &template))
                }
                "/addblog" => {
                    self.ctx.blogs.create_from_submission(&body);
                    self.page(StatusCode::Ok, "admin.html")
                }
                "/removeblog" => {
                    self.ctx.blogs.remove_from_submission(&body);
                    self.page(StatusCode::Ok, "admin.html")
                }
                _ => self.page(StatusCode::NotFound, "404.html"),
            }
        } else if request.path == "/checkcreds" {
            let fields = form_fields(&body);
            let usr = fields.get("usr").copied().unwrap_or_default();
            let pwd = fields.get("pwd").copied().unwrap_or_default();

            if self.ctx.credential.matches(usr, pwd) {
                self.authorized = true;
                self.protected_page()
            } else {
                // Re-render with the existing token; no new token is minted
                // and no lockout applies.
                let template = self.ctx.pages.load("login.html");
                html(StatusCode::Ok).body(self.ctx.tokens.render(self.token.as_deref(), &template))
            }
        } else {
            self.page(StatusCode::NotFound, "404.html")
        }
    }

    /// Serves the admin page when authorized, the login page otherwise, and
    /// binds a freshly minted token to the exact bytes served.
    fn protected_page(&mut self) -> ResponseBuilder {
        let name = if self.authorized { "admin.html" } else { "login.html" };
        let template = self.ctx.pages.load(name);
        let (token, rendered) = self.ctx.tokens.mint(self.token.take(), &template);
        self.token = Some(token);
        html(StatusCode::Ok).body(rendered)
    }

    fn page(&self, status: StatusCode, name: &str) -> ResponseBuilder {
        html(status).body(self.ctx.pages.load(name))
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    pub fn bound_token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

fn html(status: StatusCode) -> ResponseBuilder {
    ResponseBuilder::new(status).header("Content-Type", "text/html")
}

/// Rejects empty targets, targets not rooted at `/`, and targets containing
/// a parent-directory sequence.
pub fn forbidden_path(path: &str) -> bool {
    path.is_empty() || !path.starts_with('/') || path.contains("..")
}

/// Keeps the live session count accurate for the console, whichever way the
/// session ends.
struct LiveSession(Arc<AppState>);

impl LiveSession {
    fn track(ctx: &Arc<AppState>) -> Self {
        ctx.sessions.fetch_add(1, Ordering::Relaxed);
        Self(ctx.clone())
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        self.0.sessions.fetch_sub(1, Ordering::Relaxed);
    }
}
