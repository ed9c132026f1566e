//! HTTP protocol implementation.
//!
//! This module implements the TLS-terminated HTTP/1.1 surface of the server:
//!
//! - **`session`**: the per-connection state machine, request dispatch, and
//!   the idle deadline
//! - **`parser`**: parses incoming HTTP requests from byte buffers
//! - **`request`**: HTTP request representation and form-body utilities
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: serializes and writes HTTP responses to the client
//!
//! # Session State Machine
//!
//! Each connection goes through the same sequence of states:
//!
//! ```text
//!        ┌──────────────┐
//!        │ Handshaking  │ ← TLS handshake; failure never reaches dispatch
//!        └──────┬───────┘
//!               ▼
//!        ┌──────────────┐
//!        │   Reading    │ ← Wait for a complete request, idle deadline armed
//!        └──────┬───────┘
//!               │ Request received (deadline dropped)
//!               ▼
//!        ┌──────────────┐
//!        │  Processing  │ ← Dispatch via the fixed route table
//!        └──────┬───────┘
//!               ▼
//!        ┌──────────────┐
//!        │   Writing    │ ← Send response, then loop back to Reading
//!        └──────┬───────┘
//!               │ EOF, error, or deadline expiry from any wait
//!               ▼
//!        ┌──────────────┐
//!        │   Closing    │ → Closed
//!        └──────────────┘
//! ```
//!
//! Requests and responses alternate strictly on one connection; pipelined
//! input is answered one message at a time.

pub mod parser;
pub mod request;
pub mod response;
pub mod session;
pub mod writer;
