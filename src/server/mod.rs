//! Server front end.
//!
//! The listener accepts raw connections and hands each one to a session
//! task; the console drives the same content-management path over a
//! command channel.

pub mod console;
pub mod listener;
pub mod tls;
