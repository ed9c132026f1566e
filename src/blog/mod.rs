//! Blog content management.
//!
//! The shared content index is the server's primary shared mutable state;
//! the manager wraps it with post storage and listing-page generation.

pub mod index;
pub mod manager;

pub use index::BlogIndex;
pub use manager::{BlogManager, Post};
