use std::sync::atomic::AtomicUsize;
use std::time::Duration;

use crate::auth::{Credential, TokenStore};
use crate::blog::BlogManager;
use crate::config::Config;
use crate::pages::PageStore;

/// Shared application state handed to every session.
///
/// Sessions hold it behind an `Arc`; the pieces that can be mutated from
/// multiple sessions guard themselves internally.
pub struct AppState {
    pub pages: PageStore,
    pub tokens: TokenStore,
    pub blogs: BlogManager,
    pub credential: Credential,
    pub idle_timeout: Duration,
    /// Live session count reported by the console.
    pub sessions: AtomicUsize,
}

impl AppState {
    pub fn new(cfg: &Config) -> Self {
        Self {
            pages: PageStore::new(cfg.pages_root()),
            tokens: TokenStore::new(),
            blogs: BlogManager::new(cfg.blogs_root(), cfg.pages_root()),
            credential: Credential::new(&cfg.admin_user, &cfg.admin_pass),
            idle_timeout: cfg.idle_timeout(),
            sessions: AtomicUsize::new(0),
        }
    }
}
