use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use rand::Rng;

use crate::http::request::form_fields;

/// Form field carrying the anti-forgery token on state-changing submissions.
pub const CSRF_FIELD: &str = "_csrf";

/// Placeholder replaced with the live token when a protected page is rendered.
const TOKEN_PLACEHOLDER: &str = "{{csrf}}";

/// Anti-forgery token bindings, at most one live token per session.
///
/// A token is bound to the exact bytes of the page it was rendered into and
/// stays valid until it is replaced, revoked, or its session times out.
pub struct TokenStore {
    bindings: Mutex<HashMap<String, Vec<u8>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self {
            bindings: Mutex::new(HashMap::new()),
        }
    }

    /// Generates a fresh token, renders it into `template`, and binds it to
    /// the rendered bytes. Any previous binding for the session is dropped.
    pub fn mint(&self, previous: Option<String>, template: &[u8]) -> (String, Vec<u8>) {
        let token = random_token();
        let rendered = render_into(template, &token);

        let mut bindings = self.lock();
        if let Some(previous) = previous {
            bindings.remove(&previous);
        }
        bindings.insert(token.clone(), rendered.clone());

        (token, rendered)
    }

    /// Re-renders `template` with the session's current token, touching no
    /// binding. An absent token renders as an empty field.
    pub fn render(&self, token: Option<&str>, template: &[u8]) -> Vec<u8> {
        render_into(template, token.unwrap_or(""))
    }

    /// Checks the `_csrf` field of a submission against the session's bound
    /// token. Fails when the session has no token, the binding is gone, or
    /// the submitted value differs.
    pub fn validate(&self, token: Option<&str>, body: &str) -> bool {
        let Some(token) = token else {
            return false;
        };
        if !self.lock().contains_key(token) {
            return false;
        }
        form_fields(body)
            .get(CSRF_FIELD)
            .is_some_and(|submitted| *submitted == token)
    }

    pub fn revoke(&self, token: Option<String>) {
        if let Some(token) = token {
            self.lock().remove(&token);
        }
    }

    /// The page bytes a token was minted into, if it is still live.
    pub fn page_for(&self, token: &str) -> Option<Vec<u8>> {
        self.lock().get(token).cloned()
    }

    pub fn live_tokens(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.bindings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

fn random_token() -> String {
    format!("{:032x}", rand::thread_rng().r#gen::<u128>())
}

fn render_into(template: &[u8], token: &str) -> Vec<u8> {
    String::from_utf8_lossy(template)
        .replace(TOKEN_PLACEHOLDER, token)
        .into_bytes()
}
