/// The configured static admin credential.
///
/// Comparison is a plain equality check; there is no hashing, lockout, or
/// rate limiting.
#[derive(Debug, Clone)]
pub struct Credential {
    user: String,
    pass: String,
}

impl Credential {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }

    pub fn matches(&self, user: &str, pass: &str) -> bool {
        self.user == user && self.pass == pass
    }
}
