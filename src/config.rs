use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Server configuration, read from a YAML file with built-in defaults.
///
/// The file path comes from the `QUILL_CONFIG` environment variable and
/// falls back to `quill.yaml` in the working directory. A missing file is
/// not an error; every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address and port the TLS listener binds to.
    pub listen_addr: String,
    /// Number of runtime worker threads driving all sessions.
    pub worker_threads: usize,
    /// Directory holding the `pages/` and `blogs/` subdirectories.
    pub site_root: PathBuf,
    /// PEM certificate chain presented to clients.
    pub cert_path: PathBuf,
    /// PEM private key matching the certificate.
    pub key_path: PathBuf,
    /// Seconds a session may sit idle in a read before being closed.
    pub idle_timeout_secs: u64,
    pub admin_user: String,
    pub admin_pass: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "[::]:8443".to_string(),
            worker_threads: 4,
            site_root: PathBuf::from("site"),
            cert_path: PathBuf::from("certs/cert.pem"),
            key_path: PathBuf::from("certs/key.pem"),
            idle_timeout_secs: 60,
            admin_user: "user".to_string(),
            admin_pass: "pass".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("QUILL_CONFIG").unwrap_or_else(|_| "quill.yaml".to_string());
        let path = Path::new(&path);
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn pages_root(&self) -> PathBuf {
        self.site_root.join("pages")
    }

    pub fn blogs_root(&self) -> PathBuf {
        self.site_root.join("blogs")
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}
