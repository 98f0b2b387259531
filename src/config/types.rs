use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of static assets served for unmatched paths
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Largest accepted upload request, in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,

    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret used to sign session cookies. A random secret is generated at
    /// startup when unset, which signs everyone out on restart.
    #[serde(default)]
    pub session_secret: Option<String>,

    /// Session timeout in hours (default: 24)
    #[serde(default = "default_session_timeout")]
    pub session_timeout_hours: u64,

    /// Accounts allowed to sign in
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
    /// Stable identity of the user (their email address)
    pub identity: String,

    /// Bcrypt hash of the password (generate with `gallery hash-password`)
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite database file. Relative paths resolve against the config file's directory.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_mb() -> usize {
    16
}

fn default_session_timeout() -> u64 {
    24
}

fn default_database_path() -> PathBuf {
    PathBuf::from("gallery.db")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            max_upload_mb: default_max_upload_mb(),
            auth: AuthConfig::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_secret: None,
            session_timeout_hours: default_session_timeout(),
            accounts: Vec::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

impl AuthConfig {
    pub fn find_account(&self, identity: &str) -> Option<&AccountConfig> {
        self.accounts.iter().find(|a| a.identity == identity)
    }
}
