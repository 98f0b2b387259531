mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
///
/// Returns the config together with the path it was loaded from, if any.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    if let Some(path) = custom_path {
        return Ok((load_config(path)?, Some(path.to_path_buf())));
    }

    let default_paths = [
        "./config.toml",
        "./gallery.toml",
        "~/.config/gallery/config.toml",
        "/etc/gallery/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return Ok((load_config(path)?, Some(path.to_path_buf())));
        }
    }

    Ok((Config::default(), None))
}

/// Resolve the database path against the directory holding the config file.
pub fn resolve_database_path(config: &Config, config_path: Option<&Path>) -> PathBuf {
    let db_path = PathBuf::from(
        shellexpand::tilde(&config.storage.database_path.to_string_lossy()).as_ref(),
    );
    if db_path.is_absolute() {
        return db_path;
    }

    let base = config_path
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    base.join(db_path)
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.server.max_upload_mb == 0 {
        anyhow::bail!("max_upload_mb must be at least 1");
    }

    if config.server.auth.session_timeout_hours == 0 {
        anyhow::bail!("Session timeout must be at least one hour");
    }

    let mut seen = HashSet::new();
    for account in &config.server.auth.accounts {
        if account.identity.trim().is_empty() {
            anyhow::bail!("Account identity cannot be empty");
        }
        if !seen.insert(account.identity.as_str()) {
            anyhow::bail!("Duplicate account identity '{}'", account.identity);
        }
        if account.password_hash.is_empty() {
            anyhow::bail!("Account '{}' has no password hash", account.identity);
        }
    }

    if let Some(ref secret) = config.server.auth.session_secret {
        if secret.len() < 16 {
            tracing::warn!("Session secret is shorter than 16 characters");
        }
    }

    if config.server.auth.accounts.is_empty() {
        tracing::warn!("No accounts configured; nobody can sign in to upload images");
    }

    Ok(())
}
