use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Server configuration, read from `INKPOST_`-prefixed environment
/// variables (a `.env` file is honored via dotenvy in `main`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Key material for session and flash cookies; at least 64 characters.
    pub secret_key: String,
    /// Directory where uploaded post images are stored. Must live under a
    /// path served by the static files handler.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Initial admin password, required only on first run while no `admin`
    /// account exists yet. Unset it after bootstrap.
    #[serde(default)]
    pub admin_password: Option<String>,
}

fn default_database_url() -> String {
    "blog.db".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_upload_dir() -> String {
    "static/uploads/posts".to_string()
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("INKPOST"))
            .build()?
            .try_deserialize()
    }
}
