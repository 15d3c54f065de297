//! Runtime settings, read from `FORUM_*` environment variables.

use config::{Config, ConfigError, Environment};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Address the HTTP server listens on, `host:port`.
    pub bind_addr: String,
    /// Used by the `db-sqlite` build only.
    pub database_url: String,
    pub token_secret: SecretString,
    pub access_token_age_secs: i64,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::with_prefix("FORUM"))
    }

    fn load(source: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_addr", "127.0.0.1:5000")?
            .set_default("database_url", "sqlite:rusty_forum.db")?
            .set_default("access_token_age_secs", 3000)?
            .add_source(source.try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
