use core::fmt::{Debug, Display};

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

fn default_listen_address() -> String {
    "0.0.0.0:3000".to_owned()
}

#[derive(Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    pub database_url: String,
    /// Secret the session cookie signing key is derived from. Keep it long
    /// and keep it out of version control.
    pub session_secret: String,
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Extraction(#[from] figment::Error),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

pub fn get_config() -> Result<Config, ConfigError> {
    Ok(Figment::new()
        .merge(Toml::file("vms.toml"))
        .merge(Env::prefixed("VMS_"))
        .extract()?)
}
