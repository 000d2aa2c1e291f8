use crate::error::RegistryError;
use axum_extra::extract::cookie::Key;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::warn;

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "BANKS_";

/// Minimum secret length accepted for deriving the cookie key.
const MIN_SECRET_LEN: usize = 32;

/// Process configuration. Built once at startup and handed to the components that
/// need it; nothing reads it from a global.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub database: DatabaseConfig,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub loglevel: String,
    /// Secret the flash-cookie key is derived from.
    pub secret_key: Option<String>,
    /// Drop the `Secure` attribute from cookies, for plain-http development.
    pub insecure_cookie: bool,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5001".to_string(),
            loglevel: "info".to_string(),
            secret_key: None,
            insecure_cookie: false,
        }
    }
}

impl std::fmt::Debug for BasicConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicConfig")
            .field("listen_addr", &self.listen_addr)
            .field("loglevel", &self.loglevel)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("insecure_cookie", &self.insecure_cookie)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL; its scheme is the driver (`sqlite:` only).
    pub url: String,
    pub create_if_missing: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:banks.db".to_string(),
            create_if_missing: true,
        }
    }
}

impl Config {
    /// Defaults, then `config.toml`, then `BANKS_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, RegistryError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, RegistryError> {
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), RegistryError> {
        self.listen_addr()?;
        if let Some(secret) = self.basic.secret_key.as_deref()
            && secret.len() < MIN_SECRET_LEN
        {
            return Err(RegistryError::Config(format!(
                "secret_key must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, RegistryError> {
        self.basic.listen_addr.parse().map_err(|e| {
            RegistryError::Config(format!(
                "invalid listen_addr `{}`: {e}",
                self.basic.listen_addr
            ))
        })
    }

    /// Key for the private (encrypted) flash cookie.
    ///
    /// Without a configured secret a random key is generated, so pending notices are
    /// lost on restart.
    pub fn cookie_key(&self) -> Key {
        match self.basic.secret_key.as_deref() {
            Some(secret) if secret.len() >= MIN_SECRET_LEN => Key::derive_from(secret.as_bytes()),
            _ => {
                warn!("no usable secret_key configured; generating an ephemeral cookie key");
                Key::generate()
            }
        }
    }
}
