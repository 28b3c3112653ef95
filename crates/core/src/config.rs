use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Secret used to sign bearer tokens. Has no default on purpose:
    /// the server must refuse to start without one.
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;

        Self::validated(config.try_deserialize()?)
    }

    /// Load configuration from aulakit.toml (optional) with environment
    /// variable overrides. Environment variables use the AULAKIT_ prefix
    /// with `__` as the section separator, e.g. AULAKIT_AUTH__JWT_SECRET,
    /// AULAKIT_SERVER__PORT.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("aulakit").required(false))
            .add_source(Environment::with_prefix("AULAKIT").separator("__"))
            .build()?;

        Self::validated(config.try_deserialize()?)
    }

    fn validated(config: Self) -> Result<Self, ConfigError> {
        if config.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.jwt_secret must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}
