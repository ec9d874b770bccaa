//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "public";

/// Which storage backend to connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUrl {
    /// `firestore://<gcp-project-id>`
    Firestore { project_id: String },
    /// `memory://`, data lives only as long as the process
    Memory,
}

impl std::str::FromStr for StoreUrl {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidStoreUrl(raw.to_string());
        let (scheme, rest) = raw.trim().split_once("://").ok_or_else(invalid)?;

        match scheme {
            "firestore" if !rest.is_empty() && !rest.contains('/') => Ok(StoreUrl::Firestore {
                project_id: rest.to_string(),
            }),
            "memory" if rest.is_empty() => Ok(StoreUrl::Memory),
            _ => Err(invalid()),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage backend
    pub store_url: StoreUrl,
    /// Server port
    pub port: u16,
    /// Directory holding the landing page and static assets
    pub static_dir: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            store_url: StoreUrl::Memory,
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            store_url: env::var("STORE_URL")
                .map_err(|_| ConfigError::Missing("STORE_URL"))?
                .parse()?,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR)),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid STORE_URL '{0}': expected firestore://<project-id> or memory://")]
    InvalidStoreUrl(String),
}
