//! Where tables live and how they are written.
//!
//! The configuration is read once, from the process environment and an
//! optional `.env` file, and then handed to [`crate::persistence::Database`].
//!
//! - `FERRUM_DATA_PATH`: directory holding the table documents
//! - `FERRUM_PRETTY_JSON`: write indented documents (`1`, `true`, `yes`, `on`)

use std::env;
use std::path::PathBuf;

use log::debug;

pub const DATA_PATH_VAR: &str = "FERRUM_DATA_PATH";
pub const PRETTY_JSON_VAR: &str = "FERRUM_PRETTY_JSON";
pub const DEFAULT_DATA_PATH: &str = "./storage";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_path: PathBuf,
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> StoreConfig {
        StoreConfig {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            pretty: false,
        }
    }
}

impl StoreConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> StoreConfig {
        StoreConfig {
            data_path: data_path.into(),
            ..StoreConfig::default()
        }
    }

    pub fn from_env() -> StoreConfig {
        //! Build the configuration from the environment, loading `.env`
        //! first if there is one. Unset variables fall back to the defaults.

        if let Ok(path) = dotenvy::dotenv() {
            debug!("loaded environment from {}", path.display());
        }

        StoreConfig::from_vars(
            env::var(DATA_PATH_VAR).ok(),
            env::var(PRETTY_JSON_VAR).ok(),
        )
    }

    fn from_vars(data_path: Option<String>, pretty: Option<String>) -> StoreConfig {
        let defaults = StoreConfig::default();

        StoreConfig {
            data_path: data_path
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            pretty: pretty.as_deref().map(parse_flag).unwrap_or(defaults.pretty),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
