use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::data::aggregate::TOP_PRODUCTS;

/// Names a JSON settings file to read on startup.
pub const CONFIG_ENV: &str = "BEE_CYCLE_CONFIG";
/// Overrides the dataset path.
pub const DATA_ENV: &str = "BEE_CYCLE_DATA";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("parsing config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("environment variable {name}: '{value}' is not valid")]
    InvalidEnv { name: String, value: String },
}

/// Dashboard settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub data_path: PathBuf,
    /// Prepended to every monetary value and axis tick.
    pub currency_prefix: String,
    pub top_products: usize,
    /// Rows shown in the filtered-data table.
    pub table_preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Bee Cycle Sales Dashboard".to_string(),
            data_path: PathBuf::from("dataset_bee_cycle.xlsx"),
            currency_prefix: "Rp ".to_string(),
            top_products: TOP_PRODUCTS,
            table_preview_rows: 500,
        }
    }
}

impl DashboardConfig {
    /// Read settings from a JSON file; absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve settings: defaults, then the file named by [`CONFIG_ENV`],
    /// then [`DATA_ENV`], then the first positional argument (data path).
    pub fn resolve(args: impl IntoIterator<Item = String>) -> Result<Self, ConfigError> {
        Self::resolve_with(args, |name| env::var_os(name))
    }

    /// [`DashboardConfig::resolve`] with the environment supplied by `var`.
    pub fn resolve_with(
        args: impl IntoIterator<Item = String>,
        var: impl Fn(&str) -> Option<OsString>,
    ) -> Result<Self, ConfigError> {
        let mut config = match var(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(path) = var(DATA_ENV) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(path) = args.into_iter().nth(1) {
            config.data_path = PathBuf::from(path);
        }
        Ok(config)
    }
}

/// Read an optional numeric environment variable.
pub fn env_f64(name: &str) -> Result<Option<f64>, ConfigError> {
    parse_f64(name, env::var(name).ok())
}

fn parse_f64(name: &str, value: Option<String>) -> Result<Option<f64>, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                name: name.to_string(),
                value,
            }),
        None => Ok(None),
    }
}
