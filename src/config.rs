//! Service configuration, read from the environment (and `.env` via dotenvy).

use std::path::PathBuf;
use thiserror::Error;
use crate::domain::value_objects::DEFAULT_PAGE_SIZE;

pub const DEFAULT_PORT: u16 = 8083;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("no catalog source configured: set DATABASE_URL or CATALOG_FILE")]
    NoCatalogSource,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    Postgres { url: String },
    File { path: PathBuf },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub source: CatalogSource,
    pub nats_url: Option<String>,
    pub default_page_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable lookup. `DATABASE_URL` wins over
    /// `CATALOG_FILE` when both are set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid { name: "PORT", value: v })?,
            None => DEFAULT_PORT,
        };
        let default_page_size = match var("DEFAULT_PAGE_SIZE") {
            Some(v) => match v.parse::<usize>() {
                Ok(n) if (1..=MAX_PAGE_SIZE).contains(&n) => n,
                _ => return Err(ConfigError::Invalid { name: "DEFAULT_PAGE_SIZE", value: v }),
            },
            None => DEFAULT_PAGE_SIZE,
        };
        let source = match (var("DATABASE_URL"), var("CATALOG_FILE")) {
            (Some(url), _) => CatalogSource::Postgres { url },
            (None, Some(path)) => CatalogSource::File { path: PathBuf::from(path) },
            (None, None) => return Err(ConfigError::NoCatalogSource),
        };

        Ok(Self { port, source, nats_url: var("NATS_URL"), default_page_size })
    }
}
