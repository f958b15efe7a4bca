//! OpenSASE Sourcing Catalog
//!
//! Self-hosted B2B product sourcing catalog connecting brands, retailers and
//! manufacturers.
//!
//! ## Features
//! - Product catalog API with server-side paging
//! - Catalog queries: free-text search, category and facet filters, sorting,
//!   pagination and per-facet match counts
//! - Per-user favorites with event publishing
//!
//! The catalog query engine ([`domain::query::query_products`]) is pure and
//! synchronous; storage and HTTP live around it.

pub mod config;
pub mod domain;
pub mod http;
pub mod payload;
pub mod storage;

use thiserror::Error;

pub use domain::catalog::{Facet, Product};
pub use domain::favorites::{FavoriteLookup, Favorites};
pub use domain::query::{query_products, FacetCounts, FilterSpec, QueryResult, SortKey};
pub use domain::value_objects::{PageRequest, ProductId};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
