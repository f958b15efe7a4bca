//! Catalog query module
pub mod engine;
pub mod facets;
pub mod filter;
pub mod sort;

pub use engine::{query_products, QueryResult};
pub use facets::FacetCounts;
pub use filter::{CategoryFilter, FacetSelections, FilterSpec, ALL_CATEGORIES};
pub use sort::{sort_products, SortKey, UnknownSortKey};
