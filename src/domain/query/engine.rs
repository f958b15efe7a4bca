//! Catalog query engine
//!
//! `query_products` filters, sorts and pages a product collection in one
//! synchronous call. It reads its inputs, allocates a fresh result and
//! touches nothing else, so identical inputs always give identical output.

use serde::{Deserialize, Serialize};
use crate::domain::catalog::Product;
use crate::domain::favorites::FavoriteLookup;
use crate::domain::query::facets::FacetCounts;
use crate::domain::query::filter::{FilterSpec, Matcher};
use crate::domain::query::sort::sort_products;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub items: Vec<Product>,
    pub total: usize,
    /// Effective page after clamping.
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub facet_counts: FacetCounts,
}

pub fn query_products<F>(products: &[Product], spec: &FilterSpec, favorites: &F) -> QueryResult
where
    F: FavoriteLookup + ?Sized,
{
    let matcher = Matcher::new(spec, favorites);
    let mut matched: Vec<&Product> = products.iter().filter(|p| matcher.matches(p)).collect();
    sort_products(&mut matched, spec.sort);

    let window = spec.page.clamp(matched.len());
    if window.page != spec.page.page() {
        tracing::debug!(requested = spec.page.page(), clamped = window.page, "page out of range, clamped");
    }
    let items = matched[window.start..window.end].iter().map(|p| (*p).clone()).collect();
    let facet_counts = FacetCounts::compute(products, &matcher);

    tracing::trace!(total = matched.len(), page = window.page, sort = %spec.sort, unfiltered = spec.is_unfiltered(), "catalog query evaluated");
    QueryResult {
        items,
        total: matched.len(),
        page: window.page,
        page_count: window.page_count,
        page_size: spec.page.page_size(),
        facet_counts,
    }
}
