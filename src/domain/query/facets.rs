//! Per-value facet counts

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use crate::domain::catalog::{Facet, Product};
use crate::domain::favorites::FavoriteLookup;
use crate::domain::query::filter::{Exclude, Matcher};

/// Match counts for every facet value and category.
///
/// Each facet is counted over the products that pass every other active
/// filter, so a count tells how many results selecting that value would add.
/// Counts always cover the full filtered set, never just the current page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetCounts {
    pub facets: BTreeMap<Facet, BTreeMap<String, usize>>,
    pub categories: BTreeMap<String, usize>,
}

impl FacetCounts {
    pub(crate) fn compute<F: FavoriteLookup + ?Sized>(products: &[Product], matcher: &Matcher<'_, F>) -> Self {
        let mut facets = BTreeMap::new();
        for facet in Facet::ALL {
            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for product in products.iter().filter(|p| matcher.matches_except(p, Exclude::Facet(facet))) {
                // a product counts once per distinct value
                let distinct: BTreeSet<&str> = product.facet_values(facet).into_iter().collect();
                for value in distinct { *counts.entry(value.to_string()).or_default() += 1; }
            }
            facets.insert(facet, counts);
        }

        let mut categories: BTreeMap<String, usize> = BTreeMap::new();
        for product in products.iter().filter(|p| matcher.matches_except(p, Exclude::Category)) {
            if product.category.trim().is_empty() { continue; }
            *categories.entry(product.category.clone()).or_default() += 1;
        }

        Self { facets, categories }
    }

    pub fn count(&self, facet: Facet, value: &str) -> usize {
        self.facets.get(&facet).and_then(|c| c.get(value)).copied().unwrap_or(0)
    }

    pub fn category_count(&self, category: &str) -> usize {
        self.categories.get(category).copied().unwrap_or(0)
    }
}
