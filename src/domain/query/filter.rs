//! Filter specification and the predicate compiled from it

use std::collections::{BTreeMap, BTreeSet};
use crate::domain::catalog::{Facet, Product};
use crate::domain::favorites::FavoriteLookup;
use crate::domain::query::sort::SortKey;
use crate::domain::value_objects::PageRequest;

/// Category value meaning "no category restriction".
pub const ALL_CATEGORIES: &str = "All Categories";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Blank input and the `All Categories` sentinel both mean no restriction.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_CATEGORIES { Self::All } else { Self::Only(value.to_string()) }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

/// Selected values per facet. OR within a facet, AND across facets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FacetSelections(BTreeMap<Facet, BTreeSet<String>>);

impl FacetSelections {
    pub fn new() -> Self { Self::default() }

    /// Adds `value` to the selection of `facet`. Blank values are ignored.
    pub fn select(&mut self, facet: Facet, value: impl Into<String>) {
        let value: String = value.into();
        let value = value.trim();
        if value.is_empty() { return; }
        self.0.entry(facet).or_default().insert(value.to_string());
    }

    /// Active selection for `facet`; `None` when nothing is selected.
    pub fn selected(&self, facet: Facet) -> Option<&BTreeSet<String>> {
        self.0.get(&facet).filter(|values| !values.is_empty())
    }

    pub fn is_empty(&self) -> bool { self.0.values().all(BTreeSet::is_empty) }

    pub fn matches(&self, product: &Product, facet: Facet) -> bool {
        match self.selected(facet) {
            None => true,
            Some(wanted) => product.facet_values(facet).into_iter().any(|v| wanted.contains(v)),
        }
    }
}

/// Immutable description of the current search, filter, sort and page
/// selection. Rebuilt by the caller on every interaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub text: String,
    pub category: CategoryFilter,
    pub facets: FacetSelections,
    pub sustainable_only: bool,
    pub favorites_only: bool,
    pub sort: SortKey,
    pub page: PageRequest,
}

impl FilterSpec {
    pub fn new() -> Self { Self::default() }

    pub fn with_text(mut self, text: impl Into<String>) -> Self { self.text = text.into(); self }
    pub fn with_category(mut self, category: &str) -> Self { self.category = CategoryFilter::parse(category); self }
    pub fn with_facet(mut self, facet: Facet, value: impl Into<String>) -> Self { self.facets.select(facet, value); self }
    pub fn sustainable_only(mut self) -> Self { self.sustainable_only = true; self }
    pub fn favorites_only(mut self) -> Self { self.favorites_only = true; self }
    pub fn sorted_by(mut self, sort: SortKey) -> Self { self.sort = sort; self }
    pub fn on_page(mut self, page: usize, page_size: usize) -> Self { self.page = PageRequest::new(page, page_size); self }

    /// True when no predicate is active.
    pub fn is_unfiltered(&self) -> bool {
        self.text.trim().is_empty()
            && self.category == CategoryFilter::All
            && self.facets.is_empty()
            && !self.sustainable_only
            && !self.favorites_only
    }
}

/// Predicate to leave out when evaluating a spec, used for facet counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Exclude { Nothing, Category, Facet(Facet) }

/// A `FilterSpec` bound to a favorites lookup, with the text needle lowered once.
pub(crate) struct Matcher<'a, F: ?Sized> {
    spec: &'a FilterSpec,
    needle: Option<String>,
    favorites: &'a F,
}

impl<'a, F: FavoriteLookup + ?Sized> Matcher<'a, F> {
    pub(crate) fn new(spec: &'a FilterSpec, favorites: &'a F) -> Self {
        let needle = Some(spec.text.trim().to_lowercase()).filter(|n| !n.is_empty());
        Self { spec, needle, favorites }
    }

    pub(crate) fn matches(&self, product: &Product) -> bool { self.matches_except(product, Exclude::Nothing) }

    pub(crate) fn matches_except(&self, product: &Product, exclude: Exclude) -> bool {
        if let Some(needle) = &self.needle {
            if !product.name.to_lowercase().contains(needle.as_str()) { return false; }
        }
        if exclude != Exclude::Category && !self.spec.category.matches(&product.category) { return false; }
        let facets_match = Facet::ALL
            .into_iter()
            .filter(|f| exclude != Exclude::Facet(*f))
            .all(|f| self.spec.facets.matches(product, f));
        if !facets_match { return false; }
        if self.spec.sustainable_only && !product.sustainable { return false; }
        if self.spec.favorites_only && !self.favorites.is_favorite(&product.id) { return false; }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ProductId;
    use std::collections::HashSet;

    fn product(id: u64, name: &str) -> Product { Product::new(ProductId::from(id), name) }

    #[test]
    fn test_category_sentinel() {
        assert_eq!(CategoryFilter::parse("All Categories"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("  "), CategoryFilter::All);
        assert!(CategoryFilter::parse("Snacks").matches("Snacks"));
        assert!(!CategoryFilter::parse("Snacks").matches("snacks"));
    }

    #[test]
    fn test_facet_selection_or_within_facet() {
        let mut cocoa = product(1, "Cocoa Bar");
        cocoa.ingredients = vec!["Cocoa".into(), "Sugar".into()];
        let mut nuts = product(2, "Nut Bar");
        nuts.ingredients = vec!["Almonds".into()];
        let plain = product(3, "Plain Bar");

        let mut sel = FacetSelections::new();
        sel.select(Facet::Ingredients, "Cocoa");
        sel.select(Facet::Ingredients, "Almonds");
        assert!(sel.matches(&cocoa, Facet::Ingredients));
        assert!(sel.matches(&nuts, Facet::Ingredients));
        assert!(!sel.matches(&plain, Facet::Ingredients));
        // other facets unrestricted
        assert!(sel.matches(&plain, Facet::Usage));
        assert!(sel.selected(Facet::Usage).is_none());
    }

    #[test]
    fn test_blank_selection_ignored() {
        let mut sel = FacetSelections::new();
        sel.select(Facet::ShelfLife, "   ");
        assert!(sel.is_empty());
    }

    #[test]
    fn test_matcher_conjunction() {
        let mut bar = product(1, "Banana Bar");
        bar.category = "Snacks".into();
        bar.sustainable = true;
        bar.manufacturer_region = Some("West Africa".into());
        let favorites: HashSet<ProductId> = HashSet::from([ProductId::from(1u64)]);

        let spec = FilterSpec::new()
            .with_text("  BANANA ")
            .with_category("Snacks")
            .with_facet(Facet::ManufacturerRegion, "West Africa")
            .sustainable_only()
            .favorites_only();
        assert!(Matcher::new(&spec, &favorites).matches(&bar));

        let spec = spec.with_facet(Facet::UnitType, "Case");
        let matcher = Matcher::new(&spec, &favorites);
        assert!(!matcher.matches(&bar));
        assert!(matcher.matches_except(&bar, Exclude::Facet(Facet::UnitType)));
    }

    #[test]
    fn test_unfiltered_spec() {
        assert!(FilterSpec::new().with_category(ALL_CATEGORIES).with_text(" ").is_unfiltered());
        assert!(!FilterSpec::new().sustainable_only().is_unfiltered());
    }
}
