//! Query-string parameters for catalog requests
//!
//! The catalog UI mirrors its current selection into the page URL (`q` for
//! the search box, `view=favorites` for the favorites toggle, one key per
//! facet holding comma-separated values). These types turn that query string
//! back into a [`FilterSpec`].

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};
use crate::config::MAX_PAGE_SIZE;
use crate::domain::catalog::Facet;
use crate::domain::query::{CategoryFilter, FacetSelections, FilterSpec, SortKey, UnknownSortKey};
use crate::domain::value_objects::PageRequest;

pub const FAVORITES_VIEW: &str = "favorites";

#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("invalid parameters: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Sort(#[from] UnknownSortKey),

    #[error("unknown view: {0}")]
    UnknownView(String),

    #[error("view=favorites requires a user")]
    MissingUser,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct CatalogParams {
    #[validate(length(max = 200))]
    pub q: Option<String>,
    pub category: Option<String>,
    pub unit_type: Option<String>,
    pub flavor_type: Option<String>,
    pub usage: Option<String>,
    pub region: Option<String>,
    pub ingredients: Option<String>,
    pub shelf_life: Option<String>,
    pub packaging_size: Option<String>,
    pub sustainable: Option<bool>,
    pub view: Option<String>,
    #[validate(length(max = 128))]
    pub user: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 100))]
    pub page_size: Option<usize>,
}

impl CatalogParams {
    fn facet_param(&self, facet: Facet) -> Option<&str> {
        let value = match facet {
            Facet::UnitType => &self.unit_type,
            Facet::FlavorType => &self.flavor_type,
            Facet::Usage => &self.usage,
            Facet::ManufacturerRegion => &self.region,
            Facet::Ingredients => &self.ingredients,
            Facet::ShelfLife => &self.shelf_life,
            Facet::PackagingSize => &self.packaging_size,
        };
        value.as_deref()
    }

    fn favorites_view(&self) -> Result<bool, ParamsError> {
        match self.view.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(false),
            Some(FAVORITES_VIEW) => Ok(true),
            Some(other) => Err(ParamsError::UnknownView(other.to_string())),
        }
    }

    /// Owner whose favorites must be loaded, if the favorites view is on.
    pub fn favorites_owner(&self) -> Result<Option<&str>, ParamsError> {
        if !self.favorites_view()? { return Ok(None); }
        match self.user.as_deref().map(str::trim) {
            Some(user) if !user.is_empty() => Ok(Some(user)),
            _ => Err(ParamsError::MissingUser),
        }
    }

    pub fn to_spec(&self, default_page_size: usize) -> Result<FilterSpec, ParamsError> {
        self.validate()?;
        let mut facets = FacetSelections::new();
        for facet in Facet::ALL {
            for value in self.facet_param(facet).unwrap_or_default().split(',') {
                facets.select(facet, value);
            }
        }
        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => SortKey::default(),
            Some(key) => key.parse()?,
        };
        let page_size = self.page_size.unwrap_or(default_page_size).min(MAX_PAGE_SIZE);
        Ok(FilterSpec {
            text: self.q.clone().unwrap_or_default(),
            category: CategoryFilter::parse(self.category.as_deref().unwrap_or_default()),
            facets,
            sustainable_only: self.sustainable.unwrap_or(false),
            favorites_only: self.favorites_owner()?.is_some(),
            sort,
            page: PageRequest::new(self.page.unwrap_or(1), page_size),
        })
    }
}

/// Server-side paging for the raw product listing.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct PageParams {
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

impl PageParams {
    pub fn to_request(&self, default_page_size: usize) -> Result<PageRequest, ParamsError> {
        self.validate()?;
        Ok(PageRequest::new(self.page.unwrap_or(1), self.limit.unwrap_or(default_page_size)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(query: &str) -> CatalogParams {
        axum::extract::Query::<CatalogParams>::try_from_uri(&format!("/api/v1/catalog?{query}").parse().unwrap())
            .unwrap()
            .0
    }

    #[test]
    fn test_full_query_string() {
        let spec = params("q=cocoa&category=Snacks&ingredients=Cocoa,Almonds&region=Lagos&sustainable=true&sort=price-desc&page=2&page_size=12")
            .to_spec(9)
            .unwrap();
        assert_eq!(spec.text, "cocoa");
        assert_eq!(spec.category, CategoryFilter::Only("Snacks".into()));
        assert_eq!(spec.facets.selected(Facet::Ingredients).map(|s| s.len()), Some(2));
        assert!(spec.facets.selected(Facet::ManufacturerRegion).is_some_and(|s| s.contains("Lagos")));
        assert!(spec.sustainable_only);
        assert!(!spec.favorites_only);
        assert_eq!(spec.sort, SortKey::PriceDesc);
        assert_eq!(spec.page, PageRequest::new(2, 12));
    }

    #[test]
    fn test_defaults() {
        let spec = params("").to_spec(9).unwrap();
        assert!(spec.is_unfiltered());
        assert_eq!(spec.sort, SortKey::NameAsc);
        assert_eq!(spec.page, PageRequest::new(1, 9));
        let spec = params("category=All%20Categories&ingredients=,%20,").to_spec(9).unwrap();
        assert!(spec.is_unfiltered());
    }

    #[test]
    fn test_favorites_view() {
        let p = params("view=favorites&user=buyer-1");
        assert_eq!(p.favorites_owner().unwrap(), Some("buyer-1"));
        assert!(p.to_spec(9).unwrap().favorites_only);
        assert!(matches!(params("view=favorites").to_spec(9), Err(ParamsError::MissingUser)));
        assert!(matches!(params("view=wishlist").to_spec(9), Err(ParamsError::UnknownView(_))));
    }

    #[test]
    fn test_blank_user_only_matters_for_favorites_view() {
        let spec = params("user=&q=cocoa").to_spec(9).unwrap();
        assert!(!spec.favorites_only);
        assert_eq!(spec.text, "cocoa");
        assert!(matches!(params("view=favorites&user=").to_spec(9), Err(ParamsError::MissingUser)));
        assert!(matches!(params("view=favorites&user=%20%20").to_spec(9), Err(ParamsError::MissingUser)));
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(params("sort=cheapest").to_spec(9), Err(ParamsError::Sort(_))));
        assert!(matches!(params("page_size=0").to_spec(9), Err(ParamsError::Validation(_))));
        assert!(matches!(params("page_size=101").to_spec(9), Err(ParamsError::Validation(_))));
        // out-of-range pages are clamped later, not rejected
        assert!(params("page=0").to_spec(9).is_ok());
    }

    #[test]
    fn test_page_params() {
        let p = PageParams { page: Some(4), limit: None };
        assert_eq!(p.to_request(9).unwrap(), PageRequest::new(4, 9));
        assert!(PageParams { page: None, limit: Some(500) }.to_request(9).is_err());
    }
}
