//! Product read model
//!
//! Products are sourced from the product API and never mutated by the
//! catalog. Every optional field may be absent; absent values simply never
//! match a specific filter value.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::domain::value_objects::{parse_price, LeadTimeUnit, ProductId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub manufacturer: String,
    /// Display-formatted price, e.g. `"$2.50 / unit"`.
    pub price: Option<String>,
    pub unit_price: Option<Decimal>,
    pub rating: Option<f64>,
    pub product_type: String,
    pub min_order_quantity: u32,
    pub lead_time: String,
    pub lead_time_unit: Option<LeadTimeUnit>,
    pub sustainable: bool,
    pub unit_type: Option<String>,
    pub current_available: Option<u32>,
    pub ingredients: Vec<String>,
    pub flavor_type: Vec<String>,
    pub usage: Vec<String>,
    pub packaging_size: Option<String>,
    pub shelf_life: Option<String>,
    pub manufacturer_region: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Bare product with only identity and name set.
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id, name: name.into(), category: String::new(), manufacturer: String::new(),
            price: None, unit_price: None, rating: None, product_type: String::new(),
            min_order_quantity: 0, lead_time: String::new(), lead_time_unit: None,
            sustainable: false, unit_type: None, current_available: None,
            ingredients: vec![], flavor_type: vec![], usage: vec![],
            packaging_size: None, shelf_life: None, manufacturer_region: None, created_at: None,
        }
    }

    /// Dedicated unit price, falling back to the display price.
    pub fn numeric_price(&self) -> Option<Decimal> {
        self.unit_price.or_else(|| self.price.as_deref().and_then(parse_price))
    }

    /// Rating usable for ordering. NaN counts as missing.
    pub fn comparable_rating(&self) -> Option<f64> { self.rating.filter(|r| !r.is_nan()) }

    /// Non-blank values of `facet`: at most one for scalar facets.
    pub fn facet_values(&self, facet: Facet) -> Vec<&str> {
        let values: &[String] = match facet {
            Facet::UnitType => self.unit_type.as_slice(),
            Facet::FlavorType => &self.flavor_type,
            Facet::Usage => &self.usage,
            Facet::ManufacturerRegion => self.manufacturer_region.as_slice(),
            Facet::Ingredients => &self.ingredients,
            Facet::ShelfLife => self.shelf_life.as_slice(),
            Facet::PackagingSize => self.packaging_size.as_slice(),
        };
        values.iter().map(String::as_str).filter(|s| !s.trim().is_empty()).collect()
    }
}

/// Filterable product attribute with a finite set of observed values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Facet {
    UnitType,
    FlavorType,
    Usage,
    ManufacturerRegion,
    Ingredients,
    ShelfLife,
    PackagingSize,
}

impl Facet {
    pub const ALL: [Facet; 7] = [
        Facet::UnitType, Facet::FlavorType, Facet::Usage, Facet::ManufacturerRegion,
        Facet::Ingredients, Facet::ShelfLife, Facet::PackagingSize,
    ];
}
