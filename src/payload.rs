//! Product API payloads
//!
//! The product API is loosely typed: ids arrive as strings or numbers, prices
//! as display strings or numbers, list fields as arrays or comma-separated
//! strings. `RawProduct` accepts all of that and `narrow` turns it into a
//! strictly typed [`Product`] exactly once, at the boundary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use thiserror::Error;
use crate::domain::catalog::Product;
use crate::domain::value_objects::{parse_price, LeadTimeUnit, ProductId};

/// Scalar of unknown JSON type. Anything unexpected lands in `Other` and
/// narrows to "absent".
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Other(serde_json::Value),
}

impl RawScalar {
    pub fn text(&self) -> Option<String> {
        match self {
            RawScalar::Text(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            RawScalar::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            RawScalar::Text(s) => ProductId::new(s).ok(),
            RawScalar::Number(n) => Some(ProductId::from_number(n)),
            _ => None,
        }
    }

    pub fn decimal(&self) -> Option<Decimal> {
        match self {
            RawScalar::Text(s) => parse_price(s),
            RawScalar::Number(n) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .ok(),
            _ => None,
        }
    }

    pub fn float(&self) -> Option<f64> {
        let value = match self {
            RawScalar::Text(s) => s.trim().parse::<f64>().ok(),
            RawScalar::Number(n) => n.as_f64(),
            _ => None,
        };
        value.filter(|f| f.is_finite())
    }

    pub fn count(&self) -> Option<u32> {
        let value = match self {
            RawScalar::Text(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
            RawScalar::Number(n) => n.as_f64()?,
            _ => return None,
        };
        (value.is_finite() && value >= 0.0).then(|| value.min(u32::MAX as f64) as u32)
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            RawScalar::Text(s) => DateTime::parse_from_rfc3339(s.trim()).ok().map(|d| d.with_timezone(&Utc)),
            RawScalar::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
            _ => None,
        }
    }
}

/// List field sent either as an array or as one comma-separated string.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawList {
    Many(Vec<RawScalar>),
    Joined(String),
    Other(serde_json::Value),
}

impl RawList {
    pub fn values(&self) -> Vec<String> {
        match self {
            RawList::Many(items) => items.iter().filter_map(RawScalar::text).collect(),
            RawList::Joined(s) => s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect(),
            RawList::Other(_) => vec![],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProduct {
    #[serde(alias = "_id")]
    pub id: Option<RawScalar>,
    pub name: Option<RawScalar>,
    pub category: Option<RawScalar>,
    pub manufacturer: Option<RawScalar>,
    pub price: Option<RawScalar>,
    pub unit_price: Option<RawScalar>,
    pub rating: Option<RawScalar>,
    pub product_type: Option<RawScalar>,
    pub min_order_quantity: Option<RawScalar>,
    pub lead_time: Option<RawScalar>,
    pub lead_time_unit: Option<RawScalar>,
    pub sustainable: Option<RawScalar>,
    pub unit_type: Option<RawScalar>,
    pub current_available: Option<RawScalar>,
    pub ingredients: Option<RawList>,
    pub flavor_type: Option<RawList>,
    pub usage: Option<RawList>,
    pub packaging_size: Option<RawScalar>,
    pub shelf_life: Option<RawScalar>,
    pub manufacturer_region: Option<RawScalar>,
    pub created_at: Option<RawScalar>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("product has no usable id")]
    MissingId,
}

fn text(field: &Option<RawScalar>) -> Option<String> { field.as_ref().and_then(RawScalar::text) }
fn list(field: &Option<RawList>) -> Vec<String> { field.as_ref().map(RawList::values).unwrap_or_default() }

impl RawProduct {
    pub fn narrow(self) -> Result<Product, PayloadError> {
        let id = self.id.as_ref().and_then(RawScalar::product_id).ok_or(PayloadError::MissingId)?;
        let unit_price = self.unit_price.as_ref().and_then(RawScalar::decimal).or_else(|| match &self.price {
            Some(price @ RawScalar::Number(_)) => price.decimal(),
            _ => None,
        });
        Ok(Product {
            id,
            name: text(&self.name).unwrap_or_default(),
            category: text(&self.category).unwrap_or_default(),
            manufacturer: text(&self.manufacturer).unwrap_or_default(),
            price: text(&self.price),
            unit_price,
            rating: self.rating.as_ref().and_then(RawScalar::float),
            product_type: text(&self.product_type).unwrap_or_default(),
            min_order_quantity: self.min_order_quantity.as_ref().and_then(RawScalar::count).unwrap_or(0),
            lead_time: text(&self.lead_time).unwrap_or_default(),
            lead_time_unit: text(&self.lead_time_unit).and_then(|u| u.parse::<LeadTimeUnit>().ok()),
            sustainable: matches!(self.sustainable, Some(RawScalar::Bool(true))),
            unit_type: text(&self.unit_type),
            current_available: self.current_available.as_ref().and_then(RawScalar::count),
            ingredients: list(&self.ingredients),
            flavor_type: list(&self.flavor_type),
            usage: list(&self.usage),
            packaging_size: text(&self.packaging_size),
            shelf_life: text(&self.shelf_life),
            manufacturer_region: text(&self.manufacturer_region),
            created_at: self.created_at.as_ref().and_then(RawScalar::timestamp),
        })
    }
}

/// Narrows a batch, dropping entries without an id and repeated ids.
/// The first occurrence of an id wins and input order is kept.
pub fn narrow_products(raws: impl IntoIterator<Item = RawProduct>) -> Vec<Product> {
    let mut seen = HashSet::new();
    let mut products = Vec::new();
    for (index, raw) in raws.into_iter().enumerate() {
        match raw.narrow() {
            Ok(product) if seen.insert(product.id.clone()) => products.push(product),
            Ok(product) => tracing::warn!(index, id = %product.id, "duplicate product id skipped"),
            Err(e) => tracing::warn!(index, error = %e, "product payload skipped"),
        }
    }
    products
}

/// Paged product collection as served by the product API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductsPage<T = Product> {
    pub products: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub pages: usize,
}

/// Catalog document: a bare product array or a `ProductsPage`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Page { products: Vec<RawProduct> },
    List(Vec<RawProduct>),
}

pub fn parse_catalog(json: &str) -> Result<Vec<Product>, serde_json::Error> {
    let raws = match serde_json::from_str::<CatalogDocument>(json)? {
        CatalogDocument::Page { products } => products,
        CatalogDocument::List(products) => products,
    };
    Ok(narrow_products(raws))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawProduct { serde_json::from_value(value).unwrap() }

    #[test]
    fn test_narrow_loose_payload() {
        let p = raw(json!({
            "_id": 42,
            "name": " Cocoa Bites ",
            "category": "Snacks",
            "price": "$2.50",
            "rating": "4.5",
            "minOrderQuantity": "1,000",
            "leadTime": 3,
            "leadTimeUnit": "weeks",
            "sustainable": true,
            "ingredients": "Cocoa, Sugar ,",
            "flavorType": ["Chocolate", 7, null, ""],
            "manufacturerRegion": "West Africa",
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .narrow()
        .unwrap();
        assert_eq!(p.id, ProductId::new("42").unwrap());
        assert_eq!(p.name, "Cocoa Bites");
        assert_eq!(p.numeric_price(), Some(Decimal::new(250, 2)));
        assert_eq!(p.rating, Some(4.5));
        assert_eq!(p.min_order_quantity, 1000);
        assert_eq!(p.lead_time, "3");
        assert_eq!(p.lead_time_unit, Some(LeadTimeUnit::Weeks));
        assert!(p.sustainable);
        assert_eq!(p.ingredients, ["Cocoa", "Sugar"]);
        assert_eq!(p.flavor_type, ["Chocolate", "7"]);
        assert!(p.created_at.is_some());
    }

    #[test]
    fn test_malformed_fields_become_absent() {
        let p = raw(json!({
            "id": "p-1",
            "price": {"amount": 3},
            "rating": "great",
            "sustainable": "yes",
            "usage": {"retail": true},
            "createdAt": "last week"
        }))
        .narrow()
        .unwrap();
        assert_eq!(p.price, None);
        assert_eq!(p.rating, None);
        assert!(!p.sustainable);
        assert!(p.usage.is_empty());
        assert_eq!(p.created_at, None);
        assert_eq!(p.name, "");
    }

    #[test]
    fn test_numeric_price_keeps_display_and_unit() {
        let p = raw(json!({"id": 1, "price": 12.5})).narrow().unwrap();
        assert_eq!(p.price.as_deref(), Some("12.5"));
        assert_eq!(p.unit_price, Some(Decimal::new(125, 1)));
    }

    #[test]
    fn test_missing_id_rejected() {
        assert_eq!(raw(json!({"name": "Nameless"})).narrow(), Err(PayloadError::MissingId));
        assert_eq!(raw(json!({"id": "  "})).narrow(), Err(PayloadError::MissingId));
    }

    #[test]
    fn test_narrow_products_dedupes() {
        let products = narrow_products(vec![
            raw(json!({"id": 7, "name": "First"})),
            raw(json!({"name": "No id"})),
            raw(json!({"id": "7", "name": "Duplicate"})),
            raw(json!({"id": 8, "name": "Second"})),
        ]);
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["First", "Second"]);
    }

    #[test]
    fn test_parse_catalog_shapes() {
        let page = r#"{"products": [{"id": 1, "name": "A"}], "total": 1, "page": 1, "pages": 1}"#;
        let list = r#"[{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]"#;
        assert_eq!(parse_catalog(page).unwrap().len(), 1);
        assert_eq!(parse_catalog(list).unwrap().len(), 2);
        assert!(parse_catalog("{\"items\": 3}").is_err());
    }
}
