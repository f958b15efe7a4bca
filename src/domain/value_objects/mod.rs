//! Value Objects for the sourcing catalog

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparable product identity.
///
/// Product ids reach the catalog from several sources and arrive either as
/// JSON strings or JSON numbers. Every id is normalized here once, so `7` and
/// `"7"` are the same `ProductId` everywhere downstream.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ProductIdError> {
        let value = value.as_ref().trim();
        if value.is_empty() { return Err(ProductIdError::Empty); }
        Ok(Self(value.to_string()))
    }

    /// Normalizes a JSON number. Integral values render without a fraction.
    pub fn from_number(value: &serde_json::Number) -> Self {
        if let Some(n) = value.as_i64() { return Self(n.to_string()); }
        if let Some(n) = value.as_u64() { return Self(n.to_string()); }
        match value.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => Self(format!("{}", f as i64)),
            _ => Self(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self { Self(value.to_string()) }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self { Self(value.to_string()) }
}

impl FromStr for ProductId {
    type Err = ProductIdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr { Text(String), Number(serde_json::Number) }
        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => Self::new(s).map_err(de::Error::custom),
            Repr::Number(n) => Ok(Self::from_number(&n)),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum ProductIdError { Empty }
impl std::error::Error for ProductIdError {}
impl fmt::Display for ProductIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Product id empty") }
}

/// Extracts a unit price from a display-formatted price string.
///
/// The first numeric token wins: `"$2"` is 2, `"₦1,500.00"` is 1500 and
/// `"2.5 - 3.0"` is 2.5. Returns `None` when the string holds no number.
pub fn parse_price(display: &str) -> Option<Decimal> {
    let start = display.find(|c: char| c.is_ascii_digit())?;
    let negative = display[..start].trim() == "-";
    let token: String = display[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    // "1.2.3" keeps only the leading "1.2"
    let token = match token.match_indices('.').nth(1) {
        Some((second_dot, _)) => &token[..second_dot],
        None => token.as_str(),
    };
    let amount = Decimal::from_str(token.trim_end_matches('.')).ok()?;
    Some(if negative { -amount } else { amount })
}

/// Unit of a manufacturer's quoted lead time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadTimeUnit { Days, Weeks, Months }

impl FromStr for LeadTimeUnit {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(Self::Days),
            "week" | "weeks" => Ok(Self::Weeks),
            "month" | "months" => Ok(Self::Months),
            _ => Err(()),
        }
    }
}

pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Requested page of a result set. Both fields are at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest { page: usize, page_size: usize }

/// A page request resolved against a concrete result count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow { pub page: usize, pub page_count: usize, pub start: usize, pub end: usize }

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self { Self { page: page.max(1), page_size: page_size.max(1) } }
    pub fn first(page_size: usize) -> Self { Self::new(1, page_size) }
    pub fn page(&self) -> usize { self.page }
    pub fn page_size(&self) -> usize { self.page_size }

    /// Clamps the page into `[1, page_count]` and yields the slice bounds.
    pub fn clamp(&self, total: usize) -> PageWindow {
        let page_count = total.div_ceil(self.page_size).max(1);
        let page = self.page.min(page_count);
        let start = (page - 1).saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);
        PageWindow { page, page_count, start, end }
    }
}

impl Default for PageRequest { fn default() -> Self { Self::first(DEFAULT_PAGE_SIZE) } }
