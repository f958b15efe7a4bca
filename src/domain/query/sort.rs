//! Sort keys for catalog results

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use crate::domain::catalog::Product;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    Newest,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::NameAsc, SortKey::NameDesc, SortKey::PriceAsc,
        SortKey::PriceDesc, SortKey::RatingDesc, SortKey::Newest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::RatingDesc => "rating-desc",
            SortKey::Newest => "newest",
        }
    }

    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::NameAsc => cmp_ignore_case(&a.name, &b.name),
            SortKey::NameDesc => cmp_ignore_case(&b.name, &a.name),
            SortKey::PriceAsc => missing_last(a.numeric_price(), b.numeric_price(), |x, y| x.cmp(&y)),
            SortKey::PriceDesc => missing_last(a.numeric_price(), b.numeric_price(), |x, y| y.cmp(&x)),
            SortKey::RatingDesc => missing_last(a.comparable_rating(), b.comparable_rating(), |x, y| y.total_cmp(&x)),
            SortKey::Newest => missing_last(a.created_at, b.created_at, |x, y| y.cmp(&x)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub struct UnknownSortKey(pub String);
impl std::error::Error for UnknownSortKey {}
impl fmt::Display for UnknownSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Unknown sort key: {}", self.0) }
}

impl FromStr for SortKey {
    type Err = UnknownSortKey;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SortKey::ALL.into_iter().find(|k| k.as_str() == s).ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

/// Stable sort; equal elements keep their input order.
pub fn sort_products(products: &mut [&Product], key: SortKey) {
    products.sort_by(|a, b| key.compare(a, b));
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars().flat_map(char::to_lowercase).cmp(b.chars().flat_map(char::to_lowercase))
}

fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ProductId;
    use chrono::{TimeZone, Utc};

    fn product(id: u64, name: &str) -> Product { Product::new(ProductId::from(id), name) }

    fn ids(products: &[&Product]) -> Vec<String> { products.iter().map(|p| p.id.to_string()).collect() }

    #[test]
    fn test_parse_sort_key() {
        for key in SortKey::ALL { assert_eq!(key.as_str().parse::<SortKey>(), Ok(key)); }
        assert_eq!("price-high".parse::<SortKey>(), Err(UnknownSortKey("price-high".into())));
        assert_eq!(SortKey::default(), SortKey::NameAsc);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let (a, b, c) = (product(1, "banana"), product(2, "Apple"), product(3, "cherry"));
        let mut list = vec![&a, &b, &c];
        sort_products(&mut list, SortKey::NameAsc);
        assert_eq!(ids(&list), ["2", "1", "3"]);
        sort_products(&mut list, SortKey::NameDesc);
        assert_eq!(ids(&list), ["3", "1", "2"]);
    }

    #[test]
    fn test_price_sort_missing_last() {
        let mut a = product(1, "A");
        a.price = Some("$2".into());
        let mut b = product(2, "B");
        b.price = Some("$1".into());
        let c = product(3, "C");
        let mut list = vec![&c, &a, &b];
        sort_products(&mut list, SortKey::PriceAsc);
        assert_eq!(ids(&list), ["2", "1", "3"]);
        sort_products(&mut list, SortKey::PriceDesc);
        assert_eq!(ids(&list), ["1", "2", "3"]);
    }

    #[test]
    fn test_rating_sort_is_stable() {
        let mut ps: Vec<Product> = (1..=5).map(|i| product(i, "P")).collect();
        ps[0].rating = Some(4.0);
        ps[1].rating = Some(5.0);
        ps[2].rating = Some(4.0);
        ps[3].rating = None;
        ps[4].rating = Some(4.0);
        let mut list: Vec<&Product> = ps.iter().collect();
        sort_products(&mut list, SortKey::RatingDesc);
        assert_eq!(ids(&list), ["2", "1", "3", "5", "4"]);
    }

    #[test]
    fn test_newest_first() {
        let mut old = product(1, "Old");
        old.created_at = Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        let mut new = product(2, "New");
        new.created_at = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let undated = product(3, "Undated");
        let mut list = vec![&undated, &old, &new];
        sort_products(&mut list, SortKey::Newest);
        assert_eq!(ids(&list), ["2", "1", "3"]);
    }
}
