//! Catalog storage: Postgres through sqlx, or an in-memory catalog seeded
//! from a JSON file.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use crate::config::CatalogSource;
use crate::domain::catalog::Product;
use crate::domain::events::DomainEvent;
use crate::domain::favorites::Favorites;
use crate::domain::value_objects::{PageRequest, ProductId};
use crate::payload::{parse_catalog, PayloadError, ProductsPage};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: String, pub name: String, pub category: String, pub manufacturer: String,
    pub price: Option<String>, pub unit_price: Option<Decimal>, pub rating: Option<f64>,
    pub product_type: String, pub min_order_quantity: i32, pub lead_time: String,
    pub lead_time_unit: Option<String>, pub sustainable: bool, pub unit_type: Option<String>,
    pub current_available: Option<i32>, pub ingredients: Vec<String>, pub flavor_type: Vec<String>,
    pub usage: Vec<String>, pub packaging_size: Option<String>, pub shelf_life: Option<String>,
    pub manufacturer_region: Option<String>, pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProductRow> for Product {
    type Error = PayloadError;

    fn try_from(r: ProductRow) -> Result<Self, Self::Error> {
        let id = ProductId::new(&r.id).map_err(|_| PayloadError::MissingId)?;
        Ok(Product {
            id, name: r.name, category: r.category, manufacturer: r.manufacturer,
            price: r.price, unit_price: r.unit_price, rating: r.rating, product_type: r.product_type,
            min_order_quantity: u32::try_from(r.min_order_quantity).unwrap_or(0),
            lead_time: r.lead_time,
            lead_time_unit: r.lead_time_unit.and_then(|u| u.parse().ok()),
            sustainable: r.sustainable, unit_type: r.unit_type,
            current_available: r.current_available.and_then(|n| u32::try_from(n).ok()),
            ingredients: r.ingredients, flavor_type: r.flavor_type, usage: r.usage,
            packaging_size: r.packaging_size, shelf_life: r.shelf_life,
            manufacturer_region: r.manufacturer_region, created_at: r.created_at,
        })
    }
}

fn rows_to_products(rows: Vec<ProductRow>) -> Vec<Product> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            Product::try_from(row).map_err(|e| tracing::warn!(id = %id, error = %e, "product row skipped")).ok()
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: Vec<Product>,
    favorites: RwLock<HashMap<String, Favorites>>,
}

#[derive(Clone, Debug)]
pub enum CatalogStore {
    Postgres(PgPool),
    Memory(Arc<MemoryCatalog>),
}

const SELECT_PRODUCTS: &str = "SELECT * FROM products ORDER BY created_at DESC NULLS LAST, id";

impl CatalogStore {
    pub async fn connect(source: &CatalogSource) -> Result<Self, StorageError> {
        match source {
            CatalogSource::Postgres { url } => {
                let db = PgPoolOptions::new().max_connections(10).connect(url).await?;
                sqlx::migrate!("./migrations").run(&db).await?;
                Ok(Self::Postgres(db))
            }
            CatalogSource::File { path } => {
                let json = tokio::fs::read_to_string(path).await?;
                let products = parse_catalog(&json)?;
                tracing::info!(path = %path.display(), products = products.len(), "catalog loaded");
                Ok(Self::in_memory(products))
            }
        }
    }

    pub fn in_memory(products: Vec<Product>) -> Self {
        Self::Memory(Arc::new(MemoryCatalog { products, favorites: RwLock::default() }))
    }

    /// Every product, in storage order.
    pub async fn all_products(&self) -> Result<Vec<Product>, StorageError> {
        match self {
            Self::Postgres(db) => {
                let rows = sqlx::query_as::<_, ProductRow>(SELECT_PRODUCTS).fetch_all(db).await?;
                Ok(rows_to_products(rows))
            }
            Self::Memory(m) => Ok(m.products.clone()),
        }
    }

    /// One server page of products; the page is clamped like catalog queries.
    pub async fn product_page(&self, request: PageRequest) -> Result<ProductsPage, StorageError> {
        match self {
            Self::Postgres(db) => {
                let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products").fetch_one(db).await?;
                let window = request.clamp(usize::try_from(total.0).unwrap_or(0));
                let rows = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCTS} LIMIT $1 OFFSET $2"))
                    .bind(request.page_size() as i64).bind(window.start as i64)
                    .fetch_all(db).await?;
                Ok(ProductsPage { products: rows_to_products(rows), total: total.0.max(0) as usize, page: window.page, pages: window.page_count })
            }
            Self::Memory(m) => {
                let window = request.clamp(m.products.len());
                Ok(ProductsPage {
                    products: m.products[window.start..window.end].to_vec(),
                    total: m.products.len(), page: window.page, pages: window.page_count,
                })
            }
        }
    }

    /// Distinct non-blank categories, sorted.
    pub async fn categories(&self) -> Result<Vec<String>, StorageError> {
        match self {
            Self::Postgres(db) => {
                let rows: Vec<(String,)> = sqlx::query_as("SELECT DISTINCT category FROM products WHERE btrim(category) <> '' ORDER BY category")
                    .fetch_all(db).await?;
                Ok(rows.into_iter().map(|r| r.0).collect())
            }
            Self::Memory(m) => {
                let categories: BTreeSet<&str> = m.products.iter().map(|p| p.category.as_str()).filter(|c| !c.trim().is_empty()).collect();
                Ok(categories.into_iter().map(String::from).collect())
            }
        }
    }

    pub async fn favorites(&self, owner: &str) -> Result<Favorites, StorageError> {
        match self {
            Self::Postgres(db) => {
                let rows: Vec<(String,)> = sqlx::query_as("SELECT product_id FROM favorites WHERE owner_id = $1 ORDER BY product_id")
                    .bind(owner).fetch_all(db).await?;
                Ok(Favorites::restore(owner, rows.into_iter().filter_map(|r| ProductId::new(r.0).ok())))
            }
            Self::Memory(m) => {
                let all = m.favorites.read().await;
                Ok(all.get(owner).map_or_else(|| Favorites::new(owner), |f| Favorites::restore(owner, f.ids().cloned())))
            }
        }
    }

    /// Marks `id` as a favorite of `owner`. Returns the raised event, or
    /// `None` when it already was one.
    pub async fn add_favorite(&self, owner: &str, id: &ProductId) -> Result<Option<DomainEvent>, StorageError> {
        match self {
            Self::Postgres(db) => {
                let inserted = sqlx::query(
                    "INSERT INTO favorites (owner_id, product_id, created_at) VALUES ($1, $2, NOW()) ON CONFLICT (owner_id, product_id) DO NOTHING",
                )
                .bind(owner).bind(id.as_str()).execute(db).await?.rows_affected();
                Ok((inserted > 0).then(|| DomainEvent::favorite_added(owner, id)))
            }
            Self::Memory(m) => {
                let mut all = m.favorites.write().await;
                let favorites = all.entry(owner.to_string()).or_insert_with(|| Favorites::new(owner));
                favorites.add(id.clone());
                Ok(favorites.take_events().pop())
            }
        }
    }

    /// Drops `id` from the favorites of `owner`. Returns the raised event, or
    /// `None` when it was not a favorite.
    pub async fn remove_favorite(&self, owner: &str, id: &ProductId) -> Result<Option<DomainEvent>, StorageError> {
        match self {
            Self::Postgres(db) => {
                let deleted = sqlx::query("DELETE FROM favorites WHERE owner_id = $1 AND product_id = $2")
                    .bind(owner).bind(id.as_str()).execute(db).await?.rows_affected();
                Ok((deleted > 0).then(|| DomainEvent::favorite_removed(owner, id)))
            }
            Self::Memory(m) => {
                let mut all = m.favorites.write().await;
                let Some(favorites) = all.get_mut(owner) else { return Ok(None) };
                match favorites.remove(id) {
                    Ok(()) => Ok(favorites.take_events().pop()),
                    Err(_) => Ok(None),
                }
            }
        }
    }
}
