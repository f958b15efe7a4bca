//! HTTP surface: product API, catalog queries and favorites.

pub mod params;

use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::fmt::Display;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::config::Config;
use crate::domain::events::{DomainEvent, EventEnvelope};
use crate::domain::favorites::{Favorites, FavoritesError};
use crate::domain::query::{query_products, QueryResult};
use crate::domain::value_objects::ProductId;
use crate::payload::ProductsPage;
use crate::storage::CatalogStore;
use params::{CatalogParams, PageParams, ParamsError};

#[derive(Clone)]
pub struct AppState {
    pub store: CatalogStore,
    pub nats: Option<async_nats::Client>,
    pub default_page_size: usize,
}

impl AppState {
    /// Opens the configured catalog store and, when configured, NATS.
    pub async fn connect(config: &Config) -> crate::Result<Self> {
        let store = CatalogStore::connect(&config.source).await?;
        let nats = match &config.nats_url {
            Some(url) => match async_nats::connect(url.as_str()).await {
                Ok(client) => Some(client),
                Err(e) => { tracing::warn!(error = %e, "NATS unavailable, events will not be published"); None }
            },
            None => None,
        };
        Ok(Self { store, nats, default_page_size: config.default_page_size })
    }
}

type ApiError = (StatusCode, String);

fn internal(e: impl Display) -> ApiError {
    tracing::error!(error = %e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn bad_request(e: ParamsError) -> ApiError { (StatusCode::BAD_REQUEST, e.to_string()) }

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "opensase-sourcing"})) }))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/categories", get(list_categories))
        .route("/api/v1/catalog", get(query_catalog))
        .route("/api/v1/favorites/:user", get(list_favorites))
        .route("/api/v1/favorites/:user/:product_id", axum::routing::put(add_favorite).delete(remove_favorite))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}

async fn list_products(State(s): State<AppState>, Query(p): Query<PageParams>) -> Result<Json<ProductsPage>, ApiError> {
    let request = p.to_request(s.default_page_size).map_err(bad_request)?;
    s.store.product_page(request).await.map(Json).map_err(internal)
}

async fn list_categories(State(s): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    s.store.categories().await.map(Json).map_err(internal)
}

async fn query_catalog(State(s): State<AppState>, Query(p): Query<CatalogParams>) -> Result<Json<QueryResult>, ApiError> {
    let spec = p.to_spec(s.default_page_size).map_err(bad_request)?;
    let favorites = match p.favorites_owner().map_err(bad_request)? {
        Some(user) => s.store.favorites(user).await.map_err(internal)?,
        None => Favorites::new(""),
    };
    let products = s.store.all_products().await.map_err(internal)?;
    let result = query_products(&products, &spec, &favorites);
    tracing::debug!(total = result.total, page = result.page, pages = result.page_count, "catalog query");
    Ok(Json(result))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesView { pub user: String, pub product_ids: Vec<ProductId> }

impl From<&Favorites> for FavoritesView {
    fn from(f: &Favorites) -> Self { Self { user: f.owner().to_string(), product_ids: f.ids().cloned().collect() } }
}

fn parse_id(raw: &str) -> Result<ProductId, ApiError> {
    ProductId::new(raw).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

async fn list_favorites(State(s): State<AppState>, Path(user): Path<String>) -> Result<Json<FavoritesView>, ApiError> {
    let favorites = s.store.favorites(&user).await.map_err(internal)?;
    Ok(Json(FavoritesView::from(&favorites)))
}

async fn add_favorite(State(s): State<AppState>, Path((user, product_id)): Path<(String, String)>) -> Result<Json<FavoritesView>, ApiError> {
    let id = parse_id(&product_id)?;
    let event = s.store.add_favorite(&user, &id).await.map_err(internal)?;
    publish(&s.nats, event).await;
    let favorites = s.store.favorites(&user).await.map_err(internal)?;
    Ok(Json(FavoritesView::from(&favorites)))
}

async fn remove_favorite(State(s): State<AppState>, Path((user, product_id)): Path<(String, String)>) -> Result<Json<FavoritesView>, ApiError> {
    let id = parse_id(&product_id)?;
    let Some(event) = s.store.remove_favorite(&user, &id).await.map_err(internal)? else {
        return Err((StatusCode::NOT_FOUND, FavoritesError::NotFavorited(id).to_string()));
    };
    publish(&s.nats, Some(event)).await;
    let favorites = s.store.favorites(&user).await.map_err(internal)?;
    Ok(Json(FavoritesView::from(&favorites)))
}

/// Best effort: a failed publish is logged, never surfaced to the caller.
async fn publish(nats: &Option<async_nats::Client>, events: impl IntoIterator<Item = DomainEvent>) {
    let Some(client) = nats else { return };
    for event in events {
        let payload = match serde_json::to_vec(&EventEnvelope::wrap(&event)) {
            Ok(p) => p,
            Err(e) => { tracing::warn!(error = %e, "event serialization failed"); continue; }
        };
        if let Err(e) = client.publish(event.subject().to_string(), payload.into()).await {
            tracing::warn!(subject = event.subject(), error = %e, "event publish failed");
        }
    }
}
