//! Domain events
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use crate::domain::value_objects::ProductId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "aggregate", content = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    Favorite(FavoriteEvent),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FavoriteEvent {
    Added { owner: String, product_id: ProductId },
    Removed { owner: String, product_id: ProductId },
}

impl DomainEvent {
    pub fn favorite_added(owner: &str, product_id: &ProductId) -> Self {
        DomainEvent::Favorite(FavoriteEvent::Added { owner: owner.to_string(), product_id: product_id.clone() })
    }

    pub fn favorite_removed(owner: &str, product_id: &ProductId) -> Self {
        DomainEvent::Favorite(FavoriteEvent::Removed { owner: owner.to_string(), product_id: product_id.clone() })
    }

    /// NATS subject the event is published on.
    pub fn subject(&self) -> &'static str {
        match self {
            DomainEvent::Favorite(FavoriteEvent::Added { .. }) => "sourcing.favorites.added",
            DomainEvent::Favorite(FavoriteEvent::Removed { .. }) => "sourcing.favorites.removed",
        }
    }
}

/// Event as it goes over the wire.
#[derive(Clone, Debug, Serialize)]
pub struct EventEnvelope<'a> {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: &'a DomainEvent,
}

impl<'a> EventEnvelope<'a> {
    pub fn wrap(event: &'a DomainEvent) -> Self { Self { id: Uuid::now_v7(), occurred_at: Utc::now(), event } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let event = DomainEvent::favorite_added("buyer-1", &ProductId::from(7u64));
        assert_eq!(event.subject(), "sourcing.favorites.added");
        let json = serde_json::to_value(EventEnvelope::wrap(&event)).unwrap();
        assert_eq!(json["aggregate"], "favorite");
        assert_eq!(json["event"]["kind"], "added");
        assert_eq!(json["event"]["product_id"], "7");
        assert!(json["id"].is_string());
    }
}
