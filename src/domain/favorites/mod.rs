//! Favorites Aggregate

use std::collections::{BTreeSet, HashSet};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::ProductId;

/// Membership test the query engine uses for `favorites_only`.
pub trait FavoriteLookup {
    fn is_favorite(&self, id: &ProductId) -> bool;
}

impl FavoriteLookup for HashSet<ProductId> {
    fn is_favorite(&self, id: &ProductId) -> bool { self.contains(id) }
}

impl FavoriteLookup for BTreeSet<ProductId> {
    fn is_favorite(&self, id: &ProductId) -> bool { self.contains(id) }
}

/// One owner's set of favorite products.
#[derive(Clone, Debug)]
pub struct Favorites {
    owner: String,
    ids: BTreeSet<ProductId>,
    events: Vec<DomainEvent>,
}

impl Favorites {
    pub fn new(owner: impl Into<String>) -> Self {
        Self { owner: owner.into(), ids: BTreeSet::new(), events: vec![] }
    }

    /// Rebuilds persisted state without raising events.
    pub fn restore(owner: impl Into<String>, ids: impl IntoIterator<Item = ProductId>) -> Self {
        let mut favorites = Self::new(owner);
        favorites.ids.extend(ids);
        favorites
    }

    pub fn owner(&self) -> &str { &self.owner }
    pub fn ids(&self) -> impl Iterator<Item = &ProductId> { self.ids.iter() }
    pub fn len(&self) -> usize { self.ids.len() }
    pub fn is_empty(&self) -> bool { self.ids.is_empty() }
    pub fn contains(&self, id: &ProductId) -> bool { self.ids.contains(id) }

    /// Returns false when the id was already a favorite.
    pub fn add(&mut self, id: ProductId) -> bool {
        if !self.ids.insert(id.clone()) { return false; }
        self.raise_event(DomainEvent::favorite_added(&self.owner, &id));
        true
    }

    pub fn remove(&mut self, id: &ProductId) -> Result<(), FavoritesError> {
        if !self.ids.remove(id) { return Err(FavoritesError::NotFavorited(id.clone())); }
        self.raise_event(DomainEvent::favorite_removed(&self.owner, id));
        Ok(())
    }

    /// Flips membership and returns whether the id is now a favorite.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        match self.remove(&id) {
            Ok(()) => false,
            Err(FavoritesError::NotFavorited(id)) => self.add(id),
        }
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}

impl FavoriteLookup for Favorites {
    fn is_favorite(&self, id: &ProductId) -> bool { self.contains(id) }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FavoritesError {
    #[error("Product {0} is not a favorite")]
    NotFavorited(ProductId),
}
