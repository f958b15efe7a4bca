//! Domain layer: value objects, the product read model, the catalog query
//! engine and the favorites aggregate.
pub mod catalog;
pub mod events;
pub mod favorites;
pub mod query;
pub mod value_objects;
