//! Domain aggregates exchanged with the REST backend.

pub mod address;
pub mod customer;
pub mod order;
pub mod product;
pub mod statistics;
pub mod types;

/// Entities that the backend stores under a numeric identifier.
///
/// Presence of the identifier decides between update (`PUT /{id}`) and
/// create (`POST`).
pub trait Entity {
    fn entity_id(&self) -> Option<i64>;
}
