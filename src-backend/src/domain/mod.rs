//! Domain Layer
//!
//! Organization inventory records and core abstractions.
//! This layer has no storage dependencies (rusqlite only appears in error conversion).

mod collation;
mod container;
mod entity;
mod equipment;
mod membership;

pub use collation::{collation_key, compare_names};
pub use container::Container;
pub use entity::{DomainError, DomainResult, Entity};
pub use equipment::Equipment;
pub use membership::{Membership, MembershipKind};
