//! Repository Layer
//!
//! Data access abstractions and implementations.

mod container_repo;
mod db;
mod equipment_repo;
mod feed;
mod membership_repo;
mod reassign;
mod traits;

#[cfg(test)]
mod tests;

pub use container_repo::ContainerRepository;
pub use db::{init_db, DbState, SharedConnection};
pub use equipment_repo::EquipmentRepository;
pub use feed::{OrgFeed, OrgSnapshot};
pub use membership_repo::MembershipRepository;
pub use reassign::SqliteReassignmentStore;
pub use traits::{OrganizationRepository, ReassignmentStore, Repository};
