//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use crate::domain::{DomainResult, Entity};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity (id 0 lets the backend assign one)
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}

/// Extension for repositories whose records are scoped to an organization
#[async_trait]
pub trait OrganizationRepository<T: Entity>: Repository<T> {
    async fn list_by_organization(&self, organization_id: u32) -> DomainResult<Vec<T>>;
}

/// Atomic ownership changes behind a drop.
///
/// Both operations are all-or-nothing: either every row is written or none.
#[async_trait]
pub trait ReassignmentStore: Send + Sync {
    /// Move the given equipment records to `owner_id`, inside `container_id`
    /// or held directly when `None`. Returns the number of records written.
    async fn reassign_equipment(
        &self,
        equipment_ids: &[u32],
        owner_id: u32,
        container_id: Option<u32>,
    ) -> DomainResult<usize>;

    /// Move a container to `owner_id` along with every record inside it.
    /// Returns the number of nested records written.
    async fn reassign_container(&self, container_id: u32, owner_id: u32) -> DomainResult<usize>;
}
