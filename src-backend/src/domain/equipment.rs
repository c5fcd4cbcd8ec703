//! Equipment Entity
//!
//! One physical piece of equipment. Records sharing a name under the same
//! holder are shown as a single stack by the client.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: u32,
    pub organization_id: u32,
    /// Membership holding the record (also set while inside a container)
    pub owner_id: u32,
    /// Container the record sits in (None = held directly)
    pub container_id: Option<u32>,
    pub name: String,
    pub image: Option<String>,
    pub color: Option<String>,
    pub details: Option<String>,
    /// Milliseconds since epoch of the last write
    pub updated_at: Option<i64>,
}

impl Equipment {
    pub fn new(id: u32, organization_id: u32, owner_id: u32, name: String) -> Self {
        Self {
            id,
            organization_id,
            owner_id,
            container_id: None,
            name,
            image: None,
            color: None,
            details: None,
            updated_at: None,
        }
    }

    /// Place the record inside a container
    pub fn in_container(mut self, container_id: u32) -> Self {
        self.container_id = Some(container_id);
        self
    }

    pub fn is_loose(&self) -> bool {
        self.container_id.is_none()
    }
}

impl Entity for Equipment {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn organization_id(&self) -> u32 {
        self.organization_id
    }
}
