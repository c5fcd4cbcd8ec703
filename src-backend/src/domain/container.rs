//! Container Entity
//!
//! A case, bag or crate owned by one membership. Equipment records may point
//! at a container; they then move together with it.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: u32,
    pub organization_id: u32,
    /// Owning membership
    pub owner_id: u32,
    pub name: String,
    /// Color (hex, e.g., "#FF5733")
    pub color: Option<String>,
    pub details: Option<String>,
    /// Milliseconds since epoch of the last write
    pub updated_at: Option<i64>,
}

impl Container {
    pub fn new(id: u32, organization_id: u32, owner_id: u32, name: String) -> Self {
        Self {
            id,
            organization_id,
            owner_id,
            name,
            color: None,
            details: None,
            updated_at: None,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }
}

impl Entity for Container {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn organization_id(&self) -> u32 {
        self.organization_id
    }
}
