//! Membership Entity
//!
//! A holder of equipment inside an organization: either a person or a
//! shared storage location.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MembershipKind {
    /// A person in the organization
    #[default]
    Member,
    /// A storage location (shelf, van, locker)
    Storage,
}

impl MembershipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipKind::Member => "member",
            MembershipKind::Storage => "storage",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "storage" => MembershipKind::Storage,
            _ => MembershipKind::Member,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: u32,
    pub organization_id: u32,
    /// Display name of the person or storage
    pub holder_name: String,
    pub kind: MembershipKind,
}

impl Membership {
    pub fn new(id: u32, organization_id: u32, holder_name: String, kind: MembershipKind) -> Self {
        Self { id, organization_id, holder_name, kind }
    }

    pub fn display_name(&self) -> &str {
        &self.holder_name
    }
}

impl Entity for Membership {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn organization_id(&self) -> u32 {
        self.organization_id
    }
}
