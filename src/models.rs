//! Screen Models
//!
//! What the reassignment screen draws: per-holder lists of equipment stacks
//! and containers, aggregated from the backend records.

use std::collections::BTreeSet;

use gearshare_lib::domain::{Container, Equipment, Membership};
use serde::Serialize;

/// Where a stack lives: directly under a holder, or inside a container
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StackScope {
    Owner(u32),
    Container(u32),
}

/// Identity of an equipment stack
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupKey {
    pub scope: StackScope,
    pub name: String,
}

impl GroupKey {
    pub fn owned(owner_id: u32, name: &str) -> Self {
        Self {
            scope: StackScope::Owner(owner_id),
            name: name.to_string(),
        }
    }

    pub fn contained(container_id: u32, name: &str) -> Self {
        Self {
            scope: StackScope::Container(container_id),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ItemId {
    Stack(GroupKey),
    Container(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ItemKind {
    Container,
    Equipment,
}

/// Same-named equipment records under one holder or container.
///
/// `selected` indexes into `records` and is what a drag moves. An empty
/// selection hides the stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentStack {
    pub key: GroupKey,
    pub records: Vec<Equipment>,
    pub selected: BTreeSet<usize>,
}

impl EquipmentStack {
    pub fn new(key: GroupKey, records: Vec<Equipment>, selected: BTreeSet<usize>) -> Self {
        debug_assert!(
            selected.iter().all(|i| *i < records.len()),
            "selection out of range for stack {:?}",
            key
        );
        Self { key, records, selected }
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|i| **i < self.records.len()).count()
    }

    pub fn is_visible(&self) -> bool {
        self.selected_count() > 0
    }

    /// Selected records, skipping indices that fell out of range
    pub fn selected_records(&self) -> Vec<&Equipment> {
        self.selected.iter().filter_map(|i| self.records.get(*i)).collect()
    }

    pub fn selected_ids(&self) -> Vec<u32> {
        self.selected_records().iter().map(|r| r.id).collect()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Image and color of the first record stand in for the whole stack
    pub fn image(&self) -> Option<&str> {
        self.records.first().and_then(|r| r.image.as_deref())
    }

    pub fn color(&self) -> Option<&str> {
        self.records.first().and_then(|r| r.color.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerItem {
    pub id: u32,
    pub owner_id: u32,
    pub name: String,
    pub color: Option<String>,
    pub details: Option<String>,
    /// Contents, grouped and sorted like a holder's list
    pub equipment: Vec<EquipmentStack>,
}

impl ContainerItem {
    pub fn from_record(record: &Container) -> Self {
        Self {
            id: record.id,
            owner_id: record.owner_id,
            name: record.name.clone(),
            color: record.color.clone(),
            details: record.details.clone(),
            equipment: Vec::new(),
        }
    }

    /// Total records inside, selected or not
    pub fn record_count(&self) -> usize {
        self.equipment.iter().map(EquipmentStack::count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Item {
    Equipment(EquipmentStack),
    Container(ContainerItem),
}

impl Item {
    pub fn id(&self) -> ItemId {
        match self {
            Item::Equipment(stack) => ItemId::Stack(stack.key.clone()),
            Item::Container(c) => ItemId::Container(c.id),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Equipment(_) => ItemKind::Equipment,
            Item::Container(_) => ItemKind::Container,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Equipment(stack) => stack.name(),
            Item::Container(c) => &c.name,
        }
    }

    /// Number shown on the tile
    pub fn display_count(&self) -> usize {
        match self {
            Item::Equipment(stack) => stack.selected_count(),
            Item::Container(c) => c.record_count(),
        }
    }

    /// Containers always render; stacks only with a non-empty selection
    pub fn is_visible(&self) -> bool {
        match self {
            Item::Equipment(stack) => stack.is_visible(),
            Item::Container(_) => true,
        }
    }

    pub fn as_container(&self) -> Option<&ContainerItem> {
        match self {
            Item::Container(c) => Some(c),
            Item::Equipment(_) => None,
        }
    }

    pub fn as_stack(&self) -> Option<&EquipmentStack> {
        match self {
            Item::Equipment(stack) => Some(stack),
            Item::Container(_) => None,
        }
    }

    pub fn color(&self) -> Option<&str> {
        match self {
            Item::Equipment(stack) => stack.color(),
            Item::Container(c) => c.color.as_deref(),
        }
    }
}

/// One holder and everything they hold at the top level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgOwnership {
    pub membership: Membership,
    pub items: Vec<Item>,
}

impl OrgOwnership {
    pub fn owner_id(&self) -> u32 {
        self.membership.id
    }

    pub fn container(&self, container_id: u32) -> Option<&ContainerItem> {
        self.items
            .iter()
            .filter_map(Item::as_container)
            .find(|c| c.id == container_id)
    }
}
