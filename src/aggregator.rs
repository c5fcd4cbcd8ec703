//! Ownership Aggregation
//!
//! Folds the flat membership, container and equipment records of one
//! organization into per-holder lists of containers and equipment stacks.
//! Pure apart from the selection cache, and deterministic for a given input
//! regardless of record order.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use gearshare_lib::domain::{compare_names, Container, Equipment, Membership};

use crate::models::{ContainerItem, EquipmentStack, GroupKey, Item, OrgOwnership, StackScope};
use crate::selection::SelectionCache;

/// Aggregated holders, keyed by membership id and ordered by holder name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ownerships {
    by_id: BTreeMap<u32, OrgOwnership>,
    order: Vec<u32>,
}

impl Ownerships {
    pub fn get(&self, owner_id: u32) -> Option<&OrgOwnership> {
        self.by_id.get(&owner_id)
    }

    pub fn items(&self, owner_id: u32) -> &[Item] {
        self.by_id.get(&owner_id).map(|o| o.items.as_slice()).unwrap_or(&[])
    }

    /// Holders in display order
    pub fn ordered(&self) -> impl Iterator<Item = &OrgOwnership> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Look a container up under whichever holder has it
    pub fn container(&self, container_id: u32) -> Option<&ContainerItem> {
        self.by_id.values().find_map(|o| o.container(container_id))
    }
}

fn compare_items(a: &Item, b: &Item) -> Ordering {
    compare_names(a.name(), b.name())
        .then_with(|| a.kind().cmp(&b.kind()))
        .then_with(|| match (a, b) {
            (Item::Container(x), Item::Container(y)) => x.id.cmp(&y.id),
            (Item::Equipment(x), Item::Equipment(y)) => x.key.cmp(&y.key),
            _ => Ordering::Equal,
        })
}

fn build_stacks(
    groups: BTreeMap<GroupKey, Vec<Equipment>>,
    selection: &SelectionCache,
) -> impl Iterator<Item = EquipmentStack> + '_ {
    groups.into_iter().map(move |(key, records)| {
        let selected = selection.selection_for(&key, records.len());
        EquipmentStack::new(key, records, selected)
    })
}

/// Build every holder's list from the raw records.
///
/// Records referencing an unknown holder are skipped. Equipment pointing at
/// an unknown container falls back to its holder's top level.
pub fn aggregate(
    memberships: &[Membership],
    containers: &[Container],
    equipment: &[Equipment],
    selection: &SelectionCache,
) -> Ownerships {
    let mut by_id: BTreeMap<u32, OrgOwnership> = memberships
        .iter()
        .map(|m| {
            (
                m.id,
                OrgOwnership {
                    membership: m.clone(),
                    items: Vec::new(),
                },
            )
        })
        .collect();

    let mut boxes: BTreeMap<u32, ContainerItem> = BTreeMap::new();
    for record in containers {
        if !by_id.contains_key(&record.owner_id) {
            tracing::debug!("container {} has unknown holder {}", record.id, record.owner_id);
            continue;
        }
        boxes.insert(record.id, ContainerItem::from_record(record));
    }

    let mut sorted: Vec<&Equipment> = equipment.iter().collect();
    sorted.sort_by_key(|e| e.id);

    let mut loose: BTreeMap<GroupKey, Vec<Equipment>> = BTreeMap::new();
    let mut nested: BTreeMap<GroupKey, Vec<Equipment>> = BTreeMap::new();
    for record in sorted {
        match record.container_id.filter(|cid| boxes.contains_key(cid)) {
            Some(cid) => nested
                .entry(GroupKey::contained(cid, &record.name))
                .or_default()
                .push(record.clone()),
            None if by_id.contains_key(&record.owner_id) => loose
                .entry(GroupKey::owned(record.owner_id, &record.name))
                .or_default()
                .push(record.clone()),
            None => {
                tracing::debug!("equipment {} has unknown holder {}", record.id, record.owner_id);
            }
        }
    }

    for stack in build_stacks(nested, selection) {
        if let StackScope::Container(cid) = stack.key.scope {
            if let Some(container) = boxes.get_mut(&cid) {
                container.equipment.push(stack);
            }
        }
    }

    for (_, mut container) in boxes {
        container
            .equipment
            .sort_by(|a, b| compare_names(a.name(), b.name()).then_with(|| a.key.cmp(&b.key)));
        if let Some(owner) = by_id.get_mut(&container.owner_id) {
            owner.items.push(Item::Container(container));
        }
    }

    for stack in build_stacks(loose, selection) {
        if let StackScope::Owner(owner_id) = stack.key.scope {
            if let Some(owner) = by_id.get_mut(&owner_id) {
                owner.items.push(Item::Equipment(stack));
            }
        }
    }

    for owner in by_id.values_mut() {
        owner.items.sort_by(compare_items);
    }

    let mut order: Vec<u32> = by_id.keys().copied().collect();
    let names: HashMap<u32, &str> = memberships.iter().map(|m| (m.id, m.display_name())).collect();
    order.sort_by(|a, b| {
        let na = names.get(a).copied().unwrap_or_default();
        let nb = names.get(b).copied().unwrap_or_default();
        compare_names(na, nb).then_with(|| a.cmp(b))
    });

    Ownerships { by_id, order }
}
