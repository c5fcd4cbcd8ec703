//! Organization Feed
//!
//! Reactive read of the three record sets an inventory screen needs.
//! Subscribers receive a fresh snapshot every time `refresh` runs; writes
//! elsewhere call `refresh` when they land, so readers converge eventually.

use tokio::sync::watch;

use crate::domain::{Container, DomainResult, Equipment, Membership};
use super::container_repo::ContainerRepository;
use super::db::SharedConnection;
use super::equipment_repo::EquipmentRepository;
use super::membership_repo::MembershipRepository;
use super::traits::OrganizationRepository;

/// Everything one organization's screens aggregate from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrgSnapshot {
    pub organization_id: u32,
    /// Bumped on every refresh
    pub revision: u64,
    pub memberships: Vec<Membership>,
    pub containers: Vec<Container>,
    pub equipment: Vec<Equipment>,
}

pub struct OrgFeed {
    organization_id: u32,
    memberships: MembershipRepository,
    containers: ContainerRepository,
    equipment: EquipmentRepository,
    tx: watch::Sender<OrgSnapshot>,
}

impl OrgFeed {
    pub fn new(conn: SharedConnection, organization_id: u32) -> Self {
        let (tx, _rx) = watch::channel(OrgSnapshot {
            organization_id,
            ..Default::default()
        });
        Self {
            organization_id,
            memberships: MembershipRepository::new(conn.clone()),
            containers: ContainerRepository::new(conn.clone()),
            equipment: EquipmentRepository::new(conn),
            tx,
        }
    }

    pub fn organization_id(&self) -> u32 {
        self.organization_id
    }

    pub fn subscribe(&self) -> watch::Receiver<OrgSnapshot> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> OrgSnapshot {
        self.tx.borrow().clone()
    }

    /// Re-read all three sets and publish them
    pub async fn refresh(&self) -> DomainResult<()> {
        let memberships = self.memberships.list_by_organization(self.organization_id).await?;
        let containers = self.containers.list_by_organization(self.organization_id).await?;
        let equipment = self.equipment.list_by_organization(self.organization_id).await?;

        self.tx.send_modify(|snapshot| {
            snapshot.revision += 1;
            snapshot.memberships = memberships;
            snapshot.containers = containers;
            snapshot.equipment = equipment;
        });
        log::debug!("org {} feed refreshed", self.organization_id);
        Ok(())
    }
}
