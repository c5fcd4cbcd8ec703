//! Reassignment Store
//!
//! SQLite implementation of the atomic ownership changes issued on drop.
//! Each call runs in one transaction; any failure rolls every row back.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Transaction};
use std::sync::Arc;

use crate::domain::{DomainError, DomainResult};
use super::db::{not_initialized, SharedConnection};
use super::feed::OrgFeed;
use super::traits::ReassignmentStore;

pub struct SqliteReassignmentStore {
    conn: SharedConnection,
    feed: Option<Arc<OrgFeed>>,
}

impl SqliteReassignmentStore {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn, feed: None }
    }

    /// Refresh `feed` after every successful commit
    pub fn with_feed(mut self, feed: Arc<OrgFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    async fn publish(&self) {
        if let Some(feed) = &self.feed {
            if let Err(e) = feed.refresh().await {
                log::warn!("feed refresh after reassignment failed: {}", e);
            }
        }
    }
}

fn organization_of(tx: &Transaction<'_>, table: &str, id: u32) -> DomainResult<Option<u32>> {
    let org = tx
        .query_row(
            &format!("SELECT organization_id FROM {} WHERE id = ?", table),
            params![id],
            |row| row.get::<_, u32>(0),
        )
        .optional()?;
    Ok(org)
}

/// `(organization_id, owner_id)` of a container
fn container_holder(tx: &Transaction<'_>, id: u32) -> DomainResult<Option<(u32, u32)>> {
    let holder = tx
        .query_row(
            "SELECT organization_id, owner_id FROM containers WHERE id = ?",
            params![id],
            |row| Ok((row.get::<_, u32>(0)?, row.get::<_, u32>(1)?)),
        )
        .optional()?;
    Ok(holder)
}

fn require_membership(tx: &Transaction<'_>, owner_id: u32) -> DomainResult<u32> {
    organization_of(tx, "memberships", owner_id)?
        .ok_or_else(|| DomainError::NotFound(format!("Membership {} not found", owner_id)))
}

#[async_trait]
impl ReassignmentStore for SqliteReassignmentStore {
    async fn reassign_equipment(
        &self,
        equipment_ids: &[u32],
        owner_id: u32,
        container_id: Option<u32>,
    ) -> DomainResult<usize> {
        if equipment_ids.is_empty() {
            return Ok(0);
        }

        let written = {
            let mut guard = self.conn.lock().await;
            let conn = guard.as_mut().ok_or_else(not_initialized)?;
            let tx = conn.transaction()?;

            let org = require_membership(&tx, owner_id)?;
            if let Some(cid) = container_id {
                match container_holder(&tx, cid)? {
                    Some((container_org, holder))
                        if container_org == org && holder == owner_id => {}
                    Some((container_org, _)) if container_org != org => {
                        return Err(DomainError::InvalidInput(format!(
                            "Container {} belongs to another organization",
                            cid
                        )))
                    }
                    Some((_, holder)) => {
                        return Err(DomainError::InvalidInput(format!(
                            "Container {} is held by membership {}, not {}",
                            cid, holder, owner_id
                        )))
                    }
                    None => {
                        return Err(DomainError::NotFound(format!("Container {} not found", cid)))
                    }
                }
            }

            let now = chrono::Utc::now().timestamp_millis();
            for id in equipment_ids {
                let changed = tx.execute(
                    "UPDATE equipment SET owner_id = ?, container_id = ?, updated_at = ?
                     WHERE id = ? AND organization_id = ?",
                    params![owner_id, container_id, now, id, org],
                )?;
                if changed == 0 {
                    // Dropping `tx` rolls back the rows already written
                    return Err(DomainError::NotFound(format!("Equipment {} not found", id)));
                }
            }
            tx.commit()?;
            equipment_ids.len()
        };

        log::info!(
            "moved {} equipment record(s) to membership {} (container {:?})",
            written,
            owner_id,
            container_id
        );
        self.publish().await;
        Ok(written)
    }

    async fn reassign_container(&self, container_id: u32, owner_id: u32) -> DomainResult<usize> {
        let nested = {
            let mut guard = self.conn.lock().await;
            let conn = guard.as_mut().ok_or_else(not_initialized)?;
            let tx = conn.transaction()?;

            let org = require_membership(&tx, owner_id)?;
            let now = chrono::Utc::now().timestamp_millis();
            let changed = tx.execute(
                "UPDATE containers SET owner_id = ?, updated_at = ?
                 WHERE id = ? AND organization_id = ?",
                params![owner_id, now, container_id, org],
            )?;
            if changed == 0 {
                return Err(DomainError::NotFound(format!("Container {} not found", container_id)));
            }
            // Contents keep their container and follow its new holder
            let nested = tx.execute(
                "UPDATE equipment SET owner_id = ?, updated_at = ? WHERE container_id = ?",
                params![owner_id, now, container_id],
            )?;
            tx.commit()?;
            nested
        };

        log::info!(
            "moved container {} with {} record(s) to membership {}",
            container_id,
            nested,
            owner_id
        );
        self.publish().await;
        Ok(nested)
    }
}
