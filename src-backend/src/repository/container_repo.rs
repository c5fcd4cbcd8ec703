//! Container Repository
//!
//! SQLite-backed CRUD for containers.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{Container, DomainError, DomainResult};
use super::db::{not_initialized, SharedConnection};
use super::traits::{OrganizationRepository, Repository};

const COLUMNS: &str = "id, organization_id, owner_id, name, color, details, updated_at";

pub struct ContainerRepository {
    conn: SharedConnection,
}

impl ContainerRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<Container> for ContainerRepository {
    async fn create(&self, entity: &Container) -> DomainResult<Container> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let id = (entity.id != 0).then_some(entity.id);
        let now = chrono::Utc::now().timestamp_millis();
        conn.execute(
            "INSERT INTO containers
             (id, organization_id, owner_id, name, color, details, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                id,
                entity.organization_id,
                entity.owner_id,
                entity.name,
                entity.color,
                entity.details,
                now
            ],
        )?;

        let mut created = entity.clone();
        created.id = conn.last_insert_rowid() as u32;
        created.updated_at = Some(now);
        Ok(created)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Container>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let container = conn
            .query_row(
                &format!("SELECT {} FROM containers WHERE id = ?", COLUMNS),
                params![id],
                row_to_container,
            )
            .optional()?;
        Ok(container)
    }

    async fn list(&self) -> DomainResult<Vec<Container>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM containers ORDER BY id", COLUMNS))?;
        let containers = stmt
            .query_map([], row_to_container)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(containers)
    }

    async fn update(&self, entity: &Container) -> DomainResult<Container> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let now = chrono::Utc::now().timestamp_millis();
        let changed = conn.execute(
            "UPDATE containers SET owner_id = ?, name = ?, color = ?, details = ?, updated_at = ?
             WHERE id = ?",
            params![entity.owner_id, entity.name, entity.color, entity.details, now, entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Container {} not found", entity.id)));
        }

        let mut updated = entity.clone();
        updated.updated_at = Some(now);
        Ok(updated)
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        // Contents stay with the holder, loose
        let tx = conn.transaction()?;
        tx.execute(
            "UPDATE equipment SET container_id = NULL, updated_at = ? WHERE container_id = ?",
            params![chrono::Utc::now().timestamp_millis(), id],
        )?;
        tx.execute("DELETE FROM containers WHERE id = ?", params![id])?;
        tx.commit()?;
        Ok(())
    }
}

#[async_trait]
impl OrganizationRepository<Container> for ContainerRepository {
    async fn list_by_organization(&self, organization_id: u32) -> DomainResult<Vec<Container>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM containers WHERE organization_id = ? ORDER BY id",
            COLUMNS
        ))?;
        let containers = stmt
            .query_map(params![organization_id], row_to_container)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(containers)
    }
}

pub(super) fn row_to_container(row: &rusqlite::Row) -> rusqlite::Result<Container> {
    Ok(Container {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        owner_id: row.get(2)?,
        name: row.get(3)?,
        color: row.get(4)?,
        details: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
