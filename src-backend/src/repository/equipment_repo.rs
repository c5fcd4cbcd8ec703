//! Equipment Repository
//!
//! SQLite-backed CRUD for individual equipment records.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainError, DomainResult, Equipment};
use super::db::{not_initialized, SharedConnection};
use super::traits::{OrganizationRepository, Repository};

const COLUMNS: &str =
    "id, organization_id, owner_id, container_id, name, image, color, details, updated_at";

pub struct EquipmentRepository {
    conn: SharedConnection,
}

impl EquipmentRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Records currently inside a container
    pub async fn list_in_container(&self, container_id: u32) -> DomainResult<Vec<Equipment>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM equipment WHERE container_id = ? ORDER BY id",
            COLUMNS
        ))?;
        let records = stmt
            .query_map(params![container_id], row_to_equipment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}

#[async_trait]
impl Repository<Equipment> for EquipmentRepository {
    async fn create(&self, entity: &Equipment) -> DomainResult<Equipment> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let id = (entity.id != 0).then_some(entity.id);
        let now = chrono::Utc::now().timestamp_millis();
        conn.execute(
            "INSERT INTO equipment
             (id, organization_id, owner_id, container_id, name, image, color, details, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                id,
                entity.organization_id,
                entity.owner_id,
                entity.container_id,
                entity.name,
                entity.image,
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

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Equipment>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let record = conn
            .query_row(
                &format!("SELECT {} FROM equipment WHERE id = ?", COLUMNS),
                params![id],
                row_to_equipment,
            )
            .optional()?;
        Ok(record)
    }

    async fn list(&self) -> DomainResult<Vec<Equipment>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM equipment ORDER BY id", COLUMNS))?;
        let records = stmt
            .query_map([], row_to_equipment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    async fn update(&self, entity: &Equipment) -> DomainResult<Equipment> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let now = chrono::Utc::now().timestamp_millis();
        let changed = conn.execute(
            "UPDATE equipment SET owner_id = ?, container_id = ?, name = ?, image = ?, color = ?,
             details = ?, updated_at = ?
             WHERE id = ?",
            params![
                entity.owner_id,
                entity.container_id,
                entity.name,
                entity.image,
                entity.color,
                entity.details,
                now,
                entity.id
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Equipment {} not found", entity.id)));
        }

        let mut updated = entity.clone();
        updated.updated_at = Some(now);
        Ok(updated)
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute("DELETE FROM equipment WHERE id = ?", params![id])?;
        Ok(())
    }
}

#[async_trait]
impl OrganizationRepository<Equipment> for EquipmentRepository {
    async fn list_by_organization(&self, organization_id: u32) -> DomainResult<Vec<Equipment>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM equipment WHERE organization_id = ? ORDER BY id",
            COLUMNS
        ))?;
        let records = stmt
            .query_map(params![organization_id], row_to_equipment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}

pub(super) fn row_to_equipment(row: &rusqlite::Row) -> rusqlite::Result<Equipment> {
    Ok(Equipment {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        owner_id: row.get(2)?,
        container_id: row.get(3)?,
        name: row.get(4)?,
        image: row.get(5)?,
        color: row.get(6)?,
        details: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
