//! Membership Repository
//!
//! SQLite-backed CRUD for organization memberships.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainError, DomainResult, Membership, MembershipKind};
use super::db::{not_initialized, SharedConnection};
use super::traits::{OrganizationRepository, Repository};

const COLUMNS: &str = "id, organization_id, holder_name, kind";

pub struct MembershipRepository {
    conn: SharedConnection,
}

impl MembershipRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<Membership> for MembershipRepository {
    async fn create(&self, entity: &Membership) -> DomainResult<Membership> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let id = (entity.id != 0).then_some(entity.id);
        conn.execute(
            "INSERT INTO memberships (id, organization_id, holder_name, kind) VALUES (?, ?, ?, ?)",
            params![id, entity.organization_id, entity.holder_name, entity.kind.as_str()],
        )?;

        let mut created = entity.clone();
        created.id = conn.last_insert_rowid() as u32;
        Ok(created)
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Membership>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let membership = conn
            .query_row(
                &format!("SELECT {} FROM memberships WHERE id = ?", COLUMNS),
                params![id],
                row_to_membership,
            )
            .optional()?;
        Ok(membership)
    }

    async fn list(&self) -> DomainResult<Vec<Membership>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM memberships ORDER BY id", COLUMNS))?;
        let mut rows = stmt.query([])?;
        let mut memberships = Vec::new();
        while let Some(row) = rows.next()? {
            memberships.push(row_to_membership(row)?);
        }
        Ok(memberships)
    }

    async fn update(&self, entity: &Membership) -> DomainResult<Membership> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE memberships SET organization_id = ?, holder_name = ?, kind = ? WHERE id = ?",
            params![entity.organization_id, entity.holder_name, entity.kind.as_str(), entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Membership {} not found", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        // Holdings must be handed over before a membership can go
        conn.execute("DELETE FROM memberships WHERE id = ?", params![id])?;
        Ok(())
    }
}

#[async_trait]
impl OrganizationRepository<Membership> for MembershipRepository {
    async fn list_by_organization(&self, organization_id: u32) -> DomainResult<Vec<Membership>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM memberships WHERE organization_id = ? ORDER BY id",
            COLUMNS
        ))?;
        let mut rows = stmt.query(params![organization_id])?;
        let mut memberships = Vec::new();
        while let Some(row) = rows.next()? {
            memberships.push(row_to_membership(row)?);
        }
        Ok(memberships)
    }
}

fn row_to_membership(row: &rusqlite::Row) -> rusqlite::Result<Membership> {
    Ok(Membership {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        holder_name: row.get(2)?,
        kind: MembershipKind::from_str(&row.get::<_, String>(3).unwrap_or_default()),
    })
}
