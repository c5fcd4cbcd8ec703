//! Gearshare Backend
//!
//! Layered architecture:
//! - domain: organization inventory records and rules
//! - repository: SQLite data access, atomic reassignment, reactive feed

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod domain;
pub mod repository;

use repository::{
    init_db, ContainerRepository, DbState, EquipmentRepository, MembershipRepository, OrgFeed,
    SqliteReassignmentStore,
};

/// Application state shared by the screens of one process
#[derive(Clone)]
pub struct AppState {
    pub db_state: DbState,
    pub db_path: PathBuf,
}

impl AppState {
    /// Open (creating if needed) the database at `db_path`
    pub async fn open(db_path: &Path) -> Result<Self, String> {
        let db_state = init_db(db_path).await?;
        Ok(Self {
            db_state,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn memberships(&self) -> MembershipRepository {
        MembershipRepository::new(self.db_state.connection())
    }

    pub fn containers(&self) -> ContainerRepository {
        ContainerRepository::new(self.db_state.connection())
    }

    pub fn equipment(&self) -> EquipmentRepository {
        EquipmentRepository::new(self.db_state.connection())
    }

    pub fn org_feed(&self, organization_id: u32) -> Arc<OrgFeed> {
        Arc::new(OrgFeed::new(self.db_state.connection(), organization_id))
    }

    /// Reassignment store that republishes `feed` after each commit
    pub fn reassignment_store(&self, feed: Arc<OrgFeed>) -> SqliteReassignmentStore {
        SqliteReassignmentStore::new(self.db_state.connection()).with_feed(feed)
    }
}
