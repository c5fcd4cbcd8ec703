//! Reassignment Committer
//!
//! Persists a drop. Equipment drops move only the selected records of the
//! dragged stack; container drops move the container and everything in it.
//! Failures are logged and raised as a notice, never retried.

use std::sync::Arc;

use gearshare_lib::repository::ReassignmentStore;

use crate::gesture::ReassignRequest;
use crate::models::Item;
use crate::notice::{Notice, NoticeSender};
use crate::selection::SelectionCache;

#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// Records written (nested records for a container)
    Committed { records: usize },
    /// Nothing selected, nothing to write
    Skipped,
    Failed(String),
}

pub struct ReassignmentCommitter {
    store: Arc<dyn ReassignmentStore>,
    selection: SelectionCache,
    notices: NoticeSender,
}

impl ReassignmentCommitter {
    pub fn new(
        store: Arc<dyn ReassignmentStore>,
        selection: SelectionCache,
        notices: NoticeSender,
    ) -> Self {
        Self {
            store,
            selection,
            notices,
        }
    }

    pub async fn execute(&self, request: ReassignRequest) -> CommitOutcome {
        let mut item = request.item;
        self.reassign(&mut item, request.target_owner, request.target_container).await
    }

    /// Move `item` to `target_owner`, into `target_container` when given.
    /// On success an equipment stack's selection is cleared.
    pub async fn reassign(
        &self,
        item: &mut Item,
        target_owner: u32,
        target_container: Option<u32>,
    ) -> CommitOutcome {
        let result = match item {
            Item::Equipment(stack) => {
                let ids = stack.selected_ids();
                if ids.is_empty() {
                    tracing::debug!("nothing selected in {}, skipping commit", stack.name());
                    return CommitOutcome::Skipped;
                }
                let result = self
                    .store
                    .reassign_equipment(&ids, target_owner, target_container)
                    .await;
                if result.is_ok() {
                    stack.clear_selection();
                    // Records left behind stay deselected
                    self.selection.clear(&stack.key);
                }
                result
            }
            Item::Container(container) => {
                self.store.reassign_container(container.id, target_owner).await
            }
        };

        match result {
            Ok(records) => {
                tracing::info!("moved {} to membership {}", item.name(), target_owner);
                CommitOutcome::Committed { records }
            }
            Err(e) => {
                tracing::error!(
                    "failed to move {} to membership {}: {}",
                    item.name(),
                    target_owner,
                    e
                );
                self.notices.raise(Notice::CommitFailed {
                    item: item.name().to_string(),
                    reason: e.to_string(),
                });
                CommitOutcome::Failed(e.to_string())
            }
        }
    }
}
