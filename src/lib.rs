//! Gearshare
//!
//! Drag-and-drop reassignment of equipment between the holders of an
//! organization. The viewer's items sit in the top list and a picked
//! counterpart's below; dragging across the split line hands things over.
//!
//! - models / aggregator / selection: what the lists contain
//! - board / gesture / hover / session: how the pointer drives a drag
//! - committer: persisting a drop through the backend store
//! - control: the render-side handle and the control loop behind it

pub mod aggregator;
pub mod board;
pub mod committer;
pub mod config;
pub mod context;
pub mod control;
pub mod gesture;
pub mod hover;
pub mod models;
pub mod notice;
pub mod proxy;
pub mod selection;
pub mod session;

#[cfg(test)]
mod fixtures;

pub use aggregator::{aggregate, Ownerships};
pub use board::{Board, Pick};
pub use committer::{CommitOutcome, ReassignmentCommitter};
pub use config::{EngineConfig, ScreenLayout};
pub use context::{CounterpartPicker, ScreenContext};
pub use control::{mount, ControlLoop, ControlMsg, RenderHandle, Screen, ScreenView};
pub use gesture::{GestureEvent, GestureMachine, GesturePhase, ReassignRequest, SuppressReason};
pub use models::{ContainerItem, EquipmentStack, GroupKey, Item, ItemId, ItemKind, OrgOwnership};
pub use notice::{notice_channel, Notice, NoticeSender, Toast};
pub use selection::SelectionCache;
