//! Gesture State Machine
//!
//! Turns raw pointer samples into drag lifecycle events:
//!
//! ```text
//! Idle -> Armed -> Dragging -> Finalizing -> Idle
//!           |
//!           +-> Idle (moved too far, or released early: tap)
//! ```
//!
//! A press arms the machine. Holding still for the hold duration lifts the
//! item under the initial press point and starts a drag session; releasing
//! earlier is a tap. Release during a drag resolves the drop target from
//! which side of the split line the pointer is on.

use std::sync::Arc;
use std::time::Instant;

use drag_engine::{DragTransform, ListSide, Point};

use crate::board::{Board, Pick};
use crate::config::EngineConfig;
use crate::hover::HoverController;
use crate::models::{GroupKey, Item, ItemId};
use crate::session::{DragSession, DragSource};

/// Ownership change requested by a drop
#[derive(Debug, Clone, PartialEq)]
pub struct ReassignRequest {
    pub item: Item,
    pub target_owner: u32,
    /// Container to drop equipment into; `None` = held directly
    pub target_container: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// Released while a container overlay was still open
    OverlayOpen,
    /// Released below the split with no counterpart picked
    NoCounterpart,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    DragStarted { item: ItemId, source: DragSource, origin: Point },
    /// Tap on an equipment stack
    OpenDetail(GroupKey),
    /// Tap on a container
    OpenContainer(u32),
    /// Drop container changed (`None` = none)
    HoverContainer(Option<u32>),
    Scrolled { side: ListSide, offset: f32 },
    OverlayDismissed,
    Drop(ReassignRequest),
    DropSuppressed(SuppressReason),
    DragEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Armed,
    Dragging,
    Finalizing,
}

enum Phase {
    Idle,
    Armed { since: Instant, at: Point, last: Point },
    Dragging(Box<DragSession>),
    Finalizing,
}

pub struct GestureMachine {
    config: EngineConfig,
    hover: HoverController,
    transform: Arc<DragTransform>,
    phase: Phase,
}

impl GestureMachine {
    pub fn new(config: EngineConfig, transform: Arc<DragTransform>) -> Self {
        Self {
            hover: HoverController::new(config.idle_scale, config.drilling_scale),
            config,
            transform,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        match self.phase {
            Phase::Idle => GesturePhase::Idle,
            Phase::Armed { .. } => GesturePhase::Armed,
            Phase::Dragging(_) => GesturePhase::Dragging,
            Phase::Finalizing => GesturePhase::Finalizing,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.phase {
            Phase::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// When `tick` next has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.phase {
            Phase::Armed { since, .. } => Some(*since + self.config.hold_duration()),
            Phase::Dragging(session) => session.next_deadline(),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, p: Point, now: Instant) -> Vec<GestureEvent> {
        match self.phase {
            Phase::Idle => self.phase = Phase::Armed { since: now, at: p, last: p },
            _ => tracing::debug!("pointer down ignored, gesture already active"),
        }
        Vec::new()
    }

    pub fn pointer_move(&mut self, p: Point, now: Instant, board: &mut Board) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        self.promote_if_held(now, board, &mut events);

        let mut cancel = false;
        match &mut self.phase {
            Phase::Armed { at, last, .. } => {
                if p.chebyshev(*at) > self.config.arm_slop {
                    cancel = true;
                } else {
                    *last = p;
                }
            }
            Phase::Dragging(session) => {
                session.pointer = p;
                self.hover.on_move(session, board, &self.transform, now, &mut events);
            }
            Phase::Idle | Phase::Finalizing => {}
        }
        if cancel {
            tracing::trace!("press moved before hold, not a drag");
            self.phase = Phase::Idle;
        }
        events
    }

    /// Drive hold detection and the drag timers
    pub fn tick(&mut self, now: Instant, board: &mut Board) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        self.promote_if_held(now, board, &mut events);
        if let Phase::Dragging(session) = &mut self.phase {
            self.hover.on_tick(session, board, &self.transform, now, &mut events);
        }
        events
    }

    pub fn pointer_up(&mut self, p: Point, now: Instant, board: &mut Board) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        self.promote_if_held(now, board, &mut events);

        match std::mem::replace(&mut self.phase, Phase::Finalizing) {
            Phase::Armed { at, .. } => {
                if let Some(pick) = board.pick(at) {
                    events.push(tap_event(&pick));
                }
            }
            Phase::Dragging(session) => self.finalize(session, p, board, &mut events),
            Phase::Idle | Phase::Finalizing => {}
        }
        self.phase = Phase::Idle;
        events
    }

    /// Abandon any live drag without dropping. Returns whether a session was
    /// torn down by this call.
    pub fn teardown(&mut self) -> bool {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging(mut session) => {
                self.transform.set_visible(false);
                self.transform.set_scale(self.config.idle_scale);
                session.teardown()
            }
            _ => false,
        }
    }

    fn promote_if_held(&mut self, now: Instant, board: &mut Board, events: &mut Vec<GestureEvent>) {
        let Phase::Armed { since, at, last } = self.phase else {
            return;
        };
        if now.saturating_duration_since(since) < self.config.hold_duration() {
            return;
        }

        let pick = match board.pick(at) {
            Some(pick) => pick,
            None => {
                self.phase = Phase::Idle;
                return;
            }
        };
        let item = pick.item();
        if !item.is_visible() {
            tracing::debug!("{} has nothing selected, not dragging", item.name());
            self.phase = Phase::Idle;
            return;
        }

        let origin = board.cell_origin(&pick);
        let source = match &pick {
            Pick::List { side, .. } => DragSource::List(*side),
            Pick::Overlay { container_id, .. } => DragSource::Overlay {
                container_id: *container_id,
            },
        };
        tracing::debug!("drag started: {}", item.name());
        events.push(GestureEvent::DragStarted {
            item: item.id(),
            source,
            origin,
        });

        self.transform.set_scale(self.config.idle_scale);
        self.transform.set_visible(true);
        let mut session = DragSession::new(item, source, origin, last, &self.config);
        self.hover.on_move(&mut session, board, &self.transform, now, events);
        self.phase = Phase::Dragging(Box::new(session));
    }

    fn finalize(
        &self,
        mut session: Box<DragSession>,
        p: Point,
        board: &Board,
        events: &mut Vec<GestureEvent>,
    ) {
        let hovered = session.hover_container.as_ref().map(|c| c.id);
        session.teardown();
        self.transform.set_visible(false);
        self.transform.set_scale(self.config.idle_scale);

        let target_owner = if p.y < board.layout().split_y {
            Some(board.viewer_id())
        } else {
            board.counterpart()
        };

        let outcome = if board.is_overlay_open() {
            GestureEvent::DropSuppressed(SuppressReason::OverlayOpen)
        } else if let Some(target_owner) = target_owner {
            let target_container = match session.item {
                Item::Equipment(_) => hovered,
                Item::Container(_) => None,
            };
            GestureEvent::Drop(ReassignRequest {
                item: session.item,
                target_owner,
                target_container,
            })
        } else {
            GestureEvent::DropSuppressed(SuppressReason::NoCounterpart)
        };
        tracing::debug!("drag finalized: {:?}", outcome);
        events.push(outcome);
        events.push(GestureEvent::DragEnded);
    }
}

fn tap_event(pick: &Pick) -> GestureEvent {
    match pick {
        Pick::List { item: Item::Container(c), .. } => GestureEvent::OpenContainer(c.id),
        Pick::List { item: Item::Equipment(stack), .. } => {
            GestureEvent::OpenDetail(stack.key.clone())
        }
        Pick::Overlay { stack, .. } => GestureEvent::OpenDetail(stack.key.clone()),
    }
}
