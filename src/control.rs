//! Control Loop
//!
//! The screen runs in two contexts. The render side owns the pointer: it
//! writes the drag transform directly and forwards every sample to the
//! control loop without waiting. The control loop owns everything else
//! (board, gesture machine, timers) and processes messages strictly in the
//! order they were sent.
//!
//! Commits are spawned and not awaited; the loop keeps serving gestures while
//! a write is in flight and picks the result up from the next snapshot.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Instant;

use drag_engine::{DragTransform, ListSide, Point, TransformSnapshot};
use gearshare_lib::repository::OrgSnapshot;
use tokio::sync::{mpsc, watch};

use crate::aggregator::{aggregate, Ownerships};
use crate::board::{Board, ListState, OverlayState};
use crate::committer::ReassignmentCommitter;
use crate::config::EngineConfig;
use crate::context::ScreenContext;
use crate::gesture::{GestureEvent, GestureMachine};
use crate::models::Item;
use crate::proxy::{render_proxy, ProxyFrame};
use crate::selection::SelectionCache;

/// Messages from the render side. Pointer samples carry the instant they
/// were taken.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlMsg {
    PointerDown { at: Instant, point: Point },
    PointerMove { at: Instant, point: Point },
    PointerUp { at: Instant, point: Point },
    /// User scrolled a list by hand
    ScrollTo { side: ListSide, offset: f32 },
    OpenContainer(u32),
    CloseOverlay,
    SetOverlayPage(usize),
    /// Selection changed outside a drag, rebuild the lists
    Reaggregate,
    Unmount,
}

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Render-side end of the screen. Never blocks.
#[derive(Clone)]
pub struct RenderHandle {
    tx: mpsc::UnboundedSender<ControlMsg>,
    transform: Arc<DragTransform>,
}

impl RenderHandle {
    pub fn pointer_down(&self, point: Point) -> bool {
        self.transform.set_position(point);
        self.send(ControlMsg::PointerDown { at: now(), point })
    }

    pub fn pointer_move(&self, point: Point) -> bool {
        self.transform.set_position(point);
        self.send(ControlMsg::PointerMove { at: now(), point })
    }

    pub fn pointer_up(&self, point: Point) -> bool {
        self.transform.set_position(point);
        self.send(ControlMsg::PointerUp { at: now(), point })
    }

    /// Returns false once the control loop has stopped
    pub fn send(&self, msg: ControlMsg) -> bool {
        self.tx.send(msg).is_ok()
    }

    pub fn transform(&self) -> TransformSnapshot {
        self.transform.snapshot()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragView {
    pub item: Item,
    pub origin: Point,
    pub hover_container: Option<u32>,
}

/// Everything the render side draws apart from the proxy position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenView {
    pub top: ListState,
    pub bottom: ListState,
    pub overlay: Option<OverlayState>,
    pub drag: Option<DragView>,
}

impl ScreenView {
    pub fn proxy(&self, transform: &TransformSnapshot, size: f32) -> Option<ProxyFrame> {
        let drag = self.drag.as_ref()?;
        render_proxy(Some(&drag.item), drag.origin, transform, size)
    }
}

/// A mounted screen, before its control loop is spawned
pub struct Screen {
    pub handle: RenderHandle,
    pub events: mpsc::UnboundedReceiver<GestureEvent>,
    pub view: watch::Receiver<ScreenView>,
    pub control: ControlLoop,
}

pub fn mount(
    config: EngineConfig,
    ctx: &ScreenContext,
    snapshots: watch::Receiver<OrgSnapshot>,
    committer: ReassignmentCommitter,
    selection: SelectionCache,
) -> Screen {
    let transform = Arc::new(DragTransform::new());
    let (tx, rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(ScreenView::default());

    let control = ControlLoop {
        board: Board::new(config.layout.clone(), ctx.viewer_id),
        machine: GestureMachine::new(config, Arc::clone(&transform)),
        committer: Arc::new(committer),
        selection,
        ownerships: Ownerships::default(),
        snapshots,
        counterpart: ctx.picker.subscribe(),
        rx,
        events: events_tx,
        view: view_tx,
        unmounted: false,
    };

    Screen {
        handle: RenderHandle { tx, transform },
        events: events_rx,
        view: view_rx,
        control,
    }
}

pub struct ControlLoop {
    board: Board,
    machine: GestureMachine,
    committer: Arc<ReassignmentCommitter>,
    selection: SelectionCache,
    ownerships: Ownerships,
    snapshots: watch::Receiver<OrgSnapshot>,
    counterpart: watch::Receiver<Option<u32>>,
    rx: mpsc::UnboundedReceiver<ControlMsg>,
    events: mpsc::UnboundedSender<GestureEvent>,
    view: watch::Sender<ScreenView>,
    unmounted: bool,
}

impl ControlLoop {
    /// Serve the screen until `Unmount` arrives or every handle is dropped
    pub async fn run(mut self) {
        self.reaggregate();
        self.sync_counterpart();
        self.publish();

        let mut feed_open = true;
        let mut picker_open = true;
        loop {
            let deadline = self.machine.next_deadline();
            let wake_at = deadline
                .map(tokio::time::Instant::from_std)
                .unwrap_or_else(tokio::time::Instant::now);

            tokio::select! {
                biased;
                msg = self.rx.recv() => {
                    let Some(msg) = msg else { break };
                    if self.handle(msg).is_break() {
                        break;
                    }
                }
                changed = self.snapshots.changed(), if feed_open => match changed {
                    Ok(()) => self.reaggregate(),
                    Err(_) => feed_open = false,
                },
                changed = self.counterpart.changed(), if picker_open => match changed {
                    Ok(()) => self.sync_counterpart(),
                    Err(_) => picker_open = false,
                },
                _ = tokio::time::sleep_until(wake_at), if deadline.is_some() => {
                    let events = self.machine.tick(now(), &mut self.board);
                    self.dispatch(events);
                }
            }
            self.publish();
        }

        self.unmount();
    }

    /// Apply one render-side message. Breaks once the screen should stop.
    fn handle(&mut self, msg: ControlMsg) -> ControlFlow<()> {
        let events = match msg {
            ControlMsg::PointerDown { at, point } => self.machine.pointer_down(point, at),
            ControlMsg::PointerMove { at, point } => {
                self.machine.pointer_move(point, at, &mut self.board)
            }
            ControlMsg::PointerUp { at, point } => {
                self.machine.pointer_up(point, at, &mut self.board)
            }
            ControlMsg::ScrollTo { side, offset } => {
                self.board.scroll_to(side, offset);
                Vec::new()
            }
            ControlMsg::OpenContainer(id) => {
                if !self.board.open_overlay(id) {
                    tracing::warn!("container {} is not on screen", id);
                }
                Vec::new()
            }
            ControlMsg::CloseOverlay => {
                self.board.close_overlay();
                Vec::new()
            }
            ControlMsg::SetOverlayPage(page) => {
                self.board.set_overlay_page(page);
                Vec::new()
            }
            ControlMsg::Reaggregate => {
                self.reaggregate();
                Vec::new()
            }
            ControlMsg::Unmount => return ControlFlow::Break(()),
        };
        self.dispatch(events);
        ControlFlow::Continue(())
    }

    fn dispatch(&mut self, events: Vec<GestureEvent>) {
        for event in events {
            if let GestureEvent::Drop(request) = &event {
                let committer = Arc::clone(&self.committer);
                let request = request.clone();
                tokio::spawn(async move {
                    committer.execute(request).await;
                });
            }
            // The host may not care about events
            let _ = self.events.send(event);
        }
    }

    fn reaggregate(&mut self) {
        {
            let snapshot = self.snapshots.borrow_and_update();
            self.ownerships = aggregate(
                &snapshot.memberships,
                &snapshot.containers,
                &snapshot.equipment,
                &self.selection,
            );
            tracing::debug!("aggregated revision {}", snapshot.revision);
        }
        self.board.apply(&self.ownerships);
    }

    fn sync_counterpart(&mut self) {
        let owner = *self.counterpart.borrow_and_update();
        self.board.set_counterpart(owner, &self.ownerships);
    }

    fn publish(&self) {
        let view = ScreenView {
            top: self.board.list(ListSide::Top).clone(),
            bottom: self.board.list(ListSide::Bottom).clone(),
            overlay: self.board.overlay().cloned(),
            drag: self.machine.session().map(|s| DragView {
                item: s.item.clone(),
                origin: s.origin,
                hover_container: s.hover_container.as_ref().map(|c| c.id),
            }),
        };
        self.view.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }

    /// Tear the screen down. Only the first call does anything.
    pub fn unmount(&mut self) -> bool {
        if self.unmounted {
            return false;
        }
        self.unmounted = true;
        if self.machine.teardown() {
            tracing::debug!("drag abandoned on unmount");
        }
        self.publish();
        true
    }
}
