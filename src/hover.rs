//! Hover Controller
//!
//! Reacts to the pointer while a drag is live: auto-scrolls a list when the
//! pointer rests at a screen edge, drills into a container after hovering
//! over it, and dismisses the container overlay after the pointer leaves it.
//!
//! Only zone *changes* reset state. Every change cancels both debounce
//! timers, restores the proxy scale and forgets the hovered container before
//! the new zone arms whatever it needs.

use std::time::Instant;

use drag_engine::{DragTransform, HitZone, ScrollDirection};

use crate::board::Board;
use crate::gesture::GestureEvent;
use crate::models::Item;
use crate::session::{DragSession, DrillTarget};

pub struct HoverController {
    idle_scale: f32,
    drilling_scale: f32,
}

impl HoverController {
    pub fn new(idle_scale: f32, drilling_scale: f32) -> Self {
        Self {
            idle_scale,
            drilling_scale,
        }
    }

    /// Pointer moved to `session.pointer`
    pub fn on_move(
        &self,
        session: &mut DragSession,
        board: &mut Board,
        transform: &DragTransform,
        now: Instant,
        events: &mut Vec<GestureEvent>,
    ) {
        let zone = board.zone(session.pointer);
        if session.prev_zone == Some(zone) {
            return;
        }
        self.enter_zone(zone, session, board, transform, now, events);
    }

    fn enter_zone(
        &self,
        zone: HitZone,
        session: &mut DragSession,
        board: &Board,
        transform: &DragTransform,
        now: Instant,
        events: &mut Vec<GestureEvent>,
    ) {
        tracing::trace!("drag entered {:?}", zone);
        session.prev_zone = Some(zone);
        session.drill_timer.cancel();
        session.drill_target = None;
        session.dismiss_timer.cancel();
        transform.set_scale(self.idle_scale);
        if session.hover_container.take().is_some() {
            events.push(GestureEvent::HoverContainer(None));
        }

        match zone {
            HitZone::LeftEdge | HitZone::RightEdge => {
                let direction = if zone == HitZone::LeftEdge {
                    ScrollDirection::Backward
                } else {
                    ScrollDirection::Forward
                };
                session.autoscroll_side = board.layout().side_at(session.pointer.y);
                session.autoscroll.start(direction, now);
            }
            _ => session.autoscroll.stop(),
        }

        match zone {
            HitZone::ListCell { side, index } => {
                if let Some(container) = board.item_at(side, index).and_then(Item::as_container) {
                    session.drill_target = Some(DrillTarget {
                        side,
                        index,
                        container_id: container.id,
                    });
                    session.drill_timer.arm(now);
                }
            }
            HitZone::OutsideOverlay => session.dismiss_timer.arm(now),
            _ => {}
        }
    }

    /// Service whichever timers are due at `now`
    pub fn on_tick(
        &self,
        session: &mut DragSession,
        board: &mut Board,
        transform: &DragTransform,
        now: Instant,
        events: &mut Vec<GestureEvent>,
    ) {
        if session.drill_timer.fire_if_due(now) {
            if let Some(target) = session.drill_target.take() {
                let cell = HitZone::ListCell {
                    side: target.side,
                    index: target.index,
                };
                let container = board
                    .item_at(target.side, target.index)
                    .and_then(Item::as_container)
                    .filter(|c| c.id == target.container_id)
                    .cloned();
                match container {
                    Some(container) if board.zone(session.pointer) == cell => {
                        tracing::debug!("drilling into container {}", container.id);
                        transform.set_scale(self.drilling_scale);
                        events.push(GestureEvent::HoverContainer(Some(container.id)));
                        session.hover_container = Some(container);
                    }
                    _ => tracing::debug!("drill target {} moved away", target.container_id),
                }
            }
        }

        if session.dismiss_timer.fire_if_due(now) && board.close_overlay() {
            events.push(GestureEvent::OverlayDismissed);
            // The list surface is under the pointer now
            let zone = board.zone(session.pointer);
            self.enter_zone(zone, session, board, transform, now, events);
        }

        if session.autoscroll.is_active() {
            let delta = session.autoscroll.poll(now);
            if delta != 0.0 {
                let side = session.autoscroll_side;
                let before = board.list(side).scroll;
                let offset = board.scroll_by(side, delta);
                if offset != before {
                    events.push(GestureEvent::Scrolled { side, offset });
                }
            }
        }
    }
}
