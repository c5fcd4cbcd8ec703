//! Drag Session
//!
//! State that exists only while one item is being dragged. Created when the
//! hold completes and torn down exactly once, on release or unmount.

use std::time::Instant;

use drag_engine::{AutoScroll, Debounce, HitZone, ListSide, Point};

use crate::config::EngineConfig;
use crate::models::{ContainerItem, Item};

/// Surface the dragged item was lifted from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    List(ListSide),
    Overlay { container_id: u32 },
}

/// Container cell the drill timer is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrillTarget {
    pub side: ListSide,
    pub index: usize,
    pub container_id: u32,
}

#[derive(Debug)]
pub struct DragSession {
    pub item: Item,
    pub source: DragSource,
    /// Top-left of the source cell when the drag began
    pub origin: Point,
    /// Last pointer position seen by the control loop
    pub pointer: Point,
    /// Implicit drop container once the drill timer fired
    pub hover_container: Option<ContainerItem>,
    pub prev_zone: Option<HitZone>,
    pub drill_timer: Debounce,
    pub drill_target: Option<DrillTarget>,
    pub dismiss_timer: Debounce,
    pub autoscroll: AutoScroll,
    pub autoscroll_side: ListSide,
    torn_down: bool,
}

impl DragSession {
    pub fn new(
        item: Item,
        source: DragSource,
        origin: Point,
        pointer: Point,
        config: &EngineConfig,
    ) -> Self {
        Self {
            item,
            source,
            origin,
            pointer,
            hover_container: None,
            prev_zone: None,
            drill_timer: Debounce::new(config.drill_delay()),
            drill_target: None,
            dismiss_timer: Debounce::new(config.dismiss_delay()),
            autoscroll: AutoScroll::new(config.autoscroll_hz, config.autoscroll_step),
            autoscroll_side: ListSide::Top,
            torn_down: false,
        }
    }

    /// Earliest instant at which a timer needs servicing
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.drill_timer.deadline(),
            self.dismiss_timer.deadline(),
            self.autoscroll.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Cancel every timer and forget the hover state. Returns false when the
    /// session was already torn down.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        self.drill_timer.cancel();
        self.drill_target = None;
        self.dismiss_timer.cancel();
        self.autoscroll.stop();
        self.hover_container = None;
        self.prev_zone = None;
        true
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EquipmentStack, GroupKey};
    use drag_engine::ScrollDirection;
    use std::time::Duration;

    fn session() -> DragSession {
        let stack = EquipmentStack::new(GroupKey::owned(1, "Tent"), Vec::new(), Default::default());
        DragSession::new(
            Item::Equipment(stack),
            DragSource::List(ListSide::Top),
            Point::default(),
            Point::default(),
            &EngineConfig::default(),
        )
    }

    #[test]
    fn test_next_deadline_is_earliest_timer() {
        let t = Instant::now();
        let mut s = session();
        assert!(s.next_deadline().is_none());

        s.dismiss_timer.arm(t);
        s.autoscroll.start(ScrollDirection::Forward, t);
        assert_eq!(s.next_deadline(), Some(t + s.autoscroll.interval()));
        s.autoscroll.stop();
        assert_eq!(s.next_deadline(), Some(t + Duration::from_millis(500)));
    }

    #[test]
    fn test_teardown_runs_once() {
        let t = Instant::now();
        let mut s = session();
        s.drill_timer.arm(t);
        s.autoscroll.start(ScrollDirection::Backward, t);

        assert!(s.teardown());
        assert!(s.next_deadline().is_none());
        assert!(!s.teardown());
        assert!(s.is_torn_down());
    }
}
