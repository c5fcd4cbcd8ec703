//! Floating Proxy
//!
//! The tile that follows the pointer during a drag. Drawn above both lists
//! from the shared transform, so it keeps up with the finger even when the
//! control loop is busy. It never takes part in hit testing.

use drag_engine::{Point, TransformSnapshot};
use serde::Serialize;

use crate::models::{Item, ItemKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProxyFrame {
    pub label: String,
    pub count: usize,
    pub kind: ItemKind,
    pub color: Option<String>,
    pub image: Option<String>,
    /// Where the source cell was when the drag began
    pub origin: Point,
    pub left: f32,
    pub top: f32,
    /// Unscaled edge length
    pub size: f32,
    pub scale: f32,
}

impl ProxyFrame {
    /// Pointer events pass straight through the proxy
    pub fn hit_test(&self, _pointer: Point) -> bool {
        false
    }

    pub fn scaled_size(&self) -> f32 {
        self.size * self.scale
    }
}

/// Frame for the dragged item, centred on the pointer. `None` while no drag
/// is visible.
pub fn render_proxy(
    item: Option<&Item>,
    origin: Point,
    transform: &TransformSnapshot,
    size: f32,
) -> Option<ProxyFrame> {
    let item = item?;
    if !transform.visible {
        return None;
    }
    let scaled = size * transform.scale;
    Some(ProxyFrame {
        label: item.name().to_string(),
        count: item.display_count(),
        kind: item.kind(),
        color: item.color().map(str::to_string),
        image: item.as_stack().and_then(|s| s.image()).map(str::to_string),
        origin,
        left: transform.x - scaled / 2.0,
        top: transform.y - scaled / 2.0,
        size,
        scale: transform.scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EquipmentStack, GroupKey};
    use gearshare_lib::domain::Equipment;
    use std::collections::BTreeSet;

    fn rope() -> Item {
        let records = vec![
            Equipment::new(1, 1, 1, "Rope".into()),
            Equipment::new(2, 1, 1, "Rope".into()),
        ];
        let stack = EquipmentStack::new(GroupKey::owned(1, "Rope"), records, BTreeSet::from([1]));
        Item::Equipment(stack)
    }

    fn snapshot(scale: f32, visible: bool) -> TransformSnapshot {
        TransformSnapshot {
            x: 200.0,
            y: 300.0,
            scale,
            visible,
        }
    }

    #[test]
    fn test_centred_on_pointer_and_scaled() {
        let item = rope();
        let frame =
            render_proxy(Some(&item), Point::new(0.0, 160.0), &snapshot(0.5, true), 100.0).unwrap();
        assert_eq!(frame.left, 175.0);
        assert_eq!(frame.top, 275.0);
        assert_eq!(frame.scaled_size(), 50.0);
        assert_eq!(frame.count, 1);
        assert_eq!(frame.label, "Rope");
        assert!(!frame.hit_test(Point::new(200.0, 300.0)));
    }

    #[test]
    fn test_hidden_without_drag() {
        let item = rope();
        let hidden = snapshot(1.0, false);
        assert!(render_proxy(Some(&item), Point::default(), &hidden, 100.0).is_none());
        assert!(render_proxy(None, Point::default(), &snapshot(1.0, true), 100.0).is_none());
    }
}
