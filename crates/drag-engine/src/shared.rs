//! Shared Drag Transform
//!
//! Values read by the render layer and written from two contexts: the pointer
//! callback owns the position, the control loop owns the scale. Each field has
//! a single writer and reads never take a lock.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::geometry::Point;

/// An `f32` stored in an `AtomicU32`
#[derive(Debug, Default)]
pub struct SharedF32(AtomicU32);

impl SharedF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Release);
    }
}

/// Position and scale of the floating drag proxy
#[derive(Debug)]
pub struct DragTransform {
    x: SharedF32,
    y: SharedF32,
    scale: SharedF32,
    visible: AtomicBool,
}

/// Copy of a [`DragTransform`] taken at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSnapshot {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub visible: bool,
}

impl Default for DragTransform {
    fn default() -> Self {
        Self {
            x: SharedF32::new(0.0),
            y: SharedF32::new(0.0),
            scale: SharedF32::new(1.0),
            visible: AtomicBool::new(false),
        }
    }
}

impl DragTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer side: follow the finger
    pub fn set_position(&self, p: Point) {
        self.x.set(p.x);
        self.y.set(p.y);
    }

    pub fn position(&self) -> Point {
        Point::new(self.x.get(), self.y.get())
    }

    /// Control side: shrink while drilling into a container
    pub fn set_scale(&self, scale: f32) {
        self.scale.set(scale);
    }

    pub fn scale(&self) -> f32 {
        self.scale.get()
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Release);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> TransformSnapshot {
        TransformSnapshot {
            x: self.x.get(),
            y: self.y.get(),
            scale: self.scale.get(),
            visible: self.is_visible(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_shared_f32_roundtrips_bits() {
        let v = SharedF32::new(-3.25);
        assert_eq!(v.get(), -3.25);
        v.set(1e-7);
        assert_eq!(v.get(), 1e-7);
    }

    #[test]
    fn test_writers_on_separate_threads() {
        let transform = Arc::new(DragTransform::new());
        let pointer = {
            let t = Arc::clone(&transform);
            std::thread::spawn(move || {
                for i in 0..100 {
                    t.set_position(Point::new(i as f32, 2.0 * i as f32));
                }
            })
        };
        transform.set_scale(0.6);
        pointer.join().unwrap();
        let snap = transform.snapshot();
        assert_eq!((snap.x, snap.y, snap.scale), (99.0, 198.0, 0.6));
        assert!(!snap.visible);
    }
}
