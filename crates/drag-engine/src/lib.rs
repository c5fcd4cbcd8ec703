//! Drag Engine Utilities
//!
//! Platform-neutral building blocks for long-press drag-and-drop over
//! horizontally scrolling lists and paginated grids.
//!
//! Nothing here owns application state. Callers feed pointer coordinates and
//! a monotonic clock (`Instant`) in, and read indices, zones and tick deltas
//! out, which keeps every piece testable without a real event loop.

mod autoscroll;
mod debounce;
mod geometry;
mod shared;
mod zone;

pub use autoscroll::{clamp_scroll_offset, AutoScroll, ScrollDirection};
pub use debounce::Debounce;
pub use geometry::{
    page_count, resolve_container_grid_index, resolve_list_index, GridMetrics, ListBand, ListSide,
    Point, Rect, GRID_COLUMNS, GRID_PAGE_SIZE, GRID_ROWS,
};
pub use shared::{DragTransform, SharedF32, TransformSnapshot};
pub use zone::{classify_list_zone, classify_overlay_zone, HitZone, ListProbe};
