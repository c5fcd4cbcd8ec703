//! Grid Geometry
//!
//! Pure functions mapping a pointer coordinate to a logical cell index, for
//! the two horizontally scrolling lists and for the 3x3 paginated container
//! grid. A miss is `None`, never an error.

use serde::{Deserialize, Serialize};

/// Columns in the container overlay grid
pub const GRID_COLUMNS: usize = 3;
/// Rows in the container overlay grid
pub const GRID_ROWS: usize = 3;
/// Cells per overlay page
pub const GRID_PAGE_SIZE: usize = GRID_COLUMNS * GRID_ROWS;

/// Screen coordinate in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Largest axis distance to another point
    pub fn chebyshev(&self, other: Point) -> f32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Axis-aligned rectangle, half-open on the right and bottom edges
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Which of the two lists a coordinate belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSide {
    /// The viewer's own items
    Top,
    /// The counterpart picked in the member picker
    Bottom,
}

impl ListSide {
    pub fn opposite(self) -> Self {
        match self {
            ListSide::Top => ListSide::Bottom,
            ListSide::Bottom => ListSide::Top,
        }
    }
}

/// Horizontal hit band of one list.
///
/// Items are square, so the band is exactly one item width tall, anchored at
/// `top`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ListBand {
    pub top: f32,
    pub item_width: f32,
}

impl ListBand {
    pub fn new(top: f32, item_width: f32) -> Self {
        Self { top, item_width }
    }

    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.top && y < self.top + self.item_width
    }

    /// Total scrollable length of `count` items
    pub fn content_width(&self, count: usize) -> f32 {
        count as f32 * self.item_width
    }
}

/// Resolve the list cell under `pointer`.
///
/// Returns `floor((x + scroll_offset) / item_width)` when the pointer lies in
/// the band, `None` otherwise. Negative or non-finite positions are misses.
pub fn resolve_list_index(pointer: Point, band: &ListBand, scroll_offset: f32) -> Option<usize> {
    if !band.contains_y(pointer.y) || band.item_width <= 0.0 {
        return None;
    }
    let along = pointer.x + scroll_offset;
    if !along.is_finite() || along < 0.0 {
        return None;
    }
    Some((along / band.item_width).floor() as usize)
}

/// Placement of the 3x3 grid inside the container overlay panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMetrics {
    pub left: f32,
    pub top: f32,
    pub col_width: f32,
    pub row_height: f32,
    /// Vertical gap between rows
    pub gap: f32,
}

/// Resolve the overlay grid cell under `pointer` on `page`.
///
/// `row = floor((y - top) / (row_height + gap))`,
/// `col = floor((x - left) / col_width)`; anything outside `[0, 2]` is a miss.
pub fn resolve_container_grid_index(
    pointer: Point,
    page: usize,
    grid: &GridMetrics,
) -> Option<usize> {
    let row_pitch = grid.row_height + grid.gap;
    if row_pitch <= 0.0 || grid.col_width <= 0.0 {
        return None;
    }
    let row = ((pointer.y - grid.top) / row_pitch).floor();
    let col = ((pointer.x - grid.left) / grid.col_width).floor();
    if !(0.0..GRID_ROWS as f32).contains(&row) || !(0.0..GRID_COLUMNS as f32).contains(&col) {
        return None;
    }
    Some(page * GRID_PAGE_SIZE + row as usize * GRID_COLUMNS + col as usize)
}

/// Number of overlay pages needed for `count` cells (at least one)
pub fn page_count(count: usize) -> usize {
    count.div_ceil(GRID_PAGE_SIZE).max(1)
}
