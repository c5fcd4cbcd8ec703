//! Hit Zones
//!
//! Coarse classification of the pointer while a drag is live. The hover
//! logic only reacts to zone *changes*, so equality here decides when timers
//! get reset.

use crate::geometry::{
    resolve_container_grid_index, resolve_list_index, GridMetrics, ListBand, ListSide, Point, Rect,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    /// Within the edge margin on the left side of the screen
    LeftEdge,
    /// Within the edge margin on the right side of the screen
    RightEdge,
    /// Over a list cell (the index may exceed the list length)
    ListCell { side: ListSide, index: usize },
    /// Over an overlay grid cell
    GridCell { index: usize },
    /// Inside the overlay panel but between cells
    OverlayGap,
    /// Outside the open overlay panel
    OutsideOverlay,
    /// Not over any list band
    OutsideBand,
}

/// What the list classifier needs to know about the screen
#[derive(Debug, Clone, Copy)]
pub struct ListProbe {
    pub screen_width: f32,
    pub edge_margin: f32,
    pub top: ListBand,
    pub bottom: ListBand,
    pub top_scroll: f32,
    pub bottom_scroll: f32,
}

/// Classify a pointer against the two-list surface. Edges win over cells.
pub fn classify_list_zone(pointer: Point, probe: &ListProbe) -> HitZone {
    if pointer.x < probe.edge_margin {
        return HitZone::LeftEdge;
    }
    if pointer.x > probe.screen_width - probe.edge_margin {
        return HitZone::RightEdge;
    }
    let lists = [
        (ListSide::Top, &probe.top, probe.top_scroll),
        (ListSide::Bottom, &probe.bottom, probe.bottom_scroll),
    ];
    for (side, band, scroll) in lists {
        if let Some(index) = resolve_list_index(pointer, band, scroll) {
            return HitZone::ListCell { side, index };
        }
    }
    HitZone::OutsideBand
}

/// Classify a pointer against an open overlay panel showing `page`.
pub fn classify_overlay_zone(
    pointer: Point,
    bounds: &Rect,
    grid: &GridMetrics,
    page: usize,
) -> HitZone {
    if !bounds.contains(pointer) {
        return HitZone::OutsideOverlay;
    }
    match resolve_container_grid_index(pointer, page, grid) {
        Some(index) => HitZone::GridCell { index },
        None => HitZone::OverlayGap,
    }
}
