//! Board
//!
//! Control-side model of what is on screen: the viewer's list on top, the
//! counterpart's list below, their scroll offsets, and the container overlay
//! when one is open. Hit testing goes through here so every resolver sees
//! the same items the renderer draws.

use drag_engine::{
    classify_list_zone, classify_overlay_zone, clamp_scroll_offset, page_count,
    resolve_container_grid_index, resolve_list_index, HitZone, ListProbe, ListSide, Point,
    GRID_COLUMNS, GRID_PAGE_SIZE,
};

use crate::aggregator::Ownerships;
use crate::config::ScreenLayout;
use crate::models::{ContainerItem, EquipmentStack, Item};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    pub owner_id: Option<u32>,
    pub items: Vec<Item>,
    pub scroll: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    pub container: ContainerItem,
    pub page: usize,
}

impl OverlayState {
    pub fn page_count(&self) -> usize {
        page_count(self.container.equipment.len())
    }

    pub fn stack(&self, index: usize) -> Option<&EquipmentStack> {
        self.container.equipment.get(index)
    }
}

/// An item found under the pointer
#[derive(Debug, Clone, PartialEq)]
pub enum Pick {
    List { side: ListSide, index: usize, item: Item },
    Overlay { container_id: u32, index: usize, stack: EquipmentStack },
}

impl Pick {
    pub fn item(&self) -> Item {
        match self {
            Pick::List { item, .. } => item.clone(),
            Pick::Overlay { stack, .. } => Item::Equipment(stack.clone()),
        }
    }
}

pub struct Board {
    layout: ScreenLayout,
    viewer_id: u32,
    top: ListState,
    bottom: ListState,
    overlay: Option<OverlayState>,
}

impl Board {
    pub fn new(layout: ScreenLayout, viewer_id: u32) -> Self {
        Self {
            layout,
            viewer_id,
            top: ListState {
                owner_id: Some(viewer_id),
                ..Default::default()
            },
            bottom: ListState::default(),
            overlay: None,
        }
    }

    pub fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    pub fn viewer_id(&self) -> u32 {
        self.viewer_id
    }

    /// Holder currently shown in the bottom list
    pub fn counterpart(&self) -> Option<u32> {
        self.bottom.owner_id
    }

    pub fn list(&self, side: ListSide) -> &ListState {
        match side {
            ListSide::Top => &self.top,
            ListSide::Bottom => &self.bottom,
        }
    }

    fn list_mut(&mut self, side: ListSide) -> &mut ListState {
        match side {
            ListSide::Top => &mut self.top,
            ListSide::Bottom => &mut self.bottom,
        }
    }

    pub fn overlay(&self) -> Option<&OverlayState> {
        self.overlay.as_ref()
    }

    pub fn is_overlay_open(&self) -> bool {
        self.overlay.is_some()
    }

    /// Switch the bottom list to another holder, starting at its beginning
    pub fn set_counterpart(&mut self, owner_id: Option<u32>, ownerships: &Ownerships) {
        if self.bottom.owner_id != owner_id {
            self.bottom.owner_id = owner_id;
            self.bottom.scroll = 0.0;
        }
        self.apply(ownerships);
    }

    /// Replace list contents with a fresh aggregation. Scroll offsets are
    /// kept within the new content and an overlay whose container vanished
    /// is closed.
    pub fn apply(&mut self, ownerships: &Ownerships) {
        for side in [ListSide::Top, ListSide::Bottom] {
            let owner = self.list(side).owner_id;
            let items = owner.map(|id| ownerships.items(id).to_vec()).unwrap_or_default();
            let list = self.list_mut(side);
            list.items = items;
            self.clamp_scroll(side);
        }

        if let Some(overlay) = self.overlay.take() {
            match ownerships.container(overlay.container.id) {
                Some(container) => {
                    let pages = page_count(container.equipment.len());
                    self.overlay = Some(OverlayState {
                        container: container.clone(),
                        page: overlay.page.min(pages - 1),
                    });
                }
                None => tracing::debug!("overlay container {} is gone", overlay.container.id),
            }
        }
    }

    fn clamp_scroll(&mut self, side: ListSide) {
        let band = self.layout.band(side);
        let viewport = self.layout.screen_width;
        let list = self.list_mut(side);
        let content = band.content_width(list.items.len());
        list.scroll = clamp_scroll_offset(list.scroll, content, viewport);
    }

    /// Scroll a list by `delta`, returning the clamped offset
    pub fn scroll_by(&mut self, side: ListSide, delta: f32) -> f32 {
        let offset = self.list(side).scroll + delta;
        self.scroll_to(side, offset)
    }

    pub fn scroll_to(&mut self, side: ListSide, offset: f32) -> f32 {
        self.list_mut(side).scroll = offset;
        self.clamp_scroll(side);
        self.list(side).scroll
    }

    /// Open the overlay for a container shown in either list
    pub fn open_overlay(&mut self, container_id: u32) -> bool {
        let found = [&self.top, &self.bottom]
            .into_iter()
            .flat_map(|l| l.items.iter())
            .filter_map(Item::as_container)
            .find(|c| c.id == container_id)
            .cloned();
        match found {
            Some(container) => {
                self.overlay = Some(OverlayState { container, page: 0 });
                true
            }
            None => false,
        }
    }

    pub fn close_overlay(&mut self) -> bool {
        self.overlay.take().is_some()
    }

    /// Move the overlay to `page`, clamped to the pages that exist
    pub fn set_overlay_page(&mut self, page: usize) -> Option<usize> {
        let overlay = self.overlay.as_mut()?;
        overlay.page = page.min(overlay.page_count() - 1);
        Some(overlay.page)
    }

    fn probe(&self) -> ListProbe {
        ListProbe {
            screen_width: self.layout.screen_width,
            edge_margin: self.layout.edge_margin,
            top: self.layout.band(ListSide::Top),
            bottom: self.layout.band(ListSide::Bottom),
            top_scroll: self.top.scroll,
            bottom_scroll: self.bottom.scroll,
        }
    }

    /// Zone under the pointer on whichever surface is showing
    pub fn zone(&self, pointer: Point) -> HitZone {
        match &self.overlay {
            Some(overlay) => classify_overlay_zone(
                pointer,
                &self.layout.overlay_bounds,
                &self.layout.overlay_grid,
                overlay.page,
            ),
            None => classify_list_zone(pointer, &self.probe()),
        }
    }

    pub fn item_at(&self, side: ListSide, index: usize) -> Option<&Item> {
        self.list(side).items.get(index)
    }

    /// Item under the pointer, if any. Edge zones are not excluded, so a press
    /// near the screen edge still picks the cell beneath it.
    pub fn pick(&self, pointer: Point) -> Option<Pick> {
        if let Some(overlay) = &self.overlay {
            if !self.layout.overlay_bounds.contains(pointer) {
                return None;
            }
            let grid = &self.layout.overlay_grid;
            let index = resolve_container_grid_index(pointer, overlay.page, grid)?;
            let stack = overlay.stack(index)?;
            return Some(Pick::Overlay {
                container_id: overlay.container.id,
                index,
                stack: stack.clone(),
            });
        }

        for side in [ListSide::Top, ListSide::Bottom] {
            let band = self.layout.band(side);
            if let Some(index) = resolve_list_index(pointer, &band, self.list(side).scroll) {
                return self.item_at(side, index).map(|item| Pick::List {
                    side,
                    index,
                    item: item.clone(),
                });
            }
        }
        None
    }

    /// Screen position of a picked cell's top-left corner
    pub fn cell_origin(&self, pick: &Pick) -> Point {
        match pick {
            Pick::List { side, index, .. } => {
                let band = self.layout.band(*side);
                Point::new(*index as f32 * band.item_width - self.list(*side).scroll, band.top)
            }
            Pick::Overlay { index, .. } => {
                let grid = &self.layout.overlay_grid;
                let slot = index % GRID_PAGE_SIZE;
                let (row, col) = (slot / GRID_COLUMNS, slot % GRID_COLUMNS);
                Point::new(
                    grid.left + col as f32 * grid.col_width,
                    grid.top + row as f32 * (grid.row_height + grid.gap),
                )
            }
        }
    }
}
