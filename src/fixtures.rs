//! Shared test data: one organization laid out on the default screen.
//!
//! Top list (Ann, viewer):   [Axe x3, Kit{Gauze x2, Tape}]
//! Bottom list (Bo):         [Bucket, Crate{}, Lamp x2, Net, Oar, Pump]
//! Shelf (storage) holds nothing.

use drag_engine::Point;
use gearshare_lib::domain::{Container, Equipment, Membership, MembershipKind};

use crate::aggregator::{aggregate, Ownerships};
use crate::board::Board;
use crate::config::{EngineConfig, ScreenLayout};
use crate::selection::SelectionCache;

pub const ANN: u32 = 1;
pub const BO: u32 = 2;
pub const SHELF: u32 = 3;
pub const KIT: u32 = 5;
pub const CRATE: u32 = 6;

pub fn memberships() -> Vec<Membership> {
    vec![
        Membership::new(ANN, 1, "Ann".into(), MembershipKind::Member),
        Membership::new(BO, 1, "Bo".into(), MembershipKind::Member),
        Membership::new(SHELF, 1, "Shelf".into(), MembershipKind::Storage),
    ]
}

pub fn containers() -> Vec<Container> {
    vec![
        Container::new(KIT, 1, ANN, "Kit".into()),
        Container::new(CRATE, 1, BO, "Crate".into()),
    ]
}

pub fn equipment() -> Vec<Equipment> {
    let mut records = vec![
        Equipment::new(10, 1, ANN, "Axe".into()),
        Equipment::new(11, 1, ANN, "Axe".into()),
        Equipment::new(12, 1, ANN, "Axe".into()),
        Equipment::new(20, 1, ANN, "Gauze".into()).in_container(KIT),
        Equipment::new(21, 1, ANN, "Gauze".into()).in_container(KIT),
        Equipment::new(22, 1, ANN, "Tape".into()).in_container(KIT),
        Equipment::new(30, 1, BO, "Bucket".into()),
        Equipment::new(31, 1, BO, "Lamp".into()),
        Equipment::new(32, 1, BO, "Lamp".into()),
    ];
    for (id, name) in [(33, "Net"), (34, "Oar"), (35, "Pump")] {
        records.push(Equipment::new(id, 1, BO, name.into()));
    }
    records
}

pub fn ownerships(selection: &SelectionCache) -> Ownerships {
    aggregate(&memberships(), &containers(), &equipment(), selection)
}

pub fn config() -> EngineConfig {
    EngineConfig::default()
}

/// Board with Ann on top and `counterpart` below
pub fn board(selection: &SelectionCache, counterpart: Option<u32>) -> Board {
    let mut board = Board::new(ScreenLayout::default(), ANN);
    board.set_counterpart(counterpart, &ownerships(selection));
    board
}

/// Centre of a cell in the top (row 0) or bottom (row 1) list
pub fn list_cell(bottom: bool, index: usize) -> Point {
    let layout = ScreenLayout::default();
    let top = if bottom { layout.bottom_band_top } else { layout.top_band_top };
    Point::new((index as f32 + 0.5) * layout.item_width, top + layout.item_width / 2.0)
}

/// Centre of an overlay grid cell on the current page
pub fn grid_cell(slot: usize) -> Point {
    let grid = ScreenLayout::default().overlay_grid;
    let (row, col) = (slot / 3, slot % 3);
    Point::new(
        grid.left + (col as f32 + 0.5) * grid.col_width,
        grid.top + row as f32 * (grid.row_height + grid.gap) + grid.row_height / 2.0,
    )
}
