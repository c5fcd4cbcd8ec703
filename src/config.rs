//! Engine Configuration
//!
//! Timings and screen geometry for the reassignment screen. Every field has
//! a default, so a JSON file only needs the values it overrides.

use std::path::Path;
use std::time::Duration;

use drag_engine::{GridMetrics, ListBand, ListSide, Rect};
use serde::{Deserialize, Serialize};

/// Geometry of the two-list screen and the container overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenLayout {
    pub screen_width: f32,
    /// Drops above this line go to the viewer, below it to the counterpart
    pub split_y: f32,
    pub top_band_top: f32,
    pub bottom_band_top: f32,
    /// Rendered width (and height) of one list item
    pub item_width: f32,
    /// Distance from a screen edge that triggers auto-scroll
    pub edge_margin: f32,
    pub overlay_bounds: Rect,
    pub overlay_grid: GridMetrics,
}

impl Default for ScreenLayout {
    fn default() -> Self {
        Self {
            screen_width: 390.0,
            split_y: 420.0,
            top_band_top: 160.0,
            bottom_band_top: 560.0,
            item_width: 110.0,
            edge_margin: 32.0,
            overlay_bounds: Rect::new(25.0, 180.0, 340.0, 420.0),
            overlay_grid: GridMetrics {
                left: 40.0,
                top: 250.0,
                col_width: 103.0,
                row_height: 100.0,
                gap: 12.0,
            },
        }
    }
}

impl ScreenLayout {
    pub fn band(&self, side: ListSide) -> ListBand {
        match side {
            ListSide::Top => ListBand::new(self.top_band_top, self.item_width),
            ListSide::Bottom => ListBand::new(self.bottom_band_top, self.item_width),
        }
    }

    /// List whose half of the screen contains `y`
    pub fn side_at(&self, y: f32) -> ListSide {
        if y < self.split_y {
            ListSide::Top
        } else {
            ListSide::Bottom
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Press duration that turns a touch into a drag
    pub hold_ms: u64,
    /// Movement allowed while the press is still arming
    pub arm_slop: f32,
    /// Hover time over a container before it becomes the drop container
    pub drill_delay_ms: u64,
    /// Time outside the overlay before it is dismissed
    pub dismiss_delay_ms: u64,
    pub autoscroll_hz: u32,
    /// Pixels scrolled per auto-scroll tick
    pub autoscroll_step: f32,
    pub idle_scale: f32,
    pub drilling_scale: f32,
    pub layout: ScreenLayout,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hold_ms: 500,
            arm_slop: 10.0,
            drill_delay_ms: 500,
            dismiss_delay_ms: 500,
            autoscroll_hz: 60,
            autoscroll_step: 6.0,
            idle_scale: 1.0,
            drilling_scale: 0.6,
            layout: ScreenLayout::default(),
        }
    }
}

impl EngineConfig {
    pub fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }

    pub fn drill_delay(&self) -> Duration {
        Duration::from_millis(self.drill_delay_ms)
    }

    pub fn dismiss_delay(&self) -> Duration {
        Duration::from_millis(self.dismiss_delay_ms)
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid engine config: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_json_str(&text)
    }
}
