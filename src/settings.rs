//! Configuration snapshot consumed by the orchestrator.
//!
//! Loading and saving the document belongs to the settings surface, not to
//! this crate; here we only define the record, its defaults and the
//! conversions into bar specs and colors. Every field carries its own
//! serde default so a partial document from an older version still
//! deserializes cleanly.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::overlay::{BarSpec, ScreenEdge};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Bar color while the input method is off, as `#RRGGBB` or `#AARRGGBB`.
    #[serde(default = "default_ime_off_color")]
    pub ime_off_color: String,
    /// Bar color while the input method is on.
    #[serde(default = "default_ime_on_color")]
    pub ime_on_color: String,

    /// Per-edge bar thickness in pixels. A value of zero disables the edge
    /// just like clearing its show flag.
    #[serde(default = "default_top_bar_height")]
    pub top_bar_height: i32,
    #[serde(default = "default_bottom_bar_height")]
    pub bottom_bar_height: i32,
    #[serde(default = "default_side_bar_width")]
    pub left_bar_width: i32,
    #[serde(default = "default_side_bar_width")]
    pub right_bar_width: i32,
    #[serde(default = "default_taskbar_bar_height")]
    pub taskbar_bar_height: i32,

    #[serde(default = "default_show_bar")]
    pub show_top_bar: bool,
    #[serde(default = "default_show_bar")]
    pub show_bottom_bar: bool,
    #[serde(default = "default_show_bar")]
    pub show_left_bar: bool,
    #[serde(default = "default_show_bar")]
    pub show_right_bar: bool,
    /// The bar along the taskbar's exposed edge. Off by default.
    #[serde(default)]
    pub show_taskbar_bar: bool,

    /// Mirror the bars on every connected monitor instead of the primary
    /// one only.
    #[serde(default)]
    pub all_monitors: bool,

    /// Combo that toggles bar visibility. `None` leaves the hotkey
    /// unregistered.
    #[serde(default = "default_toggle_bars_hotkey")]
    pub toggle_bars_hotkey: Option<String>,
    /// Combo that asks the host to open its settings surface.
    #[serde(default = "default_open_settings_hotkey")]
    pub open_settings_hotkey: Option<String>,

    /// Recorded for the settings surface; nothing in this crate acts on it.
    #[serde(default)]
    pub auto_update: bool,
    /// When enabled the host initialises logging at debug level.
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_ime_off_color() -> String {
    "#1E90FF".to_string()
}

fn default_ime_on_color() -> String {
    "#32CD32".to_string()
}

fn default_top_bar_height() -> i32 {
    2
}

fn default_bottom_bar_height() -> i32 {
    10
}

fn default_side_bar_width() -> i32 {
    2
}

fn default_taskbar_bar_height() -> i32 {
    2
}

fn default_show_bar() -> bool {
    true
}

fn default_toggle_bars_hotkey() -> Option<String> {
    Some("Ctrl+Alt+I".to_string())
}

fn default_open_settings_hotkey() -> Option<String> {
    Some("Ctrl+Alt+O".to_string())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ime_off_color: default_ime_off_color(),
            ime_on_color: default_ime_on_color(),
            top_bar_height: default_top_bar_height(),
            bottom_bar_height: default_bottom_bar_height(),
            left_bar_width: default_side_bar_width(),
            right_bar_width: default_side_bar_width(),
            taskbar_bar_height: default_taskbar_bar_height(),
            show_top_bar: true,
            show_bottom_bar: true,
            show_left_bar: true,
            show_right_bar: true,
            show_taskbar_bar: false,
            all_monitors: false,
            toggle_bars_hotkey: default_toggle_bars_hotkey(),
            open_settings_hotkey: default_open_settings_hotkey(),
            auto_update: false,
            debug_logging: false,
        }
    }
}

impl Settings {
    /// The bar set this snapshot declares, one spec per shown edge. Edges
    /// that are hidden are omitted entirely; zero thickness is left for the
    /// manager to filter so the two disable paths behave the same.
    pub fn bar_specs(&self) -> Vec<BarSpec> {
        let mut specs = Vec::new();
        if self.show_top_bar {
            specs.push(BarSpec::new(ScreenEdge::Top, self.top_bar_height));
        }
        if self.show_bottom_bar {
            specs.push(BarSpec::new(ScreenEdge::Bottom, self.bottom_bar_height));
        }
        if self.show_left_bar {
            specs.push(BarSpec::new(ScreenEdge::Left, self.left_bar_width));
        }
        if self.show_right_bar {
            specs.push(BarSpec::new(ScreenEdge::Right, self.right_bar_width));
        }
        if self.show_taskbar_bar {
            specs.push(BarSpec::new(ScreenEdge::TaskbarEdge, self.taskbar_bar_height));
        }
        specs
    }

    /// Parsed off-state color, falling back to the default on a malformed
    /// string. Bad configuration must never stop startup.
    pub fn ime_off_color(&self) -> Color {
        parse_or_default(&self.ime_off_color, &default_ime_off_color())
    }

    /// Parsed on-state color, with the same fallback behavior.
    pub fn ime_on_color(&self) -> Color {
        parse_or_default(&self.ime_on_color, &default_ime_on_color())
    }
}

fn parse_or_default(text: &str, fallback: &str) -> Color {
    match Color::parse_hex(text) {
        Some(color) => color,
        None => {
            warn!("unparseable color '{text}', using default '{fallback}'");
            // The built-in defaults always parse.
            Color::parse_hex(fallback).unwrap_or(Color::rgb(0, 0, 0))
        }
    }
}
