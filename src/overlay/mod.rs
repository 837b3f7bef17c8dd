pub mod config;
pub mod manager;
pub mod window;

pub use config::{placement_rect, BarSpec, ScreenEdge};
pub use manager::OverlayManager;
pub use window::{EdgeOverlay, PlacementError, WATCHDOG_INTERVAL};
