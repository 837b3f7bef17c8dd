//! Declarative bar descriptions and the edge-placement algorithm.

use std::fmt;

use crate::monitor::{MonitorRegion, TaskbarRegion};
use crate::platform::Rect;

/// Screen edge a bar is pinned to.
///
/// `TaskbarEdge` follows the live taskbar rectangle rather than a fixed
/// monitor edge, so it moves when the taskbar is re-docked or auto-hides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScreenEdge {
    Top,
    Bottom,
    Left,
    Right,
    TaskbarEdge,
}

impl fmt::Display for ScreenEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScreenEdge::Top => "top",
            ScreenEdge::Bottom => "bottom",
            ScreenEdge::Left => "left",
            ScreenEdge::Right => "right",
            ScreenEdge::TaskbarEdge => "taskbar",
        };
        f.write_str(name)
    }
}

/// One configured bar: which edge, how thick, which monitor.
///
/// A non-positive thickness means the bar does not exist; the manager never
/// creates an overlay for such a spec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarSpec {
    pub edge: ScreenEdge,
    /// Bar thickness in pixels (height for horizontal edges, width for
    /// vertical ones).
    pub thickness: i32,
    /// Target monitor index in single-monitor mode. Ignored when the
    /// manager fans specs across all monitors.
    pub monitor: usize,
}

impl BarSpec {
    pub fn new(edge: ScreenEdge, thickness: i32) -> Self {
        Self {
            edge,
            thickness,
            monitor: 0,
        }
    }

    pub fn on_monitor(edge: ScreenEdge, thickness: i32, monitor: usize) -> Self {
        Self {
            edge,
            thickness,
            monitor,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.thickness > 0
    }
}

/// Compute the rectangle for a bar of `thickness` pixels on `region`.
///
/// `TaskbarEdge` attaches to the primary-monitor taskbar rectangle no matter
/// which monitor the overlay belongs to; when no usable taskbar region is
/// available the result is empty. A monitor smaller than the requested
/// thickness still yields a rectangle, clamped to zero content rather than
/// reported as an error.
pub fn placement_rect(
    edge: ScreenEdge,
    thickness: i32,
    region: &MonitorRegion,
    taskbar: Option<&TaskbarRegion>,
) -> Rect {
    let rect = match edge {
        ScreenEdge::Top => Rect::new(region.x, region.y, region.width, thickness),
        ScreenEdge::Bottom => Rect::new(
            region.x,
            region.y + region.height - thickness,
            region.width,
            thickness,
        ),
        ScreenEdge::Left => Rect::new(region.x, region.y, thickness, region.height),
        ScreenEdge::Right => Rect::new(
            region.x + region.width - thickness,
            region.y,
            thickness,
            region.height,
        ),
        ScreenEdge::TaskbarEdge => match taskbar {
            Some(tb) if !tb.is_degenerate() => Rect::new(tb.x, tb.y, tb.width, thickness),
            _ => Rect::default(),
        },
    };
    Rect {
        width: rect.width.max(0),
        height: rect.height.max(0),
        ..rect
    }
}
