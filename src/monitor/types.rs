//! Display-geometry types reported by the platform.

/// One connected monitor in virtual-screen coordinates.
///
/// `index` follows platform enumeration order; index 0 is the primary
/// monitor. Regions are always re-read from the platform before use - a
/// cached region may describe a monitor that no longer exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorRegion {
    /// Position in the enumeration order.
    pub index: usize,
    /// Device name reported by the platform (e.g. `\\.\DISPLAY1`).
    pub name: String,
    /// X coordinate of the monitor's top-left corner.
    pub x: i32,
    /// Y coordinate of the monitor's top-left corner.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

/// Which screen edge the taskbar is docked to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskbarPosition {
    Left,
    Top,
    Right,
    Bottom,
    Unknown,
}

/// The shell's reserved taskbar rectangle on the primary monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskbarRegion {
    pub position: TaskbarPosition,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl TaskbarRegion {
    /// A zero-area region means the shell query failed or the taskbar is
    /// currently unavailable; callers degrade to an empty bar.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}
