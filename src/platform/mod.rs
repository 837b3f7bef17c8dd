//! The narrow native-platform surface the core runs against.
//!
//! Everything that touches an operating-system API sits behind the three
//! traits here, so the overlay logic can be driven by a recording fake in
//! tests and by the Win32 backend in the shipped binary. Core components
//! hold the platform as `Rc<dyn OverlayPlatform>`; `Rc` is intentionally
//! `!Send`, which pins every surface-mutating object to the thread that
//! created the platform.

use std::time::Duration;

use crate::color::Color;
use crate::hotkey::HotkeyCombo;
use crate::monitor::{MonitorRegion, TaskbarRegion};

#[cfg(target_os = "windows")]
pub mod win32;

#[cfg(target_os = "windows")]
pub use win32::{Win32ImeProbe, Win32Platform};

/// A rectangle in virtual-screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero-content rectangles are the safe degenerate for bars whose
    /// geometry cannot currently be computed.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Reads the foreground application's input-method open flag.
///
/// Implementations translate every failure (no foreground window, no IME
/// window, API error) into `false`; the probe itself never fails. The probe
/// is the one platform piece that runs off the UI thread, hence `Send +
/// Sync`.
pub trait ImeProbe: Send + Sync {
    fn foreground_ime_open(&self) -> bool;
}

/// One native overlay surface: borderless, click-through, never activated,
/// excluded from the taskbar and window switcher, always-on-top.
///
/// Dropping the box releases the native window and disarms its watchdog
/// timer, which is what makes use-after-destroy unrepresentable: no handle,
/// no callback.
pub trait OverlaySurface {
    /// Move/resize the surface. Never activates it.
    fn set_geometry(&mut self, rect: Rect);

    /// Repaint the fill color. Cannot fail once the surface exists.
    fn set_fill(&mut self, color: Color);

    /// Show or hide without releasing any resources.
    fn set_visible(&mut self, visible: bool);

    /// Re-assert top-most z-order without moving, resizing or activating.
    fn raise_topmost(&mut self);

    /// Arm the periodic top-most re-assertion on this surface. Armed once at
    /// overlay creation; disarmed by dropping the surface.
    fn start_watchdog(&mut self, period: Duration);
}

/// Factory and query surface owned by the UI thread.
pub trait OverlayPlatform {
    /// Create a surface covering `rect`, initially hidden. The
    /// non-interactive properties (click-through, no-activate, taskbar
    /// exclusion, top-most) are applied before the surface can ever become
    /// visible, so no interactive window is flashed.
    fn create_surface(&self, rect: Rect) -> anyhow::Result<Box<dyn OverlaySurface>>;

    /// Enumerate the connected monitors, fresh on every call. Index 0 is the
    /// primary monitor. An empty vec is the degraded answer when enumeration
    /// fails.
    fn monitors(&self) -> Vec<MonitorRegion>;

    /// The shell's taskbar rectangle, or `None` when the query fails or
    /// reports a zero-size region.
    fn taskbar(&self) -> Option<TaskbarRegion>;

    /// Register a global hotkey under `id`. Returns `false` when the
    /// combination is already owned by another application.
    fn register_hotkey(&self, id: i32, combo: &HotkeyCombo) -> bool;

    /// Release a previously registered hotkey. Unknown ids are ignored.
    fn unregister_hotkey(&self, id: i32);
}

/// Typed events the backend delivers to the orchestrator's event loop.
///
/// Each kind has a single producer (poller, hotkey sink, display-change
/// broadcast) and a single consumer (the orchestrator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformEvent {
    /// The input-method open state observed by the poller changed.
    ImeState(bool),
    /// A registered global hotkey fired; the id is the registration id.
    HotkeyFired(i32),
    /// The monitor topology or resolution changed.
    DisplayChanged,
}
