//! One overlay bar pinned to a screen edge.

use std::rc::Rc;
use std::time::Duration;

use log::debug;
use thiserror::Error;

use crate::color::Color;
use crate::monitor::MonitorTopology;
use crate::overlay::config::{placement_rect, BarSpec, ScreenEdge};
use crate::platform::{OverlayPlatform, OverlaySurface};

/// How often each bar re-asserts its top-most z-order. Other applications
/// (full-screen video, elevated windows) can transiently steal the top-most
/// slot; this is the self-healing interval.
pub const WATCHDOG_INTERVAL: Duration = Duration::from_millis(500);

/// Why a bar could not be created.
///
/// Placement failures are not fatal: the manager skips the affected bar and
/// reconciles the rest of the set.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// The spec referenced a monitor that is no longer connected.
    #[error("monitor {0} is no longer present")]
    MonitorGone(usize),
    /// The platform refused to create the native surface.
    #[error("overlay surface creation failed: {0}")]
    Surface(#[from] anyhow::Error),
}

/// A single edge bar: one native overlay surface plus the placement inputs
/// needed to re-derive its geometry.
///
/// Owned exclusively by the [`OverlayManager`](crate::overlay::OverlayManager).
/// Dropping the overlay releases the surface and stops its watchdog, so a
/// destroyed bar can never fire another callback or receive another
/// operation.
pub struct EdgeOverlay {
    topology: MonitorTopology,
    surface: Box<dyn OverlaySurface>,
    edge: ScreenEdge,
    thickness: i32,
    monitor: usize,
    color: Color,
    visible: bool,
}

impl EdgeOverlay {
    /// Create the surface for `spec`, filled with `color`, and arm its
    /// watchdog.
    ///
    /// The surface is built hidden with its non-interactive properties
    /// already applied, then shown only if `visible` is set, so no
    /// interactive window is ever flashed. Fails with
    /// [`PlacementError::MonitorGone`] when the target monitor vanished
    /// between enumeration and creation.
    pub fn create(
        platform: &Rc<dyn OverlayPlatform>,
        spec: &BarSpec,
        color: Color,
        visible: bool,
    ) -> Result<Self, PlacementError> {
        let topology = MonitorTopology::new(Rc::clone(platform));
        let region = topology
            .region(spec.monitor)
            .ok_or(PlacementError::MonitorGone(spec.monitor))?;
        let taskbar = topology.taskbar_region();
        let rect = placement_rect(spec.edge, spec.thickness, &region, taskbar.as_ref());

        let mut surface = platform.create_surface(rect)?;
        surface.set_fill(color);
        surface.start_watchdog(WATCHDOG_INTERVAL);
        if visible {
            surface.set_visible(true);
        }
        debug!(
            "created {} bar on monitor {} ({}x{} at {},{})",
            spec.edge, spec.monitor, rect.width, rect.height, rect.x, rect.y
        );

        Ok(Self {
            topology,
            surface,
            edge: spec.edge,
            thickness: spec.thickness,
            monitor: spec.monitor,
            color,
            visible,
        })
    }

    pub fn edge(&self) -> ScreenEdge {
        self.edge
    }

    pub fn monitor(&self) -> usize {
        self.monitor
    }

    pub fn thickness(&self) -> i32 {
        self.thickness
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Repaint the fill color. Geometry and z-order are untouched; this
    /// cannot fail once the overlay exists.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.surface.set_fill(color);
    }

    /// Re-place the bar with a new thickness and re-assert top-most order.
    /// No-op when the thickness is unchanged.
    pub fn set_thickness(&mut self, thickness: i32) {
        if thickness == self.thickness {
            return;
        }
        self.thickness = thickness;
        self.relayout();
    }

    /// Recompute geometry from the current topology and re-assert top-most
    /// order.
    ///
    /// If the owning monitor has disappeared the geometry is left alone; the
    /// manager's next reconciliation destroys the bar.
    fn relayout(&mut self) {
        if let Some(region) = self.topology.region(self.monitor) {
            let taskbar = self.topology.taskbar_region();
            let rect = placement_rect(self.edge, self.thickness, &region, taskbar.as_ref());
            self.surface.set_geometry(rect);
        }
        self.surface.raise_topmost();
    }

    /// Show or hide the surface. Resources and the watchdog stay alive, so
    /// re-showing is cheap and the last-set color is preserved.
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        self.surface.set_visible(visible);
    }

    /// Release the surface and stop its watchdog. Equivalent to dropping
    /// the overlay; ownership makes a second destroy unrepresentable.
    pub fn destroy(self) {}
}
