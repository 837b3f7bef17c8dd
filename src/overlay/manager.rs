//! Lifecycle manager for the whole set of edge bars.

use std::collections::HashSet;
use std::rc::Rc;

use log::{info, warn};

use crate::color::Color;
use crate::monitor::MonitorTopology;
use crate::overlay::config::BarSpec;
use crate::overlay::window::EdgeOverlay;
use crate::platform::OverlayPlatform;

/// Owns every live [`EdgeOverlay`] and keeps the set equal to
/// {enabled specs} × {targeted monitors}.
///
/// Reconciliation is always destroy-all-then-recreate. Reconfiguration is
/// user-initiated and rare, so reconstruction wins over incremental diffing;
/// the cheap reversible paths (`set_color`, `set_visible`) never touch the
/// set itself.
pub struct OverlayManager {
    platform: Rc<dyn OverlayPlatform>,
    topology: MonitorTopology,
    overlays: Vec<EdgeOverlay>,
    specs: Vec<BarSpec>,
    all_monitors: bool,
    color: Color,
    visible: bool,
}

impl OverlayManager {
    /// Create an empty manager. No overlays exist until [`rebuild`] runs.
    ///
    /// [`rebuild`]: OverlayManager::rebuild
    pub fn new(platform: Rc<dyn OverlayPlatform>, initial_color: Color) -> Self {
        let topology = MonitorTopology::new(Rc::clone(&platform));
        Self {
            platform,
            topology,
            overlays: Vec::new(),
            specs: Vec::new(),
            all_monitors: false,
            color: initial_color,
            visible: true,
        }
    }

    /// Destroy every live overlay, re-enumerate the monitors, and create the
    /// set implied by `specs`.
    ///
    /// With `all_monitors` set, each spec is fanned across every connected
    /// monitor; otherwise the spec's own monitor index is the only target.
    /// Disabled specs (thickness <= 0) produce nothing. A spec whose monitor
    /// no longer exists is skipped with a warning while the rest of the set
    /// still reconciles. Duplicate `(edge, monitor)` pairs in the input are
    /// dropped so exactly one overlay exists per live pair.
    pub fn rebuild(&mut self, specs: Vec<BarSpec>, all_monitors: bool) {
        // Drop order matters: clearing releases every surface and stops its
        // watchdog before any new surface is created.
        self.overlays.clear();

        let regions = self.topology.enumerate();
        let mut seen = HashSet::new();

        for spec in specs.iter().filter(|s| s.is_enabled()) {
            let targets: Vec<usize> = if all_monitors {
                regions.iter().map(|r| r.index).collect()
            } else {
                vec![spec.monitor]
            };

            for monitor in targets {
                if !seen.insert((spec.edge, monitor)) {
                    warn!("duplicate {} bar for monitor {monitor} ignored", spec.edge);
                    continue;
                }
                let target = BarSpec::on_monitor(spec.edge, spec.thickness, monitor);
                match EdgeOverlay::create(&self.platform, &target, self.color, self.visible) {
                    Ok(overlay) => self.overlays.push(overlay),
                    Err(err) => {
                        warn!("skipping {} bar on monitor {monitor}: {err}", spec.edge);
                    }
                }
            }
        }

        self.specs = specs;
        self.all_monitors = all_monitors;
        info!(
            "rebuilt overlay set: {} bar(s) across {} monitor(s)",
            self.overlays.len(),
            regions.len()
        );
    }

    /// Broadcast a new fill color to every live bar. Also applies to bars
    /// created by later rebuilds.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        for overlay in &mut self.overlays {
            overlay.set_color(color);
        }
    }

    /// Show or hide every live bar. Surfaces are kept alive so this is
    /// cheap and fully reversible; newly rebuilt bars inherit the state.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        for overlay in &mut self.overlays {
            overlay.set_visible(visible);
        }
    }

    /// Flip bar visibility and return the new state. Hotkey entry point.
    pub fn toggle_visible(&mut self) -> bool {
        let next = !self.visible;
        self.set_visible(next);
        next
    }

    /// Reconcile after a display change using the last-applied specs.
    ///
    /// Safe to call repeatedly: reconciliation is idempotent with respect to
    /// the current topology.
    pub fn on_topology_changed(&mut self) {
        info!("display topology changed; rebuilding bars");
        let specs = std::mem::take(&mut self.specs);
        let all_monitors = self.all_monitors;
        self.rebuild(specs, all_monitors);
    }

    pub fn overlays(&self) -> &[EdgeOverlay] {
        &self.overlays
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn color(&self) -> Color {
        self.color
    }
}
