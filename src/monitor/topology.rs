//! Fresh display-topology queries.

use std::rc::Rc;

use log::warn;

use crate::monitor::{MonitorRegion, TaskbarRegion};
use crate::platform::OverlayPlatform;

/// Query service for the current set of monitors and the taskbar region.
///
/// Deliberately stateless: every call goes back to the platform, because the
/// operating system may change monitor count or resolution at any time.
/// Holding an earlier answer across a display-change notification is exactly
/// the staleness this type exists to rule out.
#[derive(Clone)]
pub struct MonitorTopology {
    platform: Rc<dyn OverlayPlatform>,
}

impl MonitorTopology {
    pub fn new(platform: Rc<dyn OverlayPlatform>) -> Self {
        Self { platform }
    }

    /// Current monitors in enumeration order. Empty when enumeration fails;
    /// callers treat that as "no displays" and degrade, never error.
    pub fn enumerate(&self) -> Vec<MonitorRegion> {
        let regions = self.platform.monitors();
        if regions.is_empty() {
            warn!("monitor enumeration returned no displays");
        }
        regions
    }

    /// Resolve one monitor by index, freshly enumerated.
    pub fn region(&self, index: usize) -> Option<MonitorRegion> {
        self.enumerate().into_iter().find(|r| r.index == index)
    }

    /// The primary-monitor taskbar rectangle, if the shell reports a usable
    /// (non-zero-size) one.
    pub fn taskbar_region(&self) -> Option<TaskbarRegion> {
        self.platform.taskbar().filter(|tb| !tb.is_degenerate())
    }
}
