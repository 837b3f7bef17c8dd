//! Recording fake of the platform traits, shared by the integration tests
//! via `#[path = "fake_platform.rs"]` includes.
//!
//! The fake journals every surface operation in order, which lets tests
//! assert not just the final overlay set but the sequence that produced it
//! (destroy-before-create, hidden-at-creation, and so on).

// Each test binary exercises a different subset of the fake.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use ime_color_indicator::color::Color;
use ime_color_indicator::hotkey::HotkeyCombo;
use ime_color_indicator::monitor::{MonitorRegion, TaskbarRegion};
use ime_color_indicator::platform::{OverlayPlatform, OverlaySurface, Rect};

/// One observed platform operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeOp {
    Created { id: u64, rect: Rect },
    Geometry { id: u64, rect: Rect },
    Fill { id: u64, color: Color },
    Shown { id: u64 },
    Hidden { id: u64 },
    Raised { id: u64 },
    WatchdogArmed { id: u64, period: Duration },
    Destroyed { id: u64 },
    HotkeyRegistered { id: i32 },
    HotkeyUnregistered { id: i32 },
}

#[derive(Default)]
struct FakeInner {
    monitors: Vec<MonitorRegion>,
    taskbar: Option<TaskbarRegion>,
    journal: Vec<FakeOp>,
    next_id: u64,
    live: Vec<u64>,
    watchdogs: HashMap<u64, Duration>,
    deny_hotkeys: bool,
    hotkeys: Vec<i32>,
}

/// Scriptable [`OverlayPlatform`] double. Clones share state, so a test can
/// keep one handle for scripting and assertions while the code under test
/// owns another as `Rc<dyn OverlayPlatform>`.
#[derive(Clone)]
pub struct FakePlatform {
    inner: Rc<RefCell<FakeInner>>,
}

impl FakePlatform {
    /// A fake with a single primary 1920x1080 monitor and no taskbar.
    pub fn new() -> Self {
        let fake = Self {
            inner: Rc::new(RefCell::new(FakeInner::default())),
        };
        fake.set_monitors(vec![Self::monitor(0, 0, 0, 1920, 1080)]);
        fake
    }

    pub fn monitor(index: usize, x: i32, y: i32, width: i32, height: i32) -> MonitorRegion {
        MonitorRegion {
            index,
            name: format!(r"\\.\DISPLAY{}", index + 1),
            x,
            y,
            width,
            height,
        }
    }

    pub fn set_monitors(&self, monitors: Vec<MonitorRegion>) {
        self.inner.borrow_mut().monitors = monitors;
    }

    pub fn set_taskbar(&self, taskbar: Option<TaskbarRegion>) {
        self.inner.borrow_mut().taskbar = taskbar;
    }

    /// Make every later `register_hotkey` fail, as if another process owned
    /// the combinations.
    pub fn deny_hotkeys(&self, deny: bool) {
        self.inner.borrow_mut().deny_hotkeys = deny;
    }

    pub fn journal(&self) -> Vec<FakeOp> {
        self.inner.borrow().journal.clone()
    }

    pub fn clear_journal(&self) {
        self.inner.borrow_mut().journal.clear();
    }

    /// Surfaces created and not yet dropped.
    pub fn live_surfaces(&self) -> usize {
        self.inner.borrow().live.len()
    }

    pub fn registered_hotkeys(&self) -> Vec<i32> {
        self.inner.borrow().hotkeys.clone()
    }

    /// Simulate one watchdog tick on every live surface with an armed
    /// watchdog; each tick re-asserts topmost order. Returns how many
    /// surfaces fired.
    pub fn fire_watchdogs(&self) -> usize {
        let mut inner = self.inner.borrow_mut();
        let armed: Vec<u64> = inner
            .live
            .iter()
            .copied()
            .filter(|id| inner.watchdogs.contains_key(id))
            .collect();
        for id in &armed {
            inner.journal.push(FakeOp::Raised { id: *id });
        }
        armed.len()
    }
}

struct FakeSurface {
    id: u64,
    inner: Rc<RefCell<FakeInner>>,
}

impl OverlaySurface for FakeSurface {
    fn set_geometry(&mut self, rect: Rect) {
        self.inner
            .borrow_mut()
            .journal
            .push(FakeOp::Geometry { id: self.id, rect });
    }

    fn set_fill(&mut self, color: Color) {
        self.inner
            .borrow_mut()
            .journal
            .push(FakeOp::Fill { id: self.id, color });
    }

    fn set_visible(&mut self, visible: bool) {
        let op = if visible {
            FakeOp::Shown { id: self.id }
        } else {
            FakeOp::Hidden { id: self.id }
        };
        self.inner.borrow_mut().journal.push(op);
    }

    fn raise_topmost(&mut self) {
        self.inner
            .borrow_mut()
            .journal
            .push(FakeOp::Raised { id: self.id });
    }

    fn start_watchdog(&mut self, period: Duration) {
        let mut inner = self.inner.borrow_mut();
        inner.watchdogs.insert(self.id, period);
        inner.journal.push(FakeOp::WatchdogArmed {
            id: self.id,
            period,
        });
    }
}

impl Drop for FakeSurface {
    fn drop(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.live.retain(|&id| id != self.id);
        inner.watchdogs.remove(&self.id);
        inner.journal.push(FakeOp::Destroyed { id: self.id });
    }
}

impl OverlayPlatform for FakePlatform {
    fn create_surface(&self, rect: Rect) -> anyhow::Result<Box<dyn OverlaySurface>> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.live.push(id);
        inner.journal.push(FakeOp::Created { id, rect });
        Ok(Box::new(FakeSurface {
            id,
            inner: Rc::clone(&self.inner),
        }))
    }

    fn monitors(&self) -> Vec<MonitorRegion> {
        self.inner.borrow().monitors.clone()
    }

    fn taskbar(&self) -> Option<TaskbarRegion> {
        self.inner.borrow().taskbar.clone()
    }

    fn register_hotkey(&self, id: i32, _combo: &HotkeyCombo) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.deny_hotkeys {
            return false;
        }
        inner.hotkeys.push(id);
        inner.journal.push(FakeOp::HotkeyRegistered { id });
        true
    }

    fn unregister_hotkey(&self, id: i32) {
        let mut inner = self.inner.borrow_mut();
        inner.hotkeys.retain(|&h| h != id);
        inner.journal.push(FakeOp::HotkeyUnregistered { id });
    }
}
