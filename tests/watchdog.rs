use std::rc::Rc;

use ime_color_indicator::color::Color;
use ime_color_indicator::overlay::{BarSpec, OverlayManager, ScreenEdge, WATCHDOG_INTERVAL};
use ime_color_indicator::platform::OverlayPlatform;

#[path = "fake_platform.rs"]
mod fake_platform;
use fake_platform::{FakeOp, FakePlatform};

const BLUE: Color = Color::rgb(0x1E, 0x90, 0xFF);

#[test]
fn every_bar_is_armed_at_creation() {
    let fake = FakePlatform::new();
    let platform: Rc<dyn OverlayPlatform> = Rc::new(fake.clone());
    let mut manager = OverlayManager::new(platform, BLUE);

    manager.rebuild(
        vec![
            BarSpec::new(ScreenEdge::Top, 2),
            BarSpec::new(ScreenEdge::Bottom, 10),
            BarSpec::new(ScreenEdge::Left, 2),
        ],
        false,
    );

    let armed: Vec<_> = fake
        .journal()
        .into_iter()
        .filter_map(|op| match op {
            FakeOp::WatchdogArmed { period, .. } => Some(period),
            _ => None,
        })
        .collect();
    assert_eq!(armed.len(), 3);
    assert!(armed.iter().all(|p| *p == WATCHDOG_INTERVAL));
}

#[test]
fn watchdog_raises_every_live_bar() {
    let fake = FakePlatform::new();
    let platform: Rc<dyn OverlayPlatform> = Rc::new(fake.clone());
    let mut manager = OverlayManager::new(platform, BLUE);

    manager.rebuild(
        vec![
            BarSpec::new(ScreenEdge::Top, 2),
            BarSpec::new(ScreenEdge::Bottom, 10),
        ],
        false,
    );
    fake.clear_journal();

    assert_eq!(fake.fire_watchdogs(), 2);
    let raised = fake
        .journal()
        .iter()
        .filter(|op| matches!(op, FakeOp::Raised { .. }))
        .count();
    assert_eq!(raised, 2);
}

#[test]
fn watchdog_keeps_running_while_hidden() {
    let fake = FakePlatform::new();
    let platform: Rc<dyn OverlayPlatform> = Rc::new(fake.clone());
    let mut manager = OverlayManager::new(platform, BLUE);

    manager.rebuild(vec![BarSpec::new(ScreenEdge::Top, 2)], false);
    manager.set_visible(false);

    assert_eq!(fake.fire_watchdogs(), 1);
}

#[test]
fn destroyed_bars_never_fire_again() {
    let fake = FakePlatform::new();
    let platform: Rc<dyn OverlayPlatform> = Rc::new(fake.clone());
    let mut manager = OverlayManager::new(platform, BLUE);

    manager.rebuild(
        vec![
            BarSpec::new(ScreenEdge::Top, 2),
            BarSpec::new(ScreenEdge::Bottom, 10),
        ],
        false,
    );
    assert_eq!(fake.fire_watchdogs(), 2);

    manager.rebuild(Vec::new(), false);
    assert_eq!(fake.fire_watchdogs(), 0);

    manager.rebuild(vec![BarSpec::new(ScreenEdge::Top, 2)], false);
    assert_eq!(fake.fire_watchdogs(), 1);

    drop(manager);
    assert_eq!(fake.fire_watchdogs(), 0);
}
