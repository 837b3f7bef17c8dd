#[cfg(target_os = "windows")]
fn main() -> anyhow::Result<()> {
    use std::rc::Rc;
    use std::sync::Arc;

    use log::{info, warn};

    use ime_color_indicator::hotkey::{HotkeyBroker, HotkeyEvent};
    use ime_color_indicator::ime::{InputStatePoller, POLL_INTERVAL};
    use ime_color_indicator::logging;
    use ime_color_indicator::overlay::OverlayManager;
    use ime_color_indicator::platform::win32::post_ime_state;
    use ime_color_indicator::platform::{
        OverlayPlatform, PlatformEvent, Win32ImeProbe, Win32Platform,
    };
    use ime_color_indicator::settings::Settings;

    let settings = Settings::default();
    let _log_guard = logging::init(settings.debug_logging);

    info!("starting IME color indicator");

    let platform = Rc::new(Win32Platform::new()?);
    let platform_dyn: Rc<dyn OverlayPlatform> = platform.clone();

    let off_color = settings.ime_off_color();
    let on_color = settings.ime_on_color();

    let mut manager = OverlayManager::new(platform_dyn.clone(), off_color);
    manager.rebuild(settings.bar_specs(), settings.all_monitors);

    let mut broker = HotkeyBroker::new(platform_dyn);
    if let Some(combo) = settings.toggle_bars_hotkey.as_deref() {
        if !broker.register(HotkeyEvent::ToggleBars, combo) {
            warn!("continuing without a toggle-bars hotkey");
        }
    }
    if let Some(combo) = settings.open_settings_hotkey.as_deref() {
        if !broker.register(HotkeyEvent::OpenSettings, combo) {
            warn!("continuing without an open-settings hotkey");
        }
    }

    let sink = platform.sink_handle();
    let mut poller = InputStatePoller::start(Arc::new(Win32ImeProbe), POLL_INTERVAL, move |open| {
        post_ime_state(sink, open);
    });

    platform.run_event_loop(|event| match event {
        PlatformEvent::ImeState(open) => {
            manager.set_color(if open { on_color } else { off_color });
        }
        PlatformEvent::HotkeyFired(id) => match broker.resolve(id) {
            Some(HotkeyEvent::ToggleBars) => {
                let visible = manager.toggle_visible();
                info!("bars {}", if visible { "shown" } else { "hidden" });
            }
            Some(HotkeyEvent::OpenSettings) => {
                // The settings surface belongs to the host shell; the
                // indicator only announces the request.
                info!("settings requested via hotkey");
            }
            None => {}
        },
        PlatformEvent::DisplayChanged => {
            manager.on_topology_changed();
        }
    });

    poller.stop();
    broker.unregister_all();
    Ok(())
}

#[cfg(not(target_os = "windows"))]
fn main() {
    eprintln!("the IME color indicator only runs on Windows");
}
