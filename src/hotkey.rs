//! Global hotkey parsing and registration.
//!
//! Combos are written as `"Ctrl+Alt+I"`. Parsing is fail-closed: any token
//! that is not a known modifier or key rejects the whole string, and a
//! string with no key at all is rejected too. A rejected combo is simply
//! never registered.

use std::rc::Rc;

use log::{error, info, warn};

use crate::platform::OverlayPlatform;

/// A parsed key combination, held in platform-neutral form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyCombo {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub win: bool,
    /// Windows virtual-key code of the final key.
    pub vk: u32,
}

impl HotkeyCombo {
    /// Pack the modifier flags into the bitmask `RegisterHotKey` expects
    /// (MOD_ALT = 1, MOD_CONTROL = 2, MOD_SHIFT = 4, MOD_WIN = 8).
    pub fn win32_modifiers(&self) -> u32 {
        let mut mods = 0;
        if self.alt {
            mods |= 0x0001;
        }
        if self.ctrl {
            mods |= 0x0002;
        }
        if self.shift {
            mods |= 0x0004;
        }
        if self.win {
            mods |= 0x0008;
        }
        mods
    }
}

/// Parse a hotkey string like `"Ctrl+Alt+I"` into a [`HotkeyCombo`].
///
/// Tokens are case-insensitive and surrounding whitespace is ignored.
/// Returns `None` on any unknown token or when no non-modifier key is
/// present.
pub fn parse_hotkey(s: &str) -> Option<HotkeyCombo> {
    let mut ctrl = false;
    let mut alt = false;
    let mut shift = false;
    let mut win = false;
    let mut vk: Option<u32> = None;

    for part in s.split('+') {
        let upper = part.trim().to_ascii_uppercase();
        match upper.as_str() {
            "CTRL" | "CONTROL" => ctrl = true,
            "ALT" => alt = true,
            "SHIFT" => shift = true,
            "WIN" | "WINDOWS" => win = true,
            "" => {}
            _ => match virtual_key_from_token(&upper) {
                Some(code) => vk = Some(code),
                None => return None,
            },
        }
    }

    vk.map(|vk| HotkeyCombo {
        ctrl,
        alt,
        shift,
        win,
        vk,
    })
}

/// Map an upper-cased token to its virtual-key code. Covers the function
/// keys, letters and digits; everything else is unknown.
fn virtual_key_from_token(upper: &str) -> Option<u32> {
    match upper {
        "F1" => Some(0x70),
        "F2" => Some(0x71),
        "F3" => Some(0x72),
        "F4" => Some(0x73),
        "F5" => Some(0x74),
        "F6" => Some(0x75),
        "F7" => Some(0x76),
        "F8" => Some(0x77),
        "F9" => Some(0x78),
        "F10" => Some(0x79),
        "F11" => Some(0x7A),
        "F12" => Some(0x7B),
        _ => {
            // VK codes for letters and digits coincide with ASCII.
            let [c] = upper.as_bytes() else { return None };
            match c {
                b'A'..=b'Z' | b'0'..=b'9' => Some(*c as u32),
                _ => None,
            }
        }
    }
}

/// Actions a registered hotkey can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEvent {
    ToggleBars,
    OpenSettings,
}

impl HotkeyEvent {
    /// Stable registration id passed to the OS and echoed back in
    /// `WM_HOTKEY`.
    pub const fn id(self) -> i32 {
        match self {
            HotkeyEvent::ToggleBars => 1,
            HotkeyEvent::OpenSettings => 2,
        }
    }

    pub const fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(HotkeyEvent::ToggleBars),
            2 => Some(HotkeyEvent::OpenSettings),
            _ => None,
        }
    }
}

/// Owns the set of live hotkey registrations.
///
/// Each registration is independent: a combo that fails to parse or that
/// the OS rejects (typically because another process holds it) is logged
/// and skipped, and the rest keep working.
pub struct HotkeyBroker {
    platform: Rc<dyn OverlayPlatform>,
    registered: Vec<HotkeyEvent>,
}

impl HotkeyBroker {
    pub fn new(platform: Rc<dyn OverlayPlatform>) -> Self {
        Self {
            platform,
            registered: Vec::new(),
        }
    }

    /// Parse `combo` and register it for `event`. Returns whether the
    /// registration is live.
    pub fn register(&mut self, event: HotkeyEvent, combo: &str) -> bool {
        let Some(parsed) = parse_hotkey(combo) else {
            warn!("invalid hotkey '{combo}', not registering");
            return false;
        };
        if self.registered.contains(&event) {
            self.platform.unregister_hotkey(event.id());
            self.registered.retain(|e| *e != event);
        }
        if self.platform.register_hotkey(event.id(), &parsed) {
            info!("registered hotkey '{combo}' for {event:?}");
            self.registered.push(event);
            true
        } else {
            error!("failed to register hotkey '{combo}' for {event:?}");
            false
        }
    }

    /// Look up which event a `WM_HOTKEY` id belongs to. Ids that were never
    /// successfully registered resolve to `None`.
    pub fn resolve(&self, id: i32) -> Option<HotkeyEvent> {
        HotkeyEvent::from_id(id).filter(|event| self.registered.contains(event))
    }

    /// Drop every live registration. Safe to call more than once.
    pub fn unregister_all(&mut self) {
        for event in self.registered.drain(..) {
            self.platform.unregister_hotkey(event.id());
        }
    }
}

impl Drop for HotkeyBroker {
    fn drop(&mut self) {
        self.unregister_all();
    }
}
