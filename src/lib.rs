//! Screen-edge input-method indicator.
//!
//! Thin colored bars along the screen edges show at a glance whether the
//! foreground application's input method is on or off. The crate is split
//! into a platform-neutral core (overlay set reconciliation, placement,
//! polling, hotkey parsing) and a Win32 backend behind the traits in
//! [`platform`].

pub mod color;
pub mod hotkey;
pub mod ime;
pub mod logging;
pub mod monitor;
pub mod overlay;
pub mod platform;
pub mod settings;
