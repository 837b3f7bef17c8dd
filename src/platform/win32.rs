//! Win32 backend: layered bar windows, monitor and taskbar queries, global
//! hotkeys, the hidden event-sink window and the IME probe.
//!
//! Everything except [`Win32ImeProbe`] and [`post_ime_state`] must run on
//! the thread that created the [`Win32Platform`]; window handles are
//! thread-affine and the window procedures below rely on thread-local
//! state.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use anyhow::{Result, bail};
use log::warn;

use windows::Win32::Foundation::{COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreateSolidBrush, DeleteObject, EndPaint, EnumDisplayMonitors, FillRect,
    GetMonitorInfoW, HBRUSH, HDC, HMONITOR, InvalidateRect, MONITORINFOEXW, MONITORINFOF_PRIMARY,
    PAINTSTRUCT, UpdateWindow,
};
use windows::Win32::UI::Input::Ime::{IMC_GETOPENSTATUS, ImmGetDefaultIMEWnd};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    HOT_KEY_MODIFIERS, MOD_NOREPEAT, RegisterHotKey, UnregisterHotKey,
};
use windows::Win32::UI::Shell::{
    ABE_BOTTOM, ABE_LEFT, ABE_RIGHT, ABE_TOP, ABM_GETTASKBARPOS, APPBARDATA, SHAppBarMessage,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CS_HREDRAW, CS_VREDRAW, CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW,
    GetForegroundWindow, GetMessageW, HWND_TOPMOST, KillTimer, LWA_ALPHA, MSG, PostMessageW,
    RegisterClassW, SW_HIDE, SW_SHOWNA, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SendMessageW,
    SetLayeredWindowAttributes, SetTimer, SetWindowPos, ShowWindow, TranslateMessage,
    WINDOW_EX_STYLE, WM_IME_CONTROL, WM_USER, WNDCLASSW, WS_DISABLED, WS_EX_LAYERED,
    WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
};
use windows::core::{BOOL, PCWSTR};

use crate::color::Color;
use crate::hotkey::HotkeyCombo;
use crate::monitor::{MonitorRegion, TaskbarPosition, TaskbarRegion};
use crate::platform::{ImeProbe, OverlayPlatform, OverlaySurface, PlatformEvent, Rect};

/// Custom sink message carrying a marshaled IME state in `WPARAM`.
pub const WM_IME_STATE: u32 = WM_USER + 1;
/// No-op sink message posted to pop the message loop after an event was
/// queued from a *sent* message, which is otherwise handled inside
/// `GetMessageW` without waking the pump.
const WM_WAKE: u32 = WM_USER + 2;

/// Timer id of the per-bar topmost watchdog.
const TOPMOST_TIMER_ID: usize = 1;

// SPI_SETWORKAREA, the broadcast the shell sends when the taskbar moves.
const WORKAREA_CHANGED: usize = 0x002F;

/// Bar window class atom — registered once, reused by every bar window.
static mut BAR_CLASS_ATOM: u16 = 0;
/// Sink window class atom.
static mut SINK_CLASS_ATOM: u16 = 0;

thread_local! {
    /// Fill color per bar window, keyed by raw handle. The paint handler
    /// runs on the windows' owning thread, so no locking is involved.
    static BAR_COLORS: RefCell<HashMap<isize, u32>> = RefCell::new(HashMap::new());
    /// Queue fed by the sink window procedure. Installed before the sink
    /// window exists; cleared when the platform is dropped.
    static SINK_QUEUE: RefCell<Option<Sender<PlatformEvent>>> = RefCell::new(None);
}

// ─── Window procedures ──────────────────────────────────────────────────────

/// Window procedure for bar windows.
///
/// Handles three messages:
/// * `WM_PAINT` — fills the window with its registered indicator color.
/// * `WM_TIMER` — re-asserts topmost z-order. Deliberately without a show
///   flag: a hidden bar must stay hidden while its watchdog keeps running.
/// * `WM_DESTROY` — returns without posting a quit message, because bar
///   windows share the UI thread's message loop with the sink.
unsafe extern "system" fn bar_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe {
        match msg {
            // WM_PAINT
            0x000F => {
                let mut ps = PAINTSTRUCT::default();
                let hdc = BeginPaint(hwnd, &mut ps);
                if !hdc.is_invalid() {
                    let color = BAR_COLORS
                        .with(|colors| colors.borrow().get(&(hwnd.0 as isize)).copied())
                        .unwrap_or(0);
                    let brush = CreateSolidBrush(COLORREF(color));
                    if !brush.is_invalid() {
                        let _ = FillRect(hdc, &ps.rcPaint, brush);
                        let _ = DeleteObject(brush.into());
                    }
                    let _ = EndPaint(hwnd, &ps);
                }
                LRESULT(0)
            }
            // WM_TIMER: topmost watchdog tick
            0x0113 => {
                let _ = SetWindowPos(
                    hwnd,
                    Some(HWND_TOPMOST),
                    0,
                    0,
                    0,
                    0,
                    SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
                );
                LRESULT(0)
            }
            // WM_DESTROY
            0x0002 => LRESULT(0),
            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}

/// Window procedure for the hidden event sink.
///
/// Translates the raw messages the sink receives into [`PlatformEvent`]s:
/// * `WM_HOTKEY` — a registered global hotkey fired, id in `WPARAM`.
/// * `WM_DISPLAYCHANGE` — monitor set or resolution changed.
/// * `WM_SETTINGCHANGE` with `SPI_SETWORKAREA` — the taskbar moved or
///   resized, which the shell broadcasts as a work-area change.
/// * `WM_IME_STATE` — IME state marshaled over from the poller thread.
unsafe extern "system" fn sink_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    unsafe {
        match msg {
            // WM_HOTKEY
            0x0312 => {
                enqueue_sink_event(hwnd, PlatformEvent::HotkeyFired(wparam.0 as i32));
                LRESULT(0)
            }
            // WM_DISPLAYCHANGE
            0x007E => {
                enqueue_sink_event(hwnd, PlatformEvent::DisplayChanged);
                LRESULT(0)
            }
            // WM_SETTINGCHANGE
            0x001A => {
                if wparam.0 == WORKAREA_CHANGED {
                    enqueue_sink_event(hwnd, PlatformEvent::DisplayChanged);
                }
                LRESULT(0)
            }
            WM_IME_STATE => {
                enqueue_sink_event(hwnd, PlatformEvent::ImeState(wparam.0 != 0));
                LRESULT(0)
            }
            WM_WAKE => LRESULT(0),
            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}

fn enqueue_sink_event(hwnd: HWND, event: PlatformEvent) {
    SINK_QUEUE.with(|queue| {
        if let Some(tx) = queue.borrow().as_ref() {
            let _ = tx.send(event);
        }
    });
    // Display and setting changes arrive as sent messages, delivered inside
    // GetMessageW without it returning; the wake post forces the pump to
    // come around and drain the queue.
    unsafe {
        let _ = PostMessageW(Some(hwnd), WM_WAKE, WPARAM(0), LPARAM(0));
    }
}

// ─── Class registration ─────────────────────────────────────────────────────

/// Register the `ImeIndicatorBarClass` window class.
///
/// This is idempotent — the class is only registered on the first call.
unsafe fn register_bar_class() -> Result<()> {
    if unsafe { BAR_CLASS_ATOM } != 0 {
        return Ok(());
    }

    let hinstance = HINSTANCE(std::ptr::null_mut());
    let class_name: Vec<u16> = "ImeIndicatorBarClass\0".encode_utf16().collect();

    let wc = WNDCLASSW {
        lpfnWndProc: Some(bar_wnd_proc),
        hInstance: hinstance,
        lpszClassName: PCWSTR(class_name.as_ptr()),
        style: CS_HREDRAW | CS_VREDRAW,
        hbrBackground: HBRUSH(std::ptr::null_mut()),
        ..Default::default()
    };

    let atom = unsafe { RegisterClassW(&wc) };
    if atom == 0 {
        bail!("failed to register bar window class");
    }

    unsafe {
        BAR_CLASS_ATOM = atom;
    }
    Ok(())
}

/// Register the `ImeIndicatorSinkClass` window class, idempotently.
unsafe fn register_sink_class() -> Result<()> {
    if unsafe { SINK_CLASS_ATOM } != 0 {
        return Ok(());
    }

    let hinstance = HINSTANCE(std::ptr::null_mut());
    let class_name: Vec<u16> = "ImeIndicatorSinkClass\0".encode_utf16().collect();

    let wc = WNDCLASSW {
        lpfnWndProc: Some(sink_wnd_proc),
        hInstance: hinstance,
        lpszClassName: PCWSTR(class_name.as_ptr()),
        ..Default::default()
    };

    let atom = unsafe { RegisterClassW(&wc) };
    if atom == 0 {
        bail!("failed to register sink window class");
    }

    unsafe {
        SINK_CLASS_ATOM = atom;
    }
    Ok(())
}

// ─── Window creation ────────────────────────────────────────────────────────

/// Create one layered bar window, initially hidden.
///
/// The window is:
/// * Layered (`WS_EX_LAYERED`) with alpha-based transparency.
/// * Click-through (`WS_EX_TRANSPARENT`, `WS_DISABLED`).
/// * Always on top (`WS_EX_TOPMOST`).
/// * Hidden from the taskbar (`WS_EX_TOOLWINDOW`).
/// * Never steals focus (`WS_EX_NOACTIVATE`).
unsafe fn create_bar_window(rect: Rect) -> Result<HWND> {
    let hinstance = HINSTANCE(std::ptr::null_mut());
    let class_name: Vec<u16> = "ImeIndicatorBarClass\0".encode_utf16().collect();
    let window_name: Vec<u16> = "IME Indicator Bar\0".encode_utf16().collect();

    let ex_style = WINDOW_EX_STYLE(
        WS_EX_LAYERED.0
            | WS_EX_TRANSPARENT.0
            | WS_EX_TOPMOST.0
            | WS_EX_TOOLWINDOW.0
            | WS_EX_NOACTIVATE.0,
    );

    let hwnd = unsafe {
        CreateWindowExW(
            ex_style,
            PCWSTR(class_name.as_ptr()),
            PCWSTR(window_name.as_ptr()),
            WS_POPUP | WS_DISABLED,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            None,
            None,
            Some(hinstance),
            None,
        )?
    };

    if hwnd.0.is_null() {
        bail!("failed to create bar window");
    }

    unsafe {
        // Fully opaque; the indicator color comes from the paint handler.
        let _ = SetLayeredWindowAttributes(hwnd, COLORREF(0), 255, LWA_ALPHA);
        let _ = SetWindowPos(
            hwnd,
            Some(HWND_TOPMOST),
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            SWP_NOACTIVATE,
        );
    }

    Ok(hwnd)
}

/// Create the hidden zero-size sink window.
///
/// The sink is a real top-level window rather than a message-only one so
/// that `WM_DISPLAYCHANGE` and `WM_SETTINGCHANGE` broadcasts reach it. It
/// is never shown.
unsafe fn create_sink_window() -> Result<HWND> {
    let hinstance = HINSTANCE(std::ptr::null_mut());
    let class_name: Vec<u16> = "ImeIndicatorSinkClass\0".encode_utf16().collect();
    let window_name: Vec<u16> = "IME Indicator Events\0".encode_utf16().collect();

    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(WS_EX_TOOLWINDOW.0),
            PCWSTR(class_name.as_ptr()),
            PCWSTR(window_name.as_ptr()),
            WS_POPUP,
            0,
            0,
            0,
            0,
            None,
            None,
            Some(hinstance),
            None,
        )?
    };

    if hwnd.0.is_null() {
        bail!("failed to create event sink window");
    }
    Ok(hwnd)
}

// ─── Surfaces ───────────────────────────────────────────────────────────────

/// One live bar window. Dropping the surface disarms the watchdog timer,
/// forgets the paint color and destroys the window.
struct Win32Surface {
    hwnd: HWND,
}

impl OverlaySurface for Win32Surface {
    fn set_geometry(&mut self, rect: Rect) {
        unsafe {
            let _ = SetWindowPos(
                self.hwnd,
                Some(HWND_TOPMOST),
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                SWP_NOACTIVATE,
            );
            let _ = InvalidateRect(Some(self.hwnd), None, true);
        }
    }

    fn set_fill(&mut self, color: Color) {
        BAR_COLORS.with(|colors| {
            colors
                .borrow_mut()
                .insert(self.hwnd.0 as isize, color.to_colorref());
        });
        unsafe {
            let _ = SetLayeredWindowAttributes(self.hwnd, COLORREF(0), color.a, LWA_ALPHA);
            let _ = InvalidateRect(Some(self.hwnd), None, true);
        }
    }

    fn set_visible(&mut self, visible: bool) {
        unsafe {
            if visible {
                // SW_SHOWNA keeps focus where it is.
                let _ = ShowWindow(self.hwnd, SW_SHOWNA);
                let _ = UpdateWindow(self.hwnd);
            } else {
                let _ = ShowWindow(self.hwnd, SW_HIDE);
            }
        }
    }

    fn raise_topmost(&mut self) {
        unsafe {
            let _ = SetWindowPos(
                self.hwnd,
                Some(HWND_TOPMOST),
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
            );
        }
    }

    fn start_watchdog(&mut self, period: Duration) {
        unsafe {
            let _ = SetTimer(
                Some(self.hwnd),
                TOPMOST_TIMER_ID,
                period.as_millis() as u32,
                None,
            );
        }
    }
}

impl Drop for Win32Surface {
    fn drop(&mut self) {
        BAR_COLORS.with(|colors| {
            colors.borrow_mut().remove(&(self.hwnd.0 as isize));
        });
        unsafe {
            let _ = KillTimer(Some(self.hwnd), TOPMOST_TIMER_ID);
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

// ─── Platform ───────────────────────────────────────────────────────────────

/// Win32 implementation of [`OverlayPlatform`].
///
/// Owns the hidden sink window and the queue it feeds. `!Send` by
/// construction (it holds a window handle), which keeps it on the UI
/// thread.
pub struct Win32Platform {
    sink_hwnd: HWND,
    events: Receiver<PlatformEvent>,
}

impl Win32Platform {
    /// Register the window classes, install the event queue and create the
    /// sink window, on the calling thread.
    pub fn new() -> Result<Self> {
        unsafe {
            register_bar_class()?;
            register_sink_class()?;
        }

        // The sender must be in place before the window exists; broadcasts
        // can be delivered during creation.
        let (tx, rx) = mpsc::channel();
        SINK_QUEUE.with(|queue| *queue.borrow_mut() = Some(tx));

        let sink_hwnd = unsafe { create_sink_window()? };
        Ok(Self {
            sink_hwnd,
            events: rx,
        })
    }

    /// Raw handle of the sink window, for marshaling from worker threads.
    pub fn sink_handle(&self) -> isize {
        self.sink_hwnd.0 as isize
    }

    /// Drain one queued platform event, if any.
    pub fn try_recv_event(&self) -> Option<PlatformEvent> {
        self.events.try_recv().ok()
    }

    /// Run the UI thread's message loop until `WM_QUIT`, invoking `handler`
    /// for every platform event that the dispatched messages produced.
    pub fn run_event_loop(&self, mut handler: impl FnMut(PlatformEvent)) {
        let mut msg = MSG::default();
        unsafe {
            while GetMessageW(&mut msg, None, 0, 0).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
                while let Some(event) = self.try_recv_event() {
                    handler(event);
                }
            }
        }
    }
}

impl Drop for Win32Platform {
    fn drop(&mut self) {
        SINK_QUEUE.with(|queue| queue.borrow_mut().take());
        unsafe {
            let _ = DestroyWindow(self.sink_hwnd);
        }
    }
}

impl OverlayPlatform for Win32Platform {
    fn create_surface(&self, rect: Rect) -> Result<Box<dyn OverlaySurface>> {
        let hwnd = unsafe { create_bar_window(rect)? };
        Ok(Box::new(Win32Surface { hwnd }))
    }

    fn monitors(&self) -> Vec<MonitorRegion> {
        // (is_primary, region) pairs in enumeration order; sorted below so
        // index 0 is always the primary display.
        let mut found: Vec<(bool, MonitorRegion)> = Vec::new();

        unsafe extern "system" fn enum_proc(
            hmonitor: HMONITOR,
            _hdc: HDC,
            _rect: *mut RECT,
            lparam: LPARAM,
        ) -> BOOL {
            unsafe {
                let found = &mut *(lparam.0 as *mut Vec<(bool, MonitorRegion)>);

                let mut info = MONITORINFOEXW::default();
                info.monitorInfo.cbSize = std::mem::size_of::<MONITORINFOEXW>() as u32;

                if GetMonitorInfoW(hmonitor, &mut info as *mut _ as *mut _).as_bool() {
                    let rc = info.monitorInfo.rcMonitor;
                    let device = &info.szDevice;
                    let len = device.iter().position(|&c| c == 0).unwrap_or(device.len());
                    let primary = info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0;

                    found.push((
                        primary,
                        MonitorRegion {
                            index: 0,
                            name: String::from_utf16_lossy(&device[..len]),
                            x: rc.left,
                            y: rc.top,
                            width: rc.right - rc.left,
                            height: rc.bottom - rc.top,
                        },
                    ));
                }

                BOOL(1) // continue enumeration
            }
        }

        unsafe {
            let _ = EnumDisplayMonitors(
                None,
                None,
                Some(enum_proc),
                LPARAM(&mut found as *mut _ as isize),
            );
        }

        found.sort_by_key(|(primary, _)| !*primary);
        found
            .into_iter()
            .enumerate()
            .map(|(index, (_, mut region))| {
                region.index = index;
                region
            })
            .collect()
    }

    fn taskbar(&self) -> Option<TaskbarRegion> {
        let mut data = APPBARDATA {
            cbSize: std::mem::size_of::<APPBARDATA>() as u32,
            ..Default::default()
        };

        let result = unsafe { SHAppBarMessage(ABM_GETTASKBARPOS, &mut data) };
        if result == 0 {
            warn!("taskbar query failed");
            return None;
        }

        let position = match data.uEdge {
            ABE_LEFT => TaskbarPosition::Left,
            ABE_TOP => TaskbarPosition::Top,
            ABE_RIGHT => TaskbarPosition::Right,
            ABE_BOTTOM => TaskbarPosition::Bottom,
            _ => TaskbarPosition::Unknown,
        };

        let region = TaskbarRegion {
            position,
            x: data.rc.left,
            y: data.rc.top,
            width: data.rc.right - data.rc.left,
            height: data.rc.bottom - data.rc.top,
        };

        if region.is_degenerate() {
            None
        } else {
            Some(region)
        }
    }

    fn register_hotkey(&self, id: i32, combo: &HotkeyCombo) -> bool {
        let modifiers = HOT_KEY_MODIFIERS(combo.win32_modifiers()) | MOD_NOREPEAT;
        unsafe { RegisterHotKey(Some(self.sink_hwnd), id, modifiers, combo.vk).is_ok() }
    }

    fn unregister_hotkey(&self, id: i32) {
        unsafe {
            let _ = UnregisterHotKey(Some(self.sink_hwnd), id);
        }
    }
}

// ─── IME probe ──────────────────────────────────────────────────────────────

/// Asks the foreground application's default IME window whether the input
/// method is open. Every failure along the chain collapses to `false`, per
/// the [`ImeProbe`] contract.
pub struct Win32ImeProbe;

impl ImeProbe for Win32ImeProbe {
    fn foreground_ime_open(&self) -> bool {
        unsafe {
            let foreground = GetForegroundWindow();
            if foreground.0.is_null() {
                return false;
            }

            let ime_window = ImmGetDefaultIMEWnd(foreground);
            if ime_window.0.is_null() {
                return false;
            }

            let status = SendMessageW(
                ime_window,
                WM_IME_CONTROL,
                Some(WPARAM(IMC_GETOPENSTATUS as usize)),
                Some(LPARAM(0)),
            );
            status.0 != 0
        }
    }
}

/// Post a marshaled IME state onto the UI thread's sink window. This is
/// the one call the poller thread makes back into the backend; it is safe
/// from any thread.
pub fn post_ime_state(sink: isize, open: bool) {
    unsafe {
        let _ = PostMessageW(
            Some(HWND(sink as *mut _)),
            WM_IME_STATE,
            WPARAM(open as usize),
            LPARAM(0),
        );
    }
}
