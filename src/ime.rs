//! Edge-triggered polling of the input-method open state.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;

use crate::platform::ImeProbe;

/// Default sampling period.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Samples the foreground input-method state on a worker thread and invokes
/// the callback once per observed transition.
///
/// Repeated identical samples invoke nothing; only edges count. There is no
/// buffering beyond that - a slow consumer just observes the latest
/// transitions in order. The callback runs on the worker thread and must
/// marshal onto the UI thread before touching overlay state (the
/// orchestrator posts a window message).
///
/// Probe failures are already folded into `false` by [`ImeProbe`], so the
/// poller itself has no error path and can never take down the host.
pub struct InputStatePoller {
    stop_tx: mpsc::Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl InputStatePoller {
    /// Begin sampling every `period`.
    ///
    /// The initial "last observed" state is OFF, so an input method that is
    /// already open fires one transition on the first sample.
    pub fn start<F>(probe: Arc<dyn ImeProbe>, period: Duration, mut on_change: F) -> Self
    where
        F: FnMut(bool) + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel();
        let worker = thread::spawn(move || {
            let mut last = false;
            loop {
                match stop_rx.recv_timeout(period) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {}
                }
                let state = probe.foreground_ime_open();
                if state != last {
                    last = state;
                    debug!("ime state changed: {}", if state { "on" } else { "off" });
                    on_change(state);
                }
            }
        });
        Self {
            stop_tx,
            worker: Some(worker),
        }
    }

    /// Halt sampling. Synchronous: returns only after the worker thread has
    /// fully quiesced, so no callback fires after `stop` returns. Safe to
    /// call more than once.
    pub fn stop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for InputStatePoller {
    fn drop(&mut self) {
        self.stop();
    }
}
