//! Background ticking
//!
//! One dedicated thread drives `run_once` on a fixed cadence. The halt latch
//! is advisory, so the runner keeps ticking after it is raised and only
//! logs the transition. Shutdown wakes the thread immediately instead of
//! waiting out the interval.

use crate::error::Result;
use crate::state::TickStatus;
use crate::watchdog::Watchdog;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, warn};

#[derive(Default)]
struct Signal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

/// Handle to a watchdog ticking on its own thread
///
/// Dropping the handle stops the thread and waits for it.
pub struct WatchdogRunner {
    signal: Arc<Signal>,
    join: Option<JoinHandle<()>>,
    watchdog: Arc<Watchdog>,
}

impl WatchdogRunner {
    /// Tick now, then every `interval`, until shut down
    pub fn spawn(watchdog: Arc<Watchdog>, interval: Duration) -> Result<Self> {
        let signal = Arc::new(Signal::default());
        let join = {
            let signal = Arc::clone(&signal);
            let watchdog = Arc::clone(&watchdog);
            thread::Builder::new()
                .name("verdict-watchdog".to_string())
                .spawn(move || run_loop(&watchdog, &signal, interval))?
        };
        debug!("Watchdog runner started, interval {:?}", interval);
        Ok(Self {
            signal,
            join: Some(join),
            watchdog,
        })
    }

    /// The watchdog being driven
    pub fn watchdog(&self) -> &Arc<Watchdog> {
        &self.watchdog
    }

    /// Whether the thread is still ticking
    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|join| !join.is_finished())
    }

    /// Stop ticking and wait for the thread to exit
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        {
            let mut stopped = self.signal.stopped.lock();
            *stopped = true;
        }
        self.signal.wake.notify_all();

        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                warn!("Watchdog runner thread panicked");
            }
            debug!("Watchdog runner stopped");
        }
    }
}

impl Drop for WatchdogRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(watchdog: &Watchdog, signal: &Signal, interval: Duration) {
    let mut latched = watchdog.halt_requested();
    loop {
        let result = watchdog.run_once();
        if result.status == TickStatus::Error {
            // run_once already logged the cause; the next tick retries
            debug!("Watchdog tick failed, retrying in {:?}", interval);
        }
        if result.halt_requested && !latched {
            error!("Watchdog recommends halting; continuing to monitor");
            latched = true;
        }

        let mut stopped = signal.stopped.lock();
        if !*stopped {
            signal.wake.wait_for(&mut stopped, interval);
        }
        if *stopped {
            break;
        }
    }
}
