// ── Periodic refresh ──
//
// A single timer task, owned by the scheduler, that pokes a `Tick` target
// on a fixed period. The scheduler never awaits the work a tick starts.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Auto-refresh period.
pub const REFRESH_PERIOD: Duration = Duration::from_millis(4000);

/// Work performed on every scheduler tick.
///
/// Implementations must return promptly: spawn the actual requests and let
/// them finish on their own.
pub trait Tick: Send + Sync + 'static {
    fn tick(&self);
}

/// Owns the periodic refresh timer.
///
/// `start` and `stop` are idempotent. Dropping the scheduler stops the
/// timer.
pub struct RefreshScheduler<T: Tick + Clone> {
    target: T,
    period: Duration,
    timer: Option<(JoinHandle<()>, CancellationToken)>,
}

impl<T: Tick + Clone> RefreshScheduler<T> {
    pub fn new(target: T) -> Self {
        Self::with_period(target, REFRESH_PERIOD)
    }

    pub fn with_period(target: T, period: Duration) -> Self {
        Self {
            target,
            period,
            timer: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer
            .as_ref()
            .is_some_and(|(handle, _)| !handle.is_finished())
    }

    /// Start ticking. The first tick fires one period from now.
    ///
    /// Returns `false` if the timer was already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(tick_task(self.target.clone(), self.period, cancel.clone()));
        self.timer = Some((handle, cancel));
        info!(period = ?self.period, "auto-refresh started");
        true
    }

    /// Stop ticking. Returns `false` if the timer was not running.
    pub fn stop(&mut self) -> bool {
        match self.timer.take() {
            Some((_, cancel)) => {
                cancel.cancel();
                info!("auto-refresh stopped");
                true
            }
            None => false,
        }
    }

    /// Flip between running and stopped; returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
        self.is_running()
    }
}

impl<T: Tick + Clone> Drop for RefreshScheduler<T> {
    fn drop(&mut self) {
        if let Some((_, cancel)) = self.timer.take() {
            cancel.cancel();
        }
    }
}

async fn tick_task<T: Tick>(target: T, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                debug!("refresh tick");
                target.tick();
            }
        }
    }
}
