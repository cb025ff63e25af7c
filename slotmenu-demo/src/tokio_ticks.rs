//! [`TokioTicks`]: a [`TickProvider`] backed by Tokio timers.

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

use slotmenu::Ticks;
use slotmenu::frame::StepError;
use slotmenu::tick::{CancelHandle, TickCallback, TickProvider};
use slotmenu::util::ErrorChain;

/// Runs tick callbacks as tasks on a Tokio runtime, each tick lasting `tick`.
///
/// Callbacks run on the runtime’s worker threads. As with
/// [`ManualTicks`](slotmenu::tick::ManualTicks), a delay of zero ticks is treated as one.
#[derive(Clone, Debug)]
pub struct TokioTicks {
    runtime: tokio::runtime::Handle,
    tick: Duration,
}

/// Shortest tick a [`TokioTicks`] will use.
pub const MIN_TICK: Duration = Duration::from_millis(1);

impl TokioTicks {
    /// Ticks shorter than [`MIN_TICK`] are lengthened to it.
    pub fn new(runtime: tokio::runtime::Handle, tick: Duration) -> Self {
        Self {
            runtime,
            tick: tick.max(MIN_TICK),
        }
    }

    fn duration(&self, ticks: Ticks) -> Duration {
        self.tick * ticks.max(1)
    }
}

impl TickProvider for TokioTicks {
    fn schedule_once(&self, delay: Ticks, mut callback: TickCallback) -> CancelHandle {
        let handle = CancelHandle::new();
        let task_handle = handle.clone();
        let delay = self.duration(delay);
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if !task_handle.is_cancelled() {
                report(callback());
            }
        });
        handle
    }

    fn schedule_repeating(
        &self,
        initial_delay: Ticks,
        period: Ticks,
        mut callback: TickCallback,
    ) -> CancelHandle {
        let handle = CancelHandle::new();
        let task_handle = handle.clone();
        let start = self.duration(initial_delay);
        let period = self.duration(period);
        self.runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if task_handle.is_cancelled() {
                    break;
                }
                report(callback());
            }
        });
        handle
    }
}

fn report(result: Result<(), StepError>) {
    if let Err(error) = result {
        log::warn!("tick callback failed: {}", ErrorChain(&error));
    }
}
