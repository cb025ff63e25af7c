//! Tick providers: the host’s timer, as seen by a [`Runner`](crate::runner::Runner).
//!
//! The host chooses one [`TickProvider`] implementation at startup (for example, one
//! backed by its main-loop scheduler, or one backed by a thread pool) and gives it to
//! every runner it creates. [`ManualTicks`] is a deterministic provider which only
//! advances when told to, for tests and for hosts that already have a tick loop.

#![allow(
    clippy::module_name_repetitions,
    reason = "these names are re-exported and used unqualified"
)]

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::warn;

use crate::frame::StepError;
use crate::util::ErrorChain;

/// Unit of time used by [`Schedule`](crate::schedule::Schedule)s and [`TickProvider`]s.
///
/// How long a tick is is up to the host; game servers commonly use 1/20 of a second.
pub type Ticks = u32;

/// A callback to be invoked by a [`TickProvider`].
///
/// An [`Err`] return should be reported by the provider in whatever way it reports
/// failures of its tasks; it does not cancel the callback.
pub type TickCallback = Box<dyn FnMut() -> Result<(), StepError> + Send>;

/// The host’s timer.
///
/// Implementations must not invoke a callback after its [`CancelHandle`] has been
/// cancelled. They may invoke callbacks on any thread, and may invoke a callback before
/// returning from the method which scheduled it.
pub trait TickProvider: fmt::Debug + Send + Sync {
    /// Invokes `callback` once, after `delay` ticks.
    fn schedule_once(&self, delay: Ticks, callback: TickCallback) -> CancelHandle;

    /// Invokes `callback` after `initial_delay` ticks, then every `period` ticks after
    /// that, until cancelled.
    fn schedule_repeating(
        &self,
        initial_delay: Ticks,
        period: Ticks,
        callback: TickCallback,
    ) -> CancelHandle;
}

impl<T: TickProvider + ?Sized> TickProvider for Arc<T> {
    fn schedule_once(&self, delay: Ticks, callback: TickCallback) -> CancelHandle {
        (**self).schedule_once(delay, callback)
    }
    fn schedule_repeating(
        &self,
        initial_delay: Ticks,
        period: Ticks,
        callback: TickCallback,
    ) -> CancelHandle {
        (**self).schedule_repeating(initial_delay, period, callback)
    }
}

// -------------------------------------------------------------------------------------------------

/// Prevents further invocations of a scheduled callback.
///
/// Clones refer to the same callback. Cancelling more than once has no further effect.
#[derive(Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Constructs a handle which is not cancelled.
    ///
    /// [`TickProvider`] implementations keep one clone and check it before each invocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the callback.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[allow(missing_docs)]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_cancelled() {
            write!(f, "CancelHandle(cancelled)")
        } else {
            write!(f, "CancelHandle(live)")
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// [`TickProvider`] whose time passes only when [`advance()`](Self::advance) is called.
///
/// Callbacks run on the thread calling `advance()`, in order of due time and then of
/// scheduling. A delay or period of zero is treated as one tick; that is, nothing ever
/// runs during the tick in which it was scheduled.
#[derive(Default)]
pub struct ManualTicks {
    queue: Mutex<Queue>,
}

#[derive(Default)]
struct Queue {
    now: u64,
    next_sequence: u64,
    /// Keyed by due time and sequence number.
    entries: BTreeMap<(u64, u64), Entry>,
}

struct Entry {
    handle: CancelHandle,
    period: Option<Ticks>,
    callback: TickCallback,
}

impl ManualTicks {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks which have elapsed.
    pub fn now(&self) -> u64 {
        self.lock().now
    }

    /// Number of callbacks which are scheduled and not cancelled.
    pub fn pending(&self) -> usize {
        self.lock()
            .entries
            .values()
            .filter(|entry| !entry.handle.is_cancelled())
            .count()
    }

    /// Runs one tick. Equivalent to `advance(1)`.
    pub fn tick(&self) -> Vec<StepError> {
        self.advance(1)
    }

    /// Runs `ticks` ticks, invoking every callback which becomes due.
    ///
    /// Returns the errors returned by callbacks, after logging them.
    pub fn advance(&self, ticks: Ticks) -> Vec<StepError> {
        let mut errors = Vec::new();
        for _ in 0..ticks {
            self.lock().now += 1;
            while let Some((handle, period, mut callback)) = self.pop_due() {
                if handle.is_cancelled() {
                    continue;
                }
                // The queue is not locked here, so the callback may schedule more callbacks.
                if let Err(error) = callback() {
                    warn!("tick callback failed: {}", ErrorChain(&error));
                    errors.push(error);
                }
                if let Some(period) = period
                    && !handle.is_cancelled()
                {
                    self.lock().insert(period, Some(period), handle, callback);
                }
            }
        }
        errors
    }

    fn pop_due(&self) -> Option<(CancelHandle, Option<Ticks>, TickCallback)> {
        let mut queue = self.lock();
        let now = queue.now;
        let entry = queue.entries.first_entry()?;
        if entry.key().0 > now {
            return None;
        }
        let Entry {
            handle,
            period,
            callback,
        } = entry.remove();
        Some((handle, period, callback))
    }

    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Queue {
    fn insert(
        &mut self,
        delay: Ticks,
        period: Option<Ticks>,
        handle: CancelHandle,
        callback: TickCallback,
    ) {
        let due = self.now + u64::from(delay.max(1));
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.insert(
            (due, sequence),
            Entry {
                handle,
                period,
                callback,
            },
        );
    }
}

impl TickProvider for ManualTicks {
    fn schedule_once(&self, delay: Ticks, callback: TickCallback) -> CancelHandle {
        let handle = CancelHandle::new();
        self.lock().insert(delay, None, handle.clone(), callback);
        handle
    }

    fn schedule_repeating(
        &self,
        initial_delay: Ticks,
        period: Ticks,
        callback: TickCallback,
    ) -> CancelHandle {
        let handle = CancelHandle::new();
        self.lock()
            .insert(initial_delay, Some(period), handle.clone(), callback);
        handle
    }
}

impl fmt::Debug for ManualTicks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queue = self.lock();
        f.debug_struct("ManualTicks")
            .field("now", &queue.now)
            .field("scheduled", &queue.entries.len())
            .finish_non_exhaustive()
    }
}

// -------------------------------------------------------------------------------------------------
