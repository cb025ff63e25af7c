//! [`Runner`]: plays an [`Animation`] on a [`ContentSink`] according to a [`Schedule`].

#![allow(
    clippy::module_name_repetitions,
    reason = "these names are re-exported and used unqualified"
)]

use core::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::{debug, trace, warn};

use crate::animation::{Animation, BoxAnimation};
use crate::frame::{ApplyFrame, ContentSink, StepError};
use crate::schedule::{BoxSchedule, Schedule};
use crate::tick::{CancelHandle, TickCallback, TickProvider, Ticks};
use crate::util::ErrorChain;

#[cfg(test)]
mod tests;

// -------------------------------------------------------------------------------------------------

/// Playback state of a [`Runner`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(clippy::exhaustive_enums)]
pub enum RunStatus {
    /// Newly constructed or [`reset()`](Runner::reset); nothing has been applied since.
    NotStarted,
    /// A step is scheduled.
    Running,
    /// [`stop()`](Runner::stop)ped, or a step failed. [`play()`](Runner::play) resumes,
    /// waiting again for the whole delay of a step that was stopped before it ran.
    Paused,
    /// The animation or the schedule ran out. Only [`reset()`](Runner::reset) leaves
    /// this state.
    Finished,
}

/// Plays an [`Animation`] on a [`ContentSink`], waiting between frames for the delays
/// produced by a [`Schedule`].
///
/// The runner does not keep time itself; it asks its [`TickProvider`] to call it back.
/// On each callback, if the animation has no more frames, the runner finishes; otherwise
/// it applies the next frame to the sink.
///
/// All methods take `&self` and may be called from any thread, but not from within the
/// runner’s own sink, which is invoked while the runner’s state is locked. After
/// [`stop()`](Self::stop) or [`reset()`](Self::reset) returns, no further frame is
/// applied until the runner is played again. Dropping the runner cancels any pending
/// callback.
pub struct Runner<F: ApplyFrame> {
    shared: Arc<Mutex<State<F>>>,
    ticks: Arc<dyn TickProvider>,
}

struct State<F: ApplyFrame> {
    animation: BoxAnimation<F>,
    schedule: BoxSchedule,
    sink: Box<dyn ContentSink<F::Item> + Send>,
    status: RunStatus,
    pending: Option<CancelHandle>,
    /// Delay taken from the schedule for the step now awaited, if playback is
    /// schedule-driven.
    awaited_delay: Option<Ticks>,
    /// Delay of a step which was stopped before it ran; used instead of taking a new
    /// delay from the schedule when playback resumes.
    resume_delay: Option<Ticks>,
    /// Incremented whenever a callback is scheduled or abandoned; a callback does nothing
    /// unless this still equals the value it was scheduled with.
    generation: u64,
}

/// What a step callback should do after a frame.
enum Next {
    Stop,
    Wait(Ticks, u64),
}

impl<F> Runner<F>
where
    F: ApplyFrame + 'static,
    F::Item: 'static,
{
    /// Constructs a runner in the [`NotStarted`](RunStatus::NotStarted) state.
    pub fn new(
        animation: impl Animation<Frame = F> + Send + 'static,
        schedule: impl Schedule,
        sink: impl ContentSink<F::Item> + Send + 'static,
        ticks: Arc<dyn TickProvider>,
    ) -> Self {
        Self {
            shared: Arc::new(Mutex::new(State {
                animation: Box::new(animation),
                schedule: Box::new(schedule),
                sink: Box::new(sink),
                status: RunStatus::NotStarted,
                pending: None,
                awaited_delay: None,
                resume_delay: None,
                generation: 0,
            })),
            ticks,
        }
    }

    #[allow(missing_docs)]
    pub fn status(&self) -> RunStatus {
        self.lock().status
    }

    /// Starts or resumes playback, taking each delay from the schedule.
    ///
    /// A step which was [`stop()`](Self::stop)ped before it ran is waited for again,
    /// with the same delay, rather than taking a new delay from the schedule.
    ///
    /// Returns whether playback is now running. If the animation or the schedule has
    /// already run out, the runner becomes [`Finished`](RunStatus::Finished) without
    /// scheduling anything and this returns false. Playing a runner which is already
    /// running has no effect.
    pub fn play(&self) -> bool {
        let mut state = self.lock();
        match state.status {
            RunStatus::Running => return true,
            RunStatus::Finished => return false,
            RunStatus::NotStarted | RunStatus::Paused => {}
        }
        if !state.animation.has_next_frame() {
            state.finish();
            return false;
        }
        let resumed = state.resume_delay.take();
        let Some(delay) = resumed.or_else(|| state.schedule.next_delay()) else {
            state.finish();
            return false;
        };
        state.status = RunStatus::Running;
        let generation = state.advance_generation();
        state.awaited_delay = Some(delay);
        debug!("runner playing; first step in {delay} ticks");
        drop(state);

        arm(&self.shared, &self.ticks, delay, generation);
        true
    }

    /// Starts or resumes playback, stepping every `period` ticks after `initial_delay`,
    /// regardless of the schedule.
    ///
    /// Otherwise behaves as [`play()`](Self::play).
    pub fn play_fixed_rate(&self, initial_delay: Ticks, period: Ticks) -> bool {
        let mut state = self.lock();
        match state.status {
            RunStatus::Running => return true,
            RunStatus::Finished => return false,
            RunStatus::NotStarted | RunStatus::Paused => {}
        }
        if !state.animation.has_next_frame() {
            state.finish();
            return false;
        }
        state.status = RunStatus::Running;
        let generation = state.advance_generation();
        debug!("runner playing every {period} ticks after {initial_delay}");
        drop(state);

        let weak = Arc::downgrade(&self.shared);
        let handle = self.ticks.schedule_repeating(
            initial_delay,
            period,
            Box::new(move || {
                let Some(shared) = weak.upgrade() else {
                    return Ok(());
                };
                let mut state = lock(&shared);
                if state.generation != generation {
                    return Ok(());
                }
                state.step().map(|_| ())
            }),
        );
        install(&self.shared, handle, generation);
        true
    }

    /// Cancels any pending step.
    ///
    /// The runner becomes [`Paused`](RunStatus::Paused) unless it is
    /// [`Finished`](RunStatus::Finished). Stopping a runner that is not running has no
    /// effect other than that.
    pub fn stop(&self) {
        self.lock().stop();
    }

    /// Cancels any pending step and returns the animation and schedule to their
    /// beginnings. The runner becomes [`NotStarted`](RunStatus::NotStarted).
    pub fn reset(&self) {
        let mut state = self.lock();
        state.abandon_pending();
        state.resume_delay = None;
        state.animation.reset();
        state.schedule.reset();
        state.status = RunStatus::NotStarted;
        debug!("runner reset");
    }

    /// Returns a handle which can stop this runner without keeping it alive.
    pub fn handle(&self) -> RunnerHandle {
        let weak: Weak<Mutex<State<F>>> = Arc::downgrade(&self.shared);
        RunnerHandle {
            stop: Arc::new(move || {
                if let Some(shared) = weak.upgrade() {
                    lock(&shared).stop();
                }
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<F>> {
        lock(&self.shared)
    }
}

impl<F: ApplyFrame> Drop for Runner<F> {
    fn drop(&mut self) {
        let mut state = lock(&self.shared);
        state.abandon_pending();
    }
}

impl<F: ApplyFrame> fmt::Debug for Runner<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ds = f.debug_struct("Runner");
        // Formatting may happen inside a sink, while the state is locked.
        match self.shared.try_lock() {
            Ok(state) => ds
                .field("status", &state.status)
                .field("schedule", &state.schedule)
                .field("pending", &state.pending),
            Err(_) => ds.field("status", &format_args!("<busy>")),
        };
        ds.field("ticks", &self.ticks).finish_non_exhaustive()
    }
}

/// Stops a [`Runner`] if it still exists. Obtained from [`Runner::handle()`].
#[derive(Clone)]
pub struct RunnerHandle {
    stop: Arc<dyn Fn() + Send + Sync>,
}

impl RunnerHandle {
    /// Stops the runner as [`Runner::stop()`] does, if it has not been dropped.
    pub fn stop(&self) {
        (self.stop)()
    }
}

impl fmt::Debug for RunnerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerHandle").finish_non_exhaustive()
    }
}

// -------------------------------------------------------------------------------------------------

impl<F: ApplyFrame> State<F> {
    fn advance_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Cancels the pending callback, and makes sure that any callback already in flight
    /// does nothing.
    fn abandon_pending(&mut self) {
        self.advance_generation();
        self.awaited_delay = None;
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }

    fn stop(&mut self) {
        let awaited = self.awaited_delay;
        self.abandon_pending();
        if self.status != RunStatus::Finished {
            self.status = RunStatus::Paused;
            // The schedule has already produced this delay; keep it for resuming.
            if awaited.is_some() {
                self.resume_delay = awaited;
            }
        }
        debug!("runner stopped ({:?})", self.status);
    }

    fn finish(&mut self) {
        self.abandon_pending();
        self.status = RunStatus::Finished;
        debug!("runner finished");
    }

    /// Performs one step: finishes if the animation is over, and otherwise applies the
    /// next frame. Returns whether a frame was applied.
    fn step(&mut self) -> Result<bool, StepError> {
        if !self.animation.has_next_frame() {
            self.finish();
            return Ok(false);
        }
        let result = self
            .animation
            .next_frame()
            .map_err(StepError::from)
            .and_then(|frame| frame.apply_to(&mut *self.sink));
        match result {
            Ok(()) => {
                trace!("runner applied a frame");
                Ok(true)
            }
            Err(error) => {
                self.abandon_pending();
                self.status = RunStatus::Paused;
                warn!("runner paused: {}", ErrorChain(&error));
                Err(error)
            }
        }
    }

    /// Performs one step of schedule-driven playback.
    fn step_scheduled(&mut self) -> Result<Next, StepError> {
        // This callback has now run, so there is nothing to cancel.
        self.pending = None;
        self.awaited_delay = None;
        if !self.step()? {
            return Ok(Next::Stop);
        }
        match self.schedule.next_delay() {
            Some(delay) => {
                self.awaited_delay = Some(delay);
                Ok(Next::Wait(delay, self.advance_generation()))
            }
            None => {
                self.finish();
                Ok(Next::Stop)
            }
        }
    }
}

fn lock<F: ApplyFrame>(shared: &Mutex<State<F>>) -> MutexGuard<'_, State<F>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Schedules the next step of schedule-driven playback.
///
/// Must be called without the state locked, since the provider may invoke the callback
/// immediately.
fn arm<F>(
    shared: &Arc<Mutex<State<F>>>,
    ticks: &Arc<dyn TickProvider>,
    delay: Ticks,
    generation: u64,
) where
    F: ApplyFrame + 'static,
    F::Item: 'static,
{
    let callback = step_callback(Arc::downgrade(shared), Arc::downgrade(ticks), generation);
    let handle = ticks.schedule_once(delay, callback);
    install(shared, handle, generation);
}

fn step_callback<F>(
    weak: Weak<Mutex<State<F>>>,
    ticks: Weak<dyn TickProvider>,
    generation: u64,
) -> TickCallback
where
    F: ApplyFrame + 'static,
    F::Item: 'static,
{
    Box::new(move || {
        let Some(shared) = weak.upgrade() else {
            return Ok(());
        };
        let next = {
            let mut state = lock(&shared);
            if state.generation != generation {
                return Ok(());
            }
            state.step_scheduled()?
        };
        if let Next::Wait(delay, next_generation) = next {
            if let Some(ticks) = ticks.upgrade() {
                arm(&shared, &ticks, delay, next_generation);
            } else {
                warn!("runner's tick provider is gone; stopping");
                lock(&shared).stop();
            }
        }
        Ok(())
    })
}

/// Records `handle` as the pending callback, unless playback has moved on since it was
/// scheduled, in which case it is cancelled instead.
fn install<F: ApplyFrame>(shared: &Mutex<State<F>>, handle: CancelHandle, generation: u64) {
    let mut state = lock(shared);
    if state.generation == generation && state.status == RunStatus::Running {
        state.pending = Some(handle);
    } else {
        handle.cancel();
    }
}
