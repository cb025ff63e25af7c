//! [`Schedule`]s: resettable sequences of delays between animation steps.
//!
//! A schedule answers the question “how long until the next step?”, one step at a time,
//! until it reports that there are no more steps. Compound schedules are built from
//! simple ones with the combinator methods of [`Schedule`]:
//!
//! ```
//! use slotmenu::schedule::{Delays, FixedRate, Schedule as _};
//!
//! // Wait 20 ticks, then step every 2 ticks, for at most 5 steps after the first.
//! let mut schedule = Delays::once(20).append(FixedRate::new(2).limit_steps(5));
//! let delays: Vec<u32> = core::iter::from_fn(|| schedule.next_delay()).collect();
//! assert_eq!(delays, [20, 2, 2, 2, 2, 2]);
//! ```

#![allow(
    clippy::module_name_repetitions,
    reason = "these names are re-exported and used unqualified"
)]

use core::fmt;
use std::sync::Arc;

use crate::Ticks;


// -------------------------------------------------------------------------------------------------

/// A resettable, clonable sequence of delays.
///
/// Delays are measured in [`Ticks`] and are therefore never negative.
/// Clones (including those made by [`box_clone()`](Self::box_clone)) are independent:
/// advancing one never affects the position of another.
pub trait Schedule: fmt::Debug + Send + 'static {
    /// Returns to the initial state.
    fn reset(&mut self);

    /// Returns the delay before the next step, or [`None`] if there are no more steps.
    ///
    /// Once this has returned [`None`], it continues to do so until [`reset()`](Self::reset).
    fn next_delay(&mut self) -> Option<Ticks>;

    /// Clones this schedule, including its current position, into a [`BoxSchedule`].
    fn box_clone(&self) -> BoxSchedule;

    /// If this schedule, from its initial state, produces exactly one delay and then
    /// ends, returns that delay.
    ///
    /// [`repeat()`](Self::repeat) uses this to turn one-shot schedules into fixed-rate
    /// ones. The default implementation returns [`None`], which is always correct but
    /// loses that special case.
    fn single_delay(&self) -> Option<Ticks> {
        None
    }

    /// Ends this schedule after at most `steps` delays.
    fn limit_steps(self, steps: usize) -> LimitSteps<Self>
    where
        Self: Sized,
    {
        LimitSteps {
            inner: self,
            limit: steps,
            taken: 0,
        }
    }

    /// Ends this schedule before the cumulative sum of its delays exceeds `limit`.
    ///
    /// A delay which brings the sum to exactly `limit` is still produced.
    fn limit_time(self, limit: Ticks) -> LimitTime<Self>
    where
        Self: Sized,
    {
        LimitTime {
            inner: self,
            limit: u64::from(limit),
            elapsed: 0,
            done: false,
        }
    }

    /// Produces all of this schedule’s delays, then all of `next`’s.
    fn append<B: Schedule>(self, next: B) -> Append<Self, B>
    where
        Self: Sized,
    {
        Append {
            first: self,
            second: next,
            first_done: false,
        }
    }

    /// Starts this schedule over whenever it ends, so that it never ends.
    ///
    /// If this schedule produces a single delay and then ends, the result steps at a fixed
    /// rate of that delay. If it produces no delays at all, the result produces none either.
    fn repeat(self) -> Repeat<Self>
    where
        Self: Sized,
    {
        Repeat::new(self)
    }
}

/// Type-erased [`Schedule`], as stored by a [`Runner`](crate::runner::Runner).
pub type BoxSchedule = Box<dyn Schedule>;

impl Clone for BoxSchedule {
    fn clone(&self) -> Self {
        (**self).box_clone()
    }
}

impl<S: Schedule + ?Sized> Schedule for Box<S> {
    fn reset(&mut self) {
        (**self).reset()
    }
    fn next_delay(&mut self) -> Option<Ticks> {
        (**self).next_delay()
    }
    fn box_clone(&self) -> BoxSchedule {
        (**self).box_clone()
    }
    fn single_delay(&self) -> Option<Ticks> {
        (**self).single_delay()
    }
}

// -------------------------------------------------------------------------------------------------

/// [`Schedule`] which produces a fixed list of delays, then ends.
#[derive(Clone)]
pub struct Delays {
    delays: Arc<[Ticks]>,
    cursor: usize,
}

impl Delays {
    /// Produces each of `delays` in order.
    pub fn of(delays: impl IntoIterator<Item = Ticks>) -> Self {
        Self {
            delays: delays.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Produces `delay` once.
    pub fn once(delay: Ticks) -> Self {
        Self::of([delay])
    }

    /// Produces a delay of zero once; that is, one step, as soon as possible.
    pub fn now() -> Self {
        Self::once(0)
    }
}

impl Schedule for Delays {
    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn next_delay(&mut self) -> Option<Ticks> {
        let delay = *self.delays.get(self.cursor)?;
        self.cursor += 1;
        Some(delay)
    }

    fn box_clone(&self) -> BoxSchedule {
        Box::new(self.clone())
    }

    fn single_delay(&self) -> Option<Ticks> {
        match *self.delays {
            [delay] => Some(delay),
            _ => None,
        }
    }
}

impl fmt::Debug for Delays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { delays, cursor } = self;
        f.debug_struct("Delays")
            .field("delays", delays)
            .field("cursor", cursor)
            .finish()
    }
}

/// [`Schedule`] which produces the same delay forever.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FixedRate {
    period: Ticks,
}

impl FixedRate {
    #[allow(missing_docs)]
    pub fn new(period: Ticks) -> Self {
        Self { period }
    }

    #[allow(missing_docs)]
    pub fn period(&self) -> Ticks {
        self.period
    }
}

impl Schedule for FixedRate {
    fn reset(&mut self) {}

    fn next_delay(&mut self) -> Option<Ticks> {
        Some(self.period)
    }

    fn box_clone(&self) -> BoxSchedule {
        Box::new(*self)
    }
}

// -------------------------------------------------------------------------------------------------

/// [`Schedule`] produced by [`Schedule::limit_steps()`].
#[derive(Clone, Debug)]
pub struct LimitSteps<S> {
    inner: S,
    limit: usize,
    taken: usize,
}

impl<S: Schedule + Clone> Schedule for LimitSteps<S> {
    fn reset(&mut self) {
        self.inner.reset();
        self.taken = 0;
    }

    fn next_delay(&mut self) -> Option<Ticks> {
        if self.taken >= self.limit {
            return None;
        }
        let delay = self.inner.next_delay()?;
        self.taken += 1;
        Some(delay)
    }

    fn box_clone(&self) -> BoxSchedule {
        Box::new(self.clone())
    }

    fn single_delay(&self) -> Option<Ticks> {
        match self.limit {
            0 => None,
            1 => {
                let mut probe = self.inner.box_clone();
                probe.reset();
                probe.next_delay()
            }
            _ => self.inner.single_delay(),
        }
    }
}

/// [`Schedule`] produced by [`Schedule::limit_time()`].
#[derive(Clone, Debug)]
pub struct LimitTime<S> {
    inner: S,
    limit: u64,
    elapsed: u64,
    done: bool,
}

impl<S: Schedule + Clone> Schedule for LimitTime<S> {
    fn reset(&mut self) {
        self.inner.reset();
        self.elapsed = 0;
        self.done = false;
    }

    fn next_delay(&mut self) -> Option<Ticks> {
        if self.done {
            return None;
        }
        let Some(delay) = self.inner.next_delay() else {
            self.done = true;
            return None;
        };
        let elapsed = self.elapsed + u64::from(delay);
        if elapsed > self.limit {
            self.done = true;
            return None;
        }
        self.elapsed = elapsed;
        Some(delay)
    }

    fn box_clone(&self) -> BoxSchedule {
        Box::new(self.clone())
    }

    fn single_delay(&self) -> Option<Ticks> {
        self.inner
            .single_delay()
            .filter(|&delay| u64::from(delay) <= self.limit)
    }
}

/// [`Schedule`] produced by [`Schedule::append()`].
#[derive(Clone, Debug)]
pub struct Append<A, B> {
    first: A,
    second: B,
    first_done: bool,
}

impl<A: Schedule + Clone, B: Schedule + Clone> Schedule for Append<A, B> {
    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
        self.first_done = false;
    }

    fn next_delay(&mut self) -> Option<Ticks> {
        if !self.first_done {
            if let Some(delay) = self.first.next_delay() {
                return Some(delay);
            }
            self.first_done = true;
        }
        self.second.next_delay()
    }

    fn box_clone(&self) -> BoxSchedule {
        Box::new(self.clone())
    }
}

/// [`Schedule`] produced by [`Schedule::repeat()`].
#[derive(Clone, Debug)]
pub struct Repeat<S> {
    inner: S,
    /// Set if `inner` is one-shot, in which case it is never consulted again.
    fixed: Option<FixedRate>,
}

impl<S: Schedule> Repeat<S> {
    fn new(inner: S) -> Self {
        let fixed = inner.single_delay().map(FixedRate::new);
        Self { inner, fixed }
    }
}

impl<S: Schedule + Clone> Schedule for Repeat<S> {
    fn reset(&mut self) {
        self.inner.reset();
    }

    fn next_delay(&mut self) -> Option<Ticks> {
        if let Some(fixed) = &mut self.fixed {
            return fixed.next_delay();
        }
        match self.inner.next_delay() {
            Some(delay) => Some(delay),
            None => {
                self.inner.reset();
                self.inner.next_delay()
            }
        }
    }

    fn box_clone(&self) -> BoxSchedule {
        Box::new(self.clone())
    }
}
