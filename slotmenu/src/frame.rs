//! [`Frame`]s: one step of an animation, and the [`ContentSink`]s they are applied to.

use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError};

use crate::Exhausted;
use crate::intgen::{IndexArray, IntGenerator};
use crate::mask::Mask;
use crate::pattern::Pattern;

// -------------------------------------------------------------------------------------------------

/// Error type which a [`ContentSink`] may return; usually the host's own error.
pub type SinkError = Box<dyn core::error::Error + Send + Sync>;

/// Receiver of slot updates, usually a wrapper around a host's inventory.
///
/// `item` being [`None`] means the slot should be cleared. Slots which should be left
/// untouched are never passed to the sink at all.
///
/// Closures of the form `FnMut(i32, Option<&I>)` are sinks which never fail.
pub trait ContentSink<I> {
    /// Sets the content of the slot at `index`.
    fn set_content(&mut self, index: i32, item: Option<&I>) -> Result<(), SinkError>;
}

impl<I, F: FnMut(i32, Option<&I>)> ContentSink<I> for F {
    fn set_content(&mut self, index: i32, item: Option<&I>) -> Result<(), SinkError> {
        self(index, item);
        Ok(())
    }
}

/// Failure of a single animation step.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StepError {
    /// The [`ContentSink`] failed.
    #[error("failed to set content of slot {index}")]
    #[non_exhaustive]
    Sink {
        /// Slot which was being set.
        index: i32,
        /// Error from the sink.
        source: SinkError,
    },

    /// An animation or generator was advanced past its end.
    #[error(transparent)]
    Exhausted(#[from] Exhausted),
}

// -------------------------------------------------------------------------------------------------

/// A [`Pattern`], a [`Mask`], and the slots which they are applied to.
///
/// Frames are immutable and cheap to clone; the `with_*` methods produce new frames
/// which share the components they do not replace. Two frames are equal if their
/// components are equal.
pub struct Frame<P: Pattern, I> {
    pattern: Arc<P>,
    mask: Arc<Mask<P::Symbol, I>>,
    slots: IndexArray,
}

impl<P: Pattern, I> Frame<P, I> {
    /// Constructs a frame which visits the remaining values of `active_slots`, in order.
    ///
    /// `active_slots` must be finite.
    pub fn new(pattern: P, mask: Mask<P::Symbol, I>, mut active_slots: impl IntGenerator) -> Self {
        Self {
            pattern: Arc::new(pattern),
            mask: Arc::new(mask),
            slots: IndexArray::drain(&mut active_slots),
        }
    }

    /// Constructs a frame from components which may be shared with other frames.
    pub fn from_shared(
        pattern: Arc<P>,
        mask: Arc<Mask<P::Symbol, I>>,
        active_slots: IndexArray,
    ) -> Self {
        Self {
            pattern,
            mask,
            slots: active_slots,
        }
    }

    #[allow(missing_docs)]
    pub fn pattern(&self) -> &Arc<P> {
        &self.pattern
    }

    #[allow(missing_docs)]
    pub fn mask(&self) -> &Arc<Mask<P::Symbol, I>> {
        &self.mask
    }

    /// Returns the slots this frame visits, in order.
    pub fn active_slots(&self) -> &[i32] {
        self.slots.values()
    }

    /// Returns a frame with a different pattern and the same mask and slots.
    pub fn with_pattern<Q>(&self, pattern: Q) -> Frame<Q, I>
    where
        Q: Pattern<Symbol = P::Symbol>,
    {
        Frame {
            pattern: Arc::new(pattern),
            mask: self.mask.clone(),
            slots: self.slots.clone(),
        }
    }

    /// Returns a frame with a different mask and the same pattern and slots.
    #[must_use]
    pub fn with_mask(&self, mask: Mask<P::Symbol, I>) -> Self {
        Self {
            pattern: self.pattern.clone(),
            mask: Arc::new(mask),
            slots: self.slots.clone(),
        }
    }

    /// Returns a frame which visits the remaining values of `active_slots` instead.
    #[must_use]
    pub fn with_active_slots(&self, mut active_slots: impl IntGenerator) -> Self {
        Self {
            pattern: self.pattern.clone(),
            mask: self.mask.clone(),
            slots: IndexArray::drain(&mut active_slots),
        }
    }
}

impl<P: Pattern, I> Frame<P, I>
where
    P::Symbol: Ord,
{
    /// Writes this frame to `sink`.
    ///
    /// For each active slot, in order, looks up the slot's symbol in the pattern and the
    /// symbol's item in the mask. Slots with no symbol, or whose symbol is absent from the
    /// mask, are skipped; the others are passed to the sink.
    ///
    /// Applying a frame does not change it, so the same frame may be applied any number
    /// of times with the same result. If the sink fails, the remaining slots are not
    /// visited.
    pub fn apply<S>(&self, sink: &mut S) -> Result<(), StepError>
    where
        S: ContentSink<I> + ?Sized,
    {
        let mut slots = self.slots.clone();
        slots.reset();
        for index in slots.iter() {
            let Some(symbol) = self.pattern.symbol(index) else {
                continue;
            };
            let Some(item) = self.mask.item(&symbol) else {
                continue;
            };
            sink.set_content(index, item)
                .map_err(|source| StepError::Sink { index, source })?;
        }
        Ok(())
    }
}

impl<P: Pattern, I> Clone for Frame<P, I> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            mask: self.mask.clone(),
            slots: self.slots.clone(),
        }
    }
}

impl<P, I> PartialEq for Frame<P, I>
where
    P: Pattern + PartialEq,
    P::Symbol: PartialEq,
    I: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.mask == other.mask && self.slots == other.slots
    }
}

impl<P, I> Eq for Frame<P, I>
where
    P: Pattern + Eq,
    P::Symbol: Eq,
    I: Eq,
{
}

impl<P, I> Hash for Frame<P, I>
where
    P: Pattern + Hash,
    P::Symbol: Hash,
    I: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
        self.mask.hash(state);
        self.slots.hash(state);
    }
}

impl<P, I> fmt::Debug for Frame<P, I>
where
    P: Pattern + fmt::Debug,
    P::Symbol: fmt::Debug,
    I: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            pattern,
            mask,
            slots,
        } = self;
        f.debug_struct("Frame")
            .field("pattern", pattern)
            .field("mask", mask)
            .field("slots", &slots.values())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------

/// Anything a [`Runner`](crate::runner::Runner) can apply to a [`ContentSink`].
///
/// Implemented by [`Frame`]; hosts may implement it for their own frame types.
pub trait ApplyFrame {
    /// Type of content the frame writes.
    type Item;

    /// Writes this frame to `sink`.
    fn apply_to(&self, sink: &mut dyn ContentSink<Self::Item>) -> Result<(), StepError>;
}

impl<P: Pattern, I> ApplyFrame for Frame<P, I>
where
    P::Symbol: Ord,
{
    type Item = I;

    fn apply_to(&self, sink: &mut dyn ContentSink<I>) -> Result<(), StepError> {
        self.apply(sink)
    }
}

// -------------------------------------------------------------------------------------------------

/// A [`ContentSink`] which records every update it receives.
///
/// Clones share the same record, so one clone may be given to a
/// [`Runner`](crate::runner::Runner) while another is inspected.
#[derive(Debug)]
pub struct Recorder<I> {
    updates: Arc<Mutex<Vec<(i32, Option<I>)>>>,
}

impl<I> Recorder<I> {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self {
            updates: Arc::default(),
        }
    }

    /// Removes and returns all updates recorded so far.
    pub fn take(&self) -> Vec<(i32, Option<I>)> {
        core::mem::take(&mut *self.updates.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<I> Clone for Recorder<I> {
    fn clone(&self) -> Self {
        Self {
            updates: self.updates.clone(),
        }
    }
}

impl<I> Default for Recorder<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Clone> ContentSink<I> for Recorder<I> {
    fn set_content(&mut self, index: i32, item: Option<&I>) -> Result<(), SinkError> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((index, item.cloned()));
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
