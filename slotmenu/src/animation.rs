//! [`Animation`]s: resettable sequences of frames.

#![allow(
    clippy::module_name_repetitions,
    reason = "these names are re-exported and used unqualified"
)]

use core::fmt;
use core::num::NonZeroUsize;
use std::sync::Arc;

use crate::Exhausted;
use crate::frame::Frame;
use crate::intgen::{IndexArray, IntGenerator};
use crate::pattern::Pattern;

// -------------------------------------------------------------------------------------------------

/// A resettable sequence of frames.
///
/// An animation is in one of three states: initial (after construction or
/// [`reset()`](Self::reset)), part way through, or exhausted. Only finite animations
/// ever become exhausted.
pub trait Animation {
    /// Type of the frames produced; usually [`Frame`].
    type Frame;

    /// Returns to the initial state, so that the next frame is the first frame.
    fn reset(&mut self);

    /// Produces the next frame.
    ///
    /// Returns [`Exhausted`] if [`has_next_frame()`](Self::has_next_frame) would have
    /// returned false; callers should check that first.
    fn next_frame(&mut self) -> Result<Self::Frame, Exhausted>;

    /// Returns whether [`next_frame()`](Self::next_frame) will produce a frame.
    ///
    /// This does not change the state of the animation.
    fn has_next_frame(&self) -> bool;

    /// Wraps this animation so that it starts over whenever it is exhausted,
    /// and therefore never ends.
    fn continuously(self) -> Continuously<Self>
    where
        Self: Sized,
    {
        Continuously { inner: self }
    }
}

impl<A: Animation + ?Sized> Animation for Box<A> {
    type Frame = A::Frame;
    fn reset(&mut self) {
        (**self).reset()
    }
    fn next_frame(&mut self) -> Result<Self::Frame, Exhausted> {
        (**self).next_frame()
    }
    fn has_next_frame(&self) -> bool {
        (**self).has_next_frame()
    }
}

/// Type-erased [`Animation`], as stored by a [`Runner`](crate::runner::Runner).
pub type BoxAnimation<F> = Box<dyn Animation<Frame = F> + Send>;

/// Errors from constructing an [`Animation`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, displaydoc::Display)]
#[non_exhaustive]
pub enum AnimationError {
    /// animation must have at least one frame
    Empty,
}

impl core::error::Error for AnimationError {}

// -------------------------------------------------------------------------------------------------

/// Finite [`Animation`] which plays a fixed list of frames in order.
///
/// Clones share the list but have independent positions.
#[derive(Clone, Debug)]
pub struct FrameList<F> {
    frames: Arc<[F]>,
    cursor: usize,
}

impl<F> FrameList<F> {
    /// Constructs an animation of the given frames, which must not be empty.
    pub fn new(frames: impl IntoIterator<Item = F>) -> Result<Self, AnimationError> {
        let frames: Arc<[F]> = frames.into_iter().collect();
        if frames.is_empty() {
            return Err(AnimationError::Empty);
        }
        Ok(Self { frames, cursor: 0 })
    }

    /// Returns all of the frames, regardless of the current position.
    pub fn frames(&self) -> &[F] {
        &self.frames
    }
}

impl<P: Pattern, I> FrameList<Frame<P, I>> {
    /// Constructs an animation which reveals `base` a few slots at a time.
    ///
    /// The slots visited by `order` are split into consecutive chunks of `per_frame`
    /// slots; frame *k* is `base` restricted to chunk *k*. Since frames only ever write the
    /// slots they visit, playing the whole animation leaves every slot of `order` written.
    ///
    /// `order` must be finite and produce at least one slot.
    pub fn reveal(
        base: &Frame<P, I>,
        mut order: impl IntGenerator,
        per_frame: NonZeroUsize,
    ) -> Result<Self, AnimationError> {
        let order = IndexArray::drain(&mut order);
        Self::new(
            order
                .values()
                .chunks(per_frame.get())
                .map(|chunk| base.with_active_slots(IndexArray::new(chunk))),
        )
    }
}

impl<F: Clone> Animation for FrameList<F> {
    type Frame = F;

    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn next_frame(&mut self) -> Result<F, Exhausted> {
        let frame = self.frames.get(self.cursor).ok_or(Exhausted)?.clone();
        self.cursor += 1;
        Ok(frame)
    }

    fn has_next_frame(&self) -> bool {
        self.cursor < self.frames.len()
    }
}

// -------------------------------------------------------------------------------------------------

/// Infinite [`Animation`] whose first frame is `seed` and whose every later frame is
/// computed from the previous one.
pub struct Generated<F> {
    seed: F,
    successor: Arc<dyn Fn(&F) -> F + Send + Sync>,
    current: Option<F>,
}

impl<F> Generated<F> {
    /// Constructs an animation from a first frame and a successor function.
    ///
    /// `successor` should be pure, so that the animation repeats exactly after a reset.
    pub fn new(seed: F, successor: impl Fn(&F) -> F + Send + Sync + 'static) -> Self {
        Self {
            seed,
            successor: Arc::new(successor),
            current: None,
        }
    }
}

impl<F: Clone> Animation for Generated<F> {
    type Frame = F;

    fn reset(&mut self) {
        self.current = None;
    }

    fn next_frame(&mut self) -> Result<F, Exhausted> {
        let next = match &self.current {
            None => self.seed.clone(),
            Some(previous) => (self.successor)(previous),
        };
        self.current = Some(next.clone());
        Ok(next)
    }

    fn has_next_frame(&self) -> bool {
        true
    }
}

impl<F: Clone> Clone for Generated<F> {
    fn clone(&self) -> Self {
        Self {
            seed: self.seed.clone(),
            successor: self.successor.clone(),
            current: self.current.clone(),
        }
    }
}

impl<F: fmt::Debug> fmt::Debug for Generated<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generated")
            .field("seed", &self.seed)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

// -------------------------------------------------------------------------------------------------

/// [`Animation`] produced by [`Animation::continuously()`].
#[derive(Clone, Debug)]
pub struct Continuously<A> {
    inner: A,
}

impl<A: Animation> Animation for Continuously<A> {
    type Frame = A::Frame;

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn next_frame(&mut self) -> Result<A::Frame, Exhausted> {
        if !self.inner.has_next_frame() {
            self.inner.reset();
        }
        self.inner.next_frame()
    }

    fn has_next_frame(&self) -> bool {
        true
    }
}

// -------------------------------------------------------------------------------------------------
