//! Resettable generators of slot indices.
//!
//! An [`IntGenerator`] is like an [`Iterator`] of [`i32`] which can be rewound with
//! [`IntGenerator::reset()`]. Frames use them to decide which slots they visit, and
//! animations use them to decide the order in which slots are revealed.

use core::fmt;
use std::sync::Arc;

use crate::Exhausted;

// -------------------------------------------------------------------------------------------------

/// A resettable source of integers.
///
/// Implementations must be deterministic: after [`reset()`](Self::reset), the generator
/// produces exactly the same sequence as it did after construction (or, for
/// [`IndexArray`], after the last [`freeze()`](IndexArray::freeze)).
pub trait IntGenerator {
    /// Returns whether [`next_int()`](Self::next_int) will produce a value.
    fn has_next(&self) -> bool;

    /// Produces the next value.
    ///
    /// Returns [`Exhausted`] if [`has_next()`](Self::has_next) would have returned false.
    fn next_int(&mut self) -> Result<i32, Exhausted>;

    /// Returns the generator to its initial state.
    fn reset(&mut self);

    /// Borrows this generator as an [`Iterator`], which ends when the generator is exhausted.
    fn iter(&mut self) -> Iter<'_, Self>
    where
        Self: Sized,
    {
        Iter(self)
    }

    /// Produces all of the values of `self`, then all of the values of `other`.
    fn concat<B: IntGenerator>(self, other: B) -> Concat<Self, B>
    where
        Self: Sized,
    {
        Concat {
            first: self,
            second: other,
            in_second: false,
        }
    }

    /// Repeats the values of `self` forever, by resetting it whenever it is exhausted.
    ///
    /// If `self` produces no values at all, the result produces no values either.
    fn cycle(self) -> Cycle<Self>
    where
        Self: Sized,
    {
        Cycle::new(self)
    }

    /// Produces at most `count` values of `self`.
    ///
    /// This is the usual way to turn an infinite generator into one that a
    /// [`Frame`](crate::frame::Frame) can visit.
    fn limit(self, count: usize) -> Limit<Self>
    where
        Self: Sized,
    {
        Limit {
            inner: self,
            limit: count,
            taken: 0,
        }
    }
}

impl<G: IntGenerator + ?Sized> IntGenerator for Box<G> {
    fn has_next(&self) -> bool {
        (**self).has_next()
    }
    fn next_int(&mut self) -> Result<i32, Exhausted> {
        (**self).next_int()
    }
    fn reset(&mut self) {
        (**self).reset()
    }
}

impl<G: IntGenerator + ?Sized> IntGenerator for &mut G {
    fn has_next(&self) -> bool {
        (**self).has_next()
    }
    fn next_int(&mut self) -> Result<i32, Exhausted> {
        (**self).next_int()
    }
    fn reset(&mut self) {
        (**self).reset()
    }
}

/// [`Iterator`] over the remaining values of an [`IntGenerator`].
/// Construct this using [`IntGenerator::iter()`].
#[derive(Debug)]
pub struct Iter<'a, G: ?Sized>(&'a mut G);

impl<G: IntGenerator + ?Sized> Iterator for Iter<'_, G> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.0.has_next() {
            self.0.next_int().ok()
        } else {
            None
        }
    }
}

/// Errors from constructing an [`IntGenerator`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, displaydoc::Display)]
#[non_exhaustive]
pub enum IntGenError {
    /// range step must not be zero
    ZeroStep,
}

impl core::error::Error for IntGenError {}

// -------------------------------------------------------------------------------------------------

/// Array-backed generator.
///
/// Cloning is cheap; the values are shared.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct IndexArray {
    values: Arc<[i32]>,
    reset_point: usize,
    position: usize,
}

impl IndexArray {
    /// Constructs a generator which produces `values` in order.
    pub fn new(values: impl Into<Arc<[i32]>>) -> Self {
        Self {
            values: values.into(),
            reset_point: 0,
            position: 0,
        }
    }

    /// Collects the remaining values of `source` into a new [`IndexArray`].
    ///
    /// `source` must be finite; use [`IntGenerator::limit()`] to bound it otherwise.
    pub fn drain(source: &mut impl IntGenerator) -> Self {
        Self::new(source.iter().collect::<Vec<i32>>())
    }

    /// Makes the current position the point which [`IntGenerator::reset()`] returns to.
    pub fn freeze(&mut self) {
        self.reset_point = self.position;
    }

    /// Returns the values this generator produces after a reset.
    pub fn values(&self) -> &[i32] {
        &self.values[self.reset_point..]
    }

    /// Returns the number of values this generator produces after a reset.
    pub fn len(&self) -> usize {
        self.values.len() - self.reset_point
    }

    /// Returns whether this generator produces no values after a reset.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IntGenerator for IndexArray {
    fn has_next(&self) -> bool {
        self.position < self.values.len()
    }

    fn next_int(&mut self) -> Result<i32, Exhausted> {
        let value = *self.values.get(self.position).ok_or(Exhausted)?;
        self.position += 1;
        Ok(value)
    }

    fn reset(&mut self) {
        self.position = self.reset_point;
    }
}

impl fmt::Debug for IndexArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            values,
            reset_point,
            position,
        } = self;
        f.debug_struct("IndexArray")
            .field("values", &&values[..])
            .field("reset_point", reset_point)
            .field("position", position)
            .finish()
    }
}

impl From<Vec<i32>> for IndexArray {
    fn from(values: Vec<i32>) -> Self {
        Self::new(values)
    }
}

impl<const N: usize> From<[i32; N]> for IndexArray {
    fn from(values: [i32; N]) -> Self {
        Self::new(values.as_slice())
    }
}

impl FromIterator<i32> for IndexArray {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect::<Vec<i32>>())
    }
}

// -------------------------------------------------------------------------------------------------

/// Produces the same value a fixed number of times, or forever.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Repeat {
    value: i32,
    count: Option<u32>,
    emitted: u32,
}

impl Repeat {
    /// Produces `value` exactly `count` times.
    pub fn times(value: i32, count: u32) -> Self {
        Self {
            value,
            count: Some(count),
            emitted: 0,
        }
    }

    /// Produces `value` forever.
    pub fn forever(value: i32) -> Self {
        Self {
            value,
            count: None,
            emitted: 0,
        }
    }
}

impl IntGenerator for Repeat {
    fn has_next(&self) -> bool {
        self.count.is_none_or(|count| self.emitted < count)
    }

    fn next_int(&mut self) -> Result<i32, Exhausted> {
        if !self.has_next() {
            return Err(Exhausted);
        }
        // Saturate so that a forever-generator does not overflow the counter.
        self.emitted = self.emitted.saturating_add(1);
        Ok(self.value)
    }

    fn reset(&mut self) {
        self.emitted = 0;
    }
}

// -------------------------------------------------------------------------------------------------

/// Infinite generator producing `seed`, `f(seed)`, `f(f(seed))`, and so on.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Successor {
    seed: i32,
    successor: fn(i32) -> i32,
    current: Option<i32>,
}

impl Successor {
    /// Constructs a generator starting at `seed` and advancing with `successor`.
    pub fn new(seed: i32, successor: fn(i32) -> i32) -> Self {
        Self {
            seed,
            successor,
            current: None,
        }
    }
}

impl IntGenerator for Successor {
    fn has_next(&self) -> bool {
        true
    }

    fn next_int(&mut self) -> Result<i32, Exhausted> {
        let value = match self.current {
            None => self.seed,
            Some(previous) => (self.successor)(previous),
        };
        self.current = Some(value);
        Ok(value)
    }

    fn reset(&mut self) {
        self.current = None;
    }
}

// -------------------------------------------------------------------------------------------------

/// Arithmetic progression from `start` towards an exclusive `end`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Range {
    start: i32,
    end: i32,
    step: i32,
    // i64 so that stepping past `i32::MAX` cannot overflow.
    next: i64,
}

impl Range {
    /// Constructs a range with the given step, which may be negative but not zero.
    pub fn new(start: i32, end: i32, step: i32) -> Result<Self, IntGenError> {
        if step == 0 {
            return Err(IntGenError::ZeroStep);
        }
        Ok(Self {
            start,
            end,
            step,
            next: i64::from(start),
        })
    }

    /// Constructs the range `start..end` with step 1.
    pub fn up_to(start: i32, end: i32) -> Self {
        Self {
            start,
            end,
            step: 1,
            next: i64::from(start),
        }
    }
}

impl IntGenerator for Range {
    fn has_next(&self) -> bool {
        if self.step > 0 {
            self.next < i64::from(self.end)
        } else {
            self.next > i64::from(self.end)
        }
    }

    fn next_int(&mut self) -> Result<i32, Exhausted> {
        if !self.has_next() {
            return Err(Exhausted);
        }
        // In bounds because it lies between `start` and `end`.
        let value = self.next as i32;
        self.next += i64::from(self.step);
        Ok(value)
    }

    fn reset(&mut self) {
        self.next = i64::from(self.start);
    }
}

// -------------------------------------------------------------------------------------------------

/// Generator produced by [`IntGenerator::concat()`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Concat<A, B> {
    first: A,
    second: B,
    in_second: bool,
}

impl<A: IntGenerator, B: IntGenerator> IntGenerator for Concat<A, B> {
    fn has_next(&self) -> bool {
        (!self.in_second && self.first.has_next()) || self.second.has_next()
    }

    fn next_int(&mut self) -> Result<i32, Exhausted> {
        if !self.in_second {
            if self.first.has_next() {
                return self.first.next_int();
            }
            self.in_second = true;
        }
        self.second.next_int()
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
        self.in_second = false;
    }
}

/// Generator produced by [`IntGenerator::cycle()`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Cycle<G> {
    inner: G,
    nonempty: bool,
}

impl<G: IntGenerator> Cycle<G> {
    fn new(mut inner: G) -> Self {
        if !inner.has_next() {
            inner.reset();
        }
        let nonempty = inner.has_next();
        Self { inner, nonempty }
    }
}

impl<G: IntGenerator> IntGenerator for Cycle<G> {
    fn has_next(&self) -> bool {
        self.nonempty
    }

    fn next_int(&mut self) -> Result<i32, Exhausted> {
        if !self.inner.has_next() {
            self.inner.reset();
        }
        self.inner.next_int()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}

/// Generator produced by [`IntGenerator::limit()`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Limit<G> {
    inner: G,
    limit: usize,
    taken: usize,
}

impl<G: IntGenerator> IntGenerator for Limit<G> {
    fn has_next(&self) -> bool {
        self.taken < self.limit && self.inner.has_next()
    }

    fn next_int(&mut self) -> Result<i32, Exhausted> {
        if self.taken >= self.limit {
            return Err(Exhausted);
        }
        let value = self.inner.next_int()?;
        self.taken += 1;
        Ok(value)
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.taken = 0;
    }
}

// -------------------------------------------------------------------------------------------------
