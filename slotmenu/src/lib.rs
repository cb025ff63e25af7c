//! `slotmenu` animates menus made of addressable slots, such as the chest and
//! inventory screens a game server shows to its players.
//!
//! The crate does not know anything about any particular host. It decides *what*
//! each slot should contain and *when* the next change is due; the host supplies a
//! periodic tick signal and receives `(slot index, content)` updates.
//!
//! ## Concepts
//!
//! * A [`Pattern`](pattern::Pattern) maps every slot index to a symbol, such as
//!   “border” or a character from a text grid.
//! * A [`Mask`](mask::Mask) maps symbols to content. A symbol may be absent from the
//!   mask (leave the slot alone) or present with no item (clear the slot).
//! * A [`Frame`](frame::Frame) combines a pattern, a mask, and the list of slots it
//!   touches. Applying a frame writes to a [`ContentSink`](frame::ContentSink).
//! * An [`Animation`](animation::Animation) is a resettable sequence of frames.
//! * A [`Schedule`](schedule::Schedule) is a resettable, clonable sequence of delays
//!   measured in [`Ticks`](tick::Ticks).
//! * A [`Runner`](runner::Runner) plays an animation according to a schedule, driven by
//!   a host-provided [`TickProvider`](tick::TickProvider).
//! * [`IntGenerator`](intgen::IntGenerator)s produce the sequences of slot indices which
//!   frames visit.
//!
//! ## Threading
//!
//! Patterns, masks, frames and schedules are plain values. A [`Runner`](runner::Runner)
//! keeps its state behind a mutex so that tick providers which invoke callbacks from
//! worker threads are supported as well as single-threaded cooperative ones.

pub mod animation;
pub mod frame;
pub mod intgen;
pub mod mask;
pub mod pattern;
pub mod registry;
pub mod runner;
pub mod schedule;
pub mod tick;
pub mod util;

#[doc(inline)]
pub use tick::Ticks;

/// Error returned when a sequence ([`IntGenerator`](intgen::IntGenerator) or
/// [`Animation`](animation::Animation)) is advanced past its end.
///
/// Callers are expected to check `has_next()` or `has_next_frame()` first;
/// receiving this error indicates a bug in the caller.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, displaydoc::Display)]
#[displaydoc("sequence advanced past its end")]
#[expect(clippy::exhaustive_structs)]
pub struct Exhausted;

impl core::error::Error for Exhausted {}
