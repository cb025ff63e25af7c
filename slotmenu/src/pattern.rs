//! [`Pattern`]s: assignments of symbols to slot indices.

#![allow(
    clippy::module_name_repetitions,
    reason = "these names are re-exported and used unqualified"
)]

use core::fmt;
use std::collections::BTreeMap;
use std::sync::Arc;

mod shapes;
pub use shapes::*;

// -------------------------------------------------------------------------------------------------

/// A function from slot index to symbol.
///
/// Patterns must be total and pure: every index, including negative and out-of-range
/// ones, yields a result without panicking, and the same index always yields the same
/// result. [`None`] means “no symbol”.
pub trait Pattern {
    /// The type of symbol this pattern assigns.
    type Symbol;

    /// Returns the symbol assigned to `index`, if any.
    fn symbol(&self, index: i32) -> Option<Self::Symbol>;

    /// Transforms every symbol of this pattern with `function`.
    ///
    /// This is how shapes with different symbol types are brought together, for example
    /// before placing them in a [`Combined`] pattern.
    fn map_symbols<T, F>(self, function: F) -> MapSymbols<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Symbol) -> T,
    {
        MapSymbols {
            pattern: self,
            function,
        }
    }
}

/// A [`Pattern`] which describes a bounded region of `size()` slots, numbered from zero.
pub trait Shape: Pattern {
    /// Number of slots in this region.
    fn size(&self) -> u32;
}

impl<P: Pattern + ?Sized> Pattern for &P {
    type Symbol = P::Symbol;
    fn symbol(&self, index: i32) -> Option<Self::Symbol> {
        (**self).symbol(index)
    }
}
impl<P: Pattern + ?Sized> Pattern for Box<P> {
    type Symbol = P::Symbol;
    fn symbol(&self, index: i32) -> Option<Self::Symbol> {
        (**self).symbol(index)
    }
}
impl<P: Pattern + ?Sized> Pattern for Arc<P> {
    type Symbol = P::Symbol;
    fn symbol(&self, index: i32) -> Option<Self::Symbol> {
        (**self).symbol(index)
    }
}
impl<P: Shape + ?Sized> Shape for &P {
    fn size(&self) -> u32 {
        (**self).size()
    }
}
impl<P: Shape + ?Sized> Shape for Box<P> {
    fn size(&self) -> u32 {
        (**self).size()
    }
}
impl<P: Shape + ?Sized> Shape for Arc<P> {
    fn size(&self) -> u32 {
        (**self).size()
    }
}

/// Errors from constructing a [`Pattern`].
#[derive(Clone, Debug, Eq, Hash, PartialEq, displaydoc::Display)]
#[non_exhaustive]
pub enum PatternError {
    /// pattern dimensions must not be zero
    ZeroDimension,

    /// pattern of {width}×{height} slots is too large to index
    #[allow(missing_docs)]
    TooLarge { width: u32, height: u32 },

    /// grid row {row} has {actual} characters but the first row has {expected}
    #[allow(missing_docs)]
    RaggedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl core::error::Error for PatternError {}

/// Computes `width * height` as a slot count, or fails if either is zero or the product
/// cannot be addressed by an `i32` slot index.
pub(crate) fn checked_area(width: u32, height: u32) -> Result<u32, PatternError> {
    if width == 0 || height == 0 {
        return Err(PatternError::ZeroDimension);
    }
    width
        .checked_mul(height)
        .filter(|&size| i32::try_from(size).is_ok())
        .ok_or(PatternError::TooLarge { width, height })
}

// -------------------------------------------------------------------------------------------------

/// [`Pattern`] defined by an explicit table of indices.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MapPattern<S> {
    symbols: BTreeMap<i32, S>,
}

impl<S> MapPattern<S> {
    /// Constructs a pattern from a map of indices to symbols.
    pub fn new(symbols: BTreeMap<i32, S>) -> Self {
        Self { symbols }
    }
}

impl<S: Clone> Pattern for MapPattern<S> {
    type Symbol = S;
    fn symbol(&self, index: i32) -> Option<S> {
        self.symbols.get(&index).cloned()
    }
}

impl<S> FromIterator<(i32, S)> for MapPattern<S> {
    fn from_iter<T: IntoIterator<Item = (i32, S)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// -------------------------------------------------------------------------------------------------

/// [`Pattern`] defined by rows of text, one character per slot, in row-major order.
///
/// ```
/// use slotmenu::pattern::{GridPattern, Pattern as _};
///
/// let grid = GridPattern::parse(["#########", "#  a b  #", "#########"])
///     .unwrap()
///     .with_blank(' ');
/// assert_eq!(grid.symbol(0), Some('#'));
/// assert_eq!(grid.symbol(12), Some('a'));
/// assert_eq!(grid.symbol(10), None); // blank
/// assert_eq!(grid.symbol(27), None); // out of range
/// ```
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct GridPattern {
    width: u32,
    cells: Arc<[char]>,
    blank: Option<char>,
}

impl GridPattern {
    /// Parses `rows`, which must be nonempty and all contain the same number of characters.
    pub fn parse<R: AsRef<str>>(rows: impl IntoIterator<Item = R>) -> Result<Self, PatternError> {
        let mut cells: Vec<char> = Vec::new();
        let mut width: Option<usize> = None;
        let mut height: usize = 0;
        for (row_index, row) in rows.into_iter().enumerate() {
            let row_start = cells.len();
            cells.extend(row.as_ref().chars());
            let actual = cells.len() - row_start;
            match width {
                None => width = Some(actual),
                Some(expected) if expected != actual => {
                    return Err(PatternError::RaggedGrid {
                        row: row_index,
                        expected,
                        actual,
                    });
                }
                Some(_) => {}
            }
            height += 1;
        }
        let width = width.unwrap_or(0);
        let too_large = PatternError::TooLarge {
            width: u32::try_from(width).unwrap_or(u32::MAX),
            height: u32::try_from(height).unwrap_or(u32::MAX),
        };
        let width32 = u32::try_from(width).map_err(|_| too_large.clone())?;
        let height32 = u32::try_from(height).map_err(|_| too_large)?;
        checked_area(width32, height32)?;

        Ok(Self {
            width: width32,
            cells: cells.into(),
            blank: None,
        })
    }

    /// Treats `blank` characters as having no symbol.
    #[must_use]
    pub fn with_blank(mut self, blank: char) -> Self {
        self.blank = Some(blank);
        self
    }

    /// Returns the number of characters in each row.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the number of rows.
    pub fn height(&self) -> u32 {
        self.size() / self.width
    }
}

impl Pattern for GridPattern {
    type Symbol = char;
    fn symbol(&self, index: i32) -> Option<char> {
        let cell = *self.cells.get(usize::try_from(index).ok()?)?;
        if Some(cell) == self.blank {
            None
        } else {
            Some(cell)
        }
    }
}

impl Shape for GridPattern {
    fn size(&self) -> u32 {
        // Checked at construction.
        self.cells.len() as u32
    }
}

impl fmt::Debug for GridPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            width,
            cells,
            blank,
        } = self;
        let rows: Vec<String> = cells
            .chunks(*width as usize)
            .map(|row| row.iter().collect())
            .collect();
        f.debug_struct("GridPattern")
            .field("rows", &rows)
            .field("blank", blank)
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------

/// Pattern produced by [`Pattern::map_symbols()`].
#[derive(Clone)]
pub struct MapSymbols<P, F> {
    pattern: P,
    function: F,
}

impl<T, P: Pattern, F: Fn(P::Symbol) -> T> Pattern for MapSymbols<P, F> {
    type Symbol = T;
    fn symbol(&self, index: i32) -> Option<T> {
        self.pattern.symbol(index).map(&self.function)
    }
}

impl<T, P: Shape, F: Fn(P::Symbol) -> T> Shape for MapSymbols<P, F> {
    fn size(&self) -> u32 {
        self.pattern.size()
    }
}

impl<P: fmt::Debug, F> fmt::Debug for MapSymbols<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapSymbols")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

// -------------------------------------------------------------------------------------------------
