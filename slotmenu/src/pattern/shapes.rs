use super::{Pattern, PatternError, Shape, checked_area};

/// Converts an index into the range `0..size`, if it is in that range.
fn in_range(index: i32, size: u32) -> Option<u32> {
    u32::try_from(index).ok().filter(|&i| i < size)
}

// -------------------------------------------------------------------------------------------------

/// Symbols of a [`BorderPattern`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[expect(clippy::exhaustive_enums)]
pub enum BorderSymbol {
    /// The slot is on the outer edge of the grid.
    Outer,
    /// The slot is not on the outer edge of the grid.
    Inner,
}

/// Classifies the slots of a `width`×`height` grid as being on its edge or not.
///
/// ```
/// use slotmenu::pattern::{BorderPattern, BorderSymbol::*, Pattern as _};
///
/// let border = BorderPattern::new(3, 3).unwrap();
/// assert_eq!(border.symbol(4), Some(Inner));
/// assert_eq!(border.symbol(7), Some(Outer));
/// assert_eq!(border.symbol(9), None);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct BorderPattern {
    width: u32,
    height: u32,
}

impl BorderPattern {
    /// Constructs a border pattern for a grid of the given dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, PatternError> {
        checked_area(width, height)?;
        Ok(Self { width, height })
    }
}

impl Pattern for BorderPattern {
    type Symbol = BorderSymbol;

    fn symbol(&self, index: i32) -> Option<BorderSymbol> {
        let size = i64::from(self.size());
        let width = i64::from(self.width);
        let index = i64::from(in_range(index, self.size())?);

        let column = index % width;
        // The bottom-row test is a strict comparison, so `size - width` itself is not
        // caught by it; the first-column test classifies that slot instead.
        let outer = index < width || index > size - width || column == 0 || column == width - 1;
        Some(if outer {
            BorderSymbol::Outer
        } else {
            BorderSymbol::Inner
        })
    }
}

impl Shape for BorderPattern {
    fn size(&self) -> u32 {
        // Product checked at construction.
        self.width * self.height
    }
}

// -------------------------------------------------------------------------------------------------

/// Alternates between two symbols, starting with `start` at index 0.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Checkerboard<S> {
    size: u32,
    start: S,
    other: S,
}

impl<S> Checkerboard<S> {
    /// Constructs a checkerboard of `size` slots.
    pub fn new(size: u32, start: S, other: S) -> Self {
        Self { size, start, other }
    }

    /// Swaps the two symbols.
    #[must_use]
    pub fn invert(self) -> Self {
        Self {
            size: self.size,
            start: self.other,
            other: self.start,
        }
    }
}

impl<S: Clone> Pattern for Checkerboard<S> {
    type Symbol = S;

    fn symbol(&self, index: i32) -> Option<S> {
        let index = in_range(index, self.size)?;
        Some(if index % 2 == 0 {
            self.start.clone()
        } else {
            self.other.clone()
        })
    }
}

impl<S: Clone> Shape for Checkerboard<S> {
    fn size(&self) -> u32 {
        self.size
    }
}

// -------------------------------------------------------------------------------------------------

/// Assigns a symbol to exactly one slot index.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Single<S> {
    index: i32,
    symbol: S,
}

impl<S> Single<S> {
    #[allow(missing_docs)]
    pub fn new(index: i32, symbol: S) -> Self {
        Self { index, symbol }
    }
}

impl<S: Clone> Pattern for Single<S> {
    type Symbol = S;
    fn symbol(&self, index: i32) -> Option<S> {
        (index == self.index).then(|| self.symbol.clone())
    }
}

/// Assigns the same symbol to every slot of a region.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Fill<S> {
    size: u32,
    symbol: S,
}

impl<S> Fill<S> {
    #[allow(missing_docs)]
    pub fn new(size: u32, symbol: S) -> Self {
        Self { size, symbol }
    }
}

impl<S: Clone> Pattern for Fill<S> {
    type Symbol = S;
    fn symbol(&self, index: i32) -> Option<S> {
        in_range(index, self.size).map(|_| self.symbol.clone())
    }
}

impl<S: Clone> Shape for Fill<S> {
    fn size(&self) -> u32 {
        self.size
    }
}

// -------------------------------------------------------------------------------------------------

/// Places several [`Shape`]s end to end.
///
/// Index 0 is the first slot of the first part; the first slot of the second part
/// follows the last slot of the first part, and so on. Indices before the first part or
/// after the last part have the `outside` symbol.
///
/// Parts of different types can be combined by boxing them, as in
/// `Combined<Box<dyn Shape<Symbol = S>>, S>`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Combined<P, S> {
    parts: Vec<P>,
    outside: S,
}

impl<P: Shape<Symbol = S>, S> Combined<P, S> {
    /// Constructs a combined pattern.
    pub fn new(parts: impl IntoIterator<Item = P>, outside: S) -> Self {
        Self {
            parts: parts.into_iter().collect(),
            outside,
        }
    }
}

impl<P: Shape<Symbol = S>, S: Clone> Pattern for Combined<P, S> {
    type Symbol = S;

    fn symbol(&self, index: i32) -> Option<S> {
        let Ok(mut local) = u32::try_from(index) else {
            return Some(self.outside.clone());
        };
        for part in &self.parts {
            let size = part.size();
            if local < size {
                // In range because `local <= index`.
                return part.symbol(local as i32);
            }
            local -= size;
        }
        Some(self.outside.clone())
    }
}

impl<P: Shape<Symbol = S>, S: Clone> Shape for Combined<P, S> {
    fn size(&self) -> u32 {
        self.parts
            .iter()
            .fold(0u32, |total, part| total.saturating_add(part.size()))
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::GridPattern;
    use BorderSymbol::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn border_3x3() {
        let border = BorderPattern::new(3, 3).unwrap();
        assert_eq!(
            (0..9).map(|i| border.symbol(i)).collect::<Vec<_>>(),
            vec![
                Some(Outer),
                Some(Outer),
                Some(Outer),
                Some(Outer),
                Some(Inner),
                Some(Outer),
                Some(Outer),
                Some(Outer),
                Some(Outer),
            ]
        );
        assert_eq!(border.symbol(9), None);
        assert_eq!(border.symbol(-1), None);
    }

    #[test]
    fn border_chest_sized() {
        let border = BorderPattern::new(9, 4).unwrap();
        let inner: Vec<i32> = (0..36)
            .filter(|&i| border.symbol(i) == Some(Inner))
            .collect();
        assert_eq!(inner, vec![10, 11, 12, 13, 14, 15, 16, 19, 20, 21, 22, 23, 24, 25]);
    }

    #[rstest]
    #[case(1, 5)]
    #[case(5, 1)]
    #[case(2, 2)]
    fn border_thin_grids_are_all_outer(#[case] width: u32, #[case] height: u32) {
        let border = BorderPattern::new(width, height).unwrap();
        for i in 0..border.size() as i32 {
            assert_eq!(border.symbol(i), Some(Outer), "index {i}");
        }
    }

    #[test]
    fn border_rejects_zero() {
        assert_eq!(BorderPattern::new(0, 3), Err(PatternError::ZeroDimension));
    }

    #[test]
    fn checkerboard_and_inverse() {
        let board = Checkerboard::new(4, 'x', 'o');
        let symbols = |p: &Checkerboard<char>| (-1..5).map(|i| p.symbol(i)).collect::<Vec<_>>();
        assert_eq!(
            symbols(&board),
            vec![None, Some('x'), Some('o'), Some('x'), Some('o'), None]
        );
        assert_eq!(
            symbols(&board.invert()),
            vec![None, Some('o'), Some('x'), Some('o'), Some('x'), None]
        );
    }

    #[test]
    fn single_and_fill() {
        let single = Single::new(5, 'a');
        assert_eq!((single.symbol(5), single.symbol(4)), (Some('a'), None));
        let fill = Fill::new(2, 'b');
        assert_eq!(
            (fill.symbol(-1), fill.symbol(0), fill.symbol(1), fill.symbol(2)),
            (None, Some('b'), Some('b'), None)
        );
    }

    #[test]
    fn combined_concatenates_regions() {
        let combined = Combined::new([Fill::new(2, 'a'), Fill::new(3, 'b')], '!');
        assert_eq!(combined.size(), 5);
        assert_eq!(
            (-1..6).map(|i| combined.symbol(i).unwrap()).collect::<String>(),
            "!aabbb!"
        );
    }

    #[test]
    fn combined_heterogeneous_parts() {
        let parts: Vec<Box<dyn Shape<Symbol = char>>> = vec![
            Box::new(BorderPattern::new(3, 1).unwrap().map_symbols(|_| '#')),
            Box::new(GridPattern::parse(["xy"]).unwrap()),
        ];
        let combined = Combined::new(parts, '?');
        assert_eq!(
            (0..6).map(|i| combined.symbol(i).unwrap()).collect::<String>(),
            "###xy?"
        );
    }
}
