//! [`Mask`]s: assignments of content to symbols.

use std::collections::BTreeMap;

/// Table from symbol to the content that slots with that symbol should hold.
///
/// Each symbol is in one of three states:
///
/// * absent: slots with this symbol are left untouched;
/// * present with an item: slots are set to that item;
/// * present with no item: slots are cleared.
///
/// ```
/// use slotmenu::mask::Mask;
///
/// let mask = Mask::new().with('#', "glass").with_clear(' ');
/// assert_eq!(mask.item(&'#'), Some(Some(&"glass")));
/// assert_eq!(mask.item(&' '), Some(None));
/// assert_eq!(mask.item(&'?'), None);
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Mask<S, I> {
    table: BTreeMap<S, Option<I>>,
}

impl<S: Ord, I> Mask<S, I> {
    /// Constructs a mask with no symbols present.
    pub fn new() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Makes slots with `symbol` hold `item`.
    #[must_use]
    pub fn with(mut self, symbol: S, item: I) -> Self {
        self.table.insert(symbol, Some(item));
        self
    }

    /// Makes slots with `symbol` be cleared.
    #[must_use]
    pub fn with_clear(mut self, symbol: S) -> Self {
        self.table.insert(symbol, None);
        self
    }

    /// Looks up `symbol`.
    ///
    /// The outer [`Option`] is whether the symbol is present at all;
    /// the inner one is whether it has an item or clears the slot.
    pub fn item(&self, symbol: &S) -> Option<Option<&I>> {
        self.table.get(symbol).map(Option::as_ref)
    }

    /// Returns whether no symbols are present.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<S: Ord, I> Default for Mask<S, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Ord, I> FromIterator<(S, Option<I>)> for Mask<S, I> {
    fn from_iter<T: IntoIterator<Item = (S, Option<I>)>>(iter: T) -> Self {
        Self {
            table: iter.into_iter().collect(),
        }
    }
}
