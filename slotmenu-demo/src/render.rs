//! [`SlotGrid`]: a [`ContentSink`] that draws a menu as text.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use slotmenu::frame::{ContentSink, SinkError};

/// Text rendition of a menu of `size` slots laid out in rows of `width`.
///
/// Clones share the same slots, so one clone may be given to a
/// [`Runner`](slotmenu::runner::Runner) while another is drawn.
#[derive(Clone, Debug)]
pub struct SlotGrid {
    width: usize,
    slots: Arc<Mutex<Vec<Option<char>>>>,
}

impl SlotGrid {
    /// Constructs a grid with every slot empty.
    pub fn new(width: u32, size: u32) -> Self {
        Self {
            width: (width as usize).max(1),
            slots: Arc::new(Mutex::new(vec![None; size as usize])),
        }
    }

    /// Returns the content of each slot.
    pub fn snapshot(&self) -> Vec<Option<char>> {
        self.lock().clone()
    }

    /// Draws the grid, one line per row. Empty slots are drawn as spaces.
    pub fn render(&self) -> String {
        self.lock()
            .chunks(self.width)
            .map(|row| row.iter().map(|slot| slot.unwrap_or(' ')).collect::<String>())
            .collect::<Vec<String>>()
            .join("\n")
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Option<char>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ContentSink<char> for SlotGrid {
    fn set_content(&mut self, index: i32, item: Option<&char>) -> Result<(), SinkError> {
        let mut slots = self.lock();
        let size = slots.len();
        let slot = usize::try_from(index)
            .ok()
            .and_then(|i| slots.get_mut(i))
            .ok_or(SlotOutOfRange { index, size })?;
        *slot = item.copied();
        Ok(())
    }
}

/// Error from writing a slot a [`SlotGrid`] does not have.
#[derive(Clone, Copy, Debug, Eq, PartialEq, displaydoc::Display)]
#[displaydoc("slot {index} is outside this {size}-slot grid")]
pub struct SlotOutOfRange {
    index: i32,
    size: usize,
}

impl core::error::Error for SlotOutOfRange {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_rows() {
        let grid = SlotGrid::new(3, 6);
        let mut sink = grid.clone();
        sink.set_content(0, Some(&'a')).unwrap();
        sink.set_content(4, Some(&'b')).unwrap();
        sink.set_content(0, None).unwrap();
        assert_eq!(grid.render(), "   \n b ");
        assert_eq!(
            grid.snapshot(),
            vec![None, None, None, None, Some('b'), None]
        );
    }

    #[test]
    fn out_of_range() {
        let mut grid = SlotGrid::new(3, 6);
        for index in [-1, 6] {
            let error = grid.set_content(index, Some(&'x')).unwrap_err();
            assert_eq!(
                error.to_string(),
                format!("slot {index} is outside this 6-slot grid")
            );
        }
    }
}
