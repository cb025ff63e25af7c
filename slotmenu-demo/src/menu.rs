//! Constructing an animated menu from a [`MenuConfig`].

#![allow(
    clippy::module_name_repetitions,
    reason = "these names are re-exported and used unqualified"
)]

use core::fmt;
use core::num::NonZeroUsize;
use std::sync::Arc;

use anyhow::Context as _;

use slotmenu::animation::{Animation as _, BoxAnimation, FrameList};
use slotmenu::frame::{ContentSink, Frame};
use slotmenu::intgen::Range;
use slotmenu::mask::Mask;
use slotmenu::pattern::{
    BorderPattern, BorderSymbol, Checkerboard, GridPattern, Pattern as _, Shape,
};
use slotmenu::runner::Runner;
use slotmenu::schedule::BoxSchedule;
use slotmenu::tick::TickProvider;

use crate::config_files::{MenuConfig, PatternConfig};

/// Pattern type of every [`Menu`].
pub type MenuPattern = Box<dyn Shape<Symbol = char> + Send + Sync>;

/// Frame type of every [`Menu`]: slots display characters.
pub type MenuFrame = Frame<MenuPattern, char>;

/// A menu layout with its reveal animation and schedule, ready to be played.
pub struct Menu {
    width: u32,
    size: u32,
    animation: BoxAnimation<MenuFrame>,
    schedule: BoxSchedule,
}

impl Menu {
    /// Builds the menu `config` describes.
    ///
    /// The animation reveals the whole menu, `reveal_per_frame` slots at a time, in slot
    /// order.
    pub fn from_config(config: &MenuConfig) -> Result<Self, anyhow::Error> {
        let (pattern, width) = build_pattern(&config.pattern)?;
        let size = pattern.size();
        let end = i32::try_from(size).context("menu has too many slots")?;
        let per_frame = NonZeroUsize::new(config.reveal_per_frame)
            .context("reveal_per_frame must be at least 1")?;

        let mask: Mask<char, char> = config.mask.iter().map(|(&s, &i)| (s, i)).collect();
        let base = Frame::new(pattern, mask, Range::up_to(0, 0));
        let frames = FrameList::reveal(&base, Range::up_to(0, end), per_frame)
            .context("menu reveal animation")?;
        log::debug!(
            "menu of {size} slots revealed in {count} frames",
            count = frames.frames().len()
        );

        let animation: BoxAnimation<MenuFrame> = if config.continuously {
            Box::new(frames.continuously())
        } else {
            Box::new(frames)
        };
        Ok(Self {
            width,
            size,
            animation,
            schedule: config.schedule.build(),
        })
    }

    /// Number of slots in each row.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Total number of slots.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Constructs a [`Runner`] which plays this menu on `sink`.
    pub fn into_runner(
        self,
        sink: impl ContentSink<char> + Send + 'static,
        ticks: Arc<dyn TickProvider>,
    ) -> Runner<MenuFrame> {
        Runner::new(self.animation, self.schedule, sink, ticks)
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("width", &self.width)
            .field("size", &self.size)
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

fn build_pattern(config: &PatternConfig) -> Result<(MenuPattern, u32), anyhow::Error> {
    Ok(match *config {
        PatternConfig::Grid {
            ref rows,
            blank,
        } => {
            let mut grid = GridPattern::parse(rows).context("invalid grid pattern")?;
            if let Some(blank) = blank {
                grid = grid.with_blank(blank);
            }
            let width = grid.width();
            let pattern: MenuPattern = Box::new(grid);
            (pattern, width)
        }
        PatternConfig::Border {
            width,
            height,
            outer,
            inner,
        } => {
            let border = BorderPattern::new(width, height).context("invalid border pattern")?;
            let pattern = border.map_symbols(move |symbol| match symbol {
                BorderSymbol::Outer => outer,
                BorderSymbol::Inner => inner,
            });
            let pattern: MenuPattern = Box::new(pattern);
            (pattern, width)
        }
        PatternConfig::Checkerboard {
            width,
            height,
            even,
            odd,
        } => {
            // Same dimension rules as a border.
            BorderPattern::new(width, height).context("invalid checkerboard pattern")?;
            let pattern: MenuPattern = Box::new(Checkerboard::new(width * height, even, odd));
            (pattern, width)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_files::ScheduleConfig;
    use pretty_assertions::assert_eq;
    use slotmenu::frame::Recorder;
    use slotmenu::runner::RunStatus;
    use slotmenu::tick::ManualTicks;
    use std::collections::BTreeMap;

    fn config(pattern: PatternConfig) -> MenuConfig {
        MenuConfig {
            pattern,
            mask: BTreeMap::from([('#', Some('X')), ('.', None)]),
            reveal_per_frame: 2,
            continuously: false,
            schedule: ScheduleConfig::FixedRate(1),
        }
    }

    #[test]
    fn border_menu_reveals_everything() {
        let menu = Menu::from_config(&config(PatternConfig::Border {
            width: 3,
            height: 2,
            outer: '#',
            inner: '.',
        }))
        .unwrap();
        assert_eq!((menu.width(), menu.size()), (3, 6));

        let ticks = Arc::new(ManualTicks::new());
        let recorder = Recorder::new();
        let runner = menu.into_runner(recorder.clone(), ticks.clone());
        assert!(runner.play());
        ticks.advance(3);
        assert_eq!(
            recorder.take(),
            (0..6).map(|i| (i, Some('X'))).collect::<Vec<_>>()
        );
        ticks.advance(1);
        assert_eq!(runner.status(), RunStatus::Finished);
    }

    #[test]
    fn grid_menu_respects_mask() {
        let menu = Menu::from_config(&config(PatternConfig::Grid {
            rows: vec!["#.#".into(), "?##".into()],
            blank: Some('?'),
        }))
        .unwrap();
        assert_eq!(menu.width(), 3);

        let ticks = Arc::new(ManualTicks::new());
        let recorder = Recorder::new();
        let runner = menu.into_runner(recorder.clone(), ticks.clone());
        runner.play();
        ticks.advance(10);
        assert_eq!(
            recorder.take(),
            vec![
                (0, Some('X')),
                (1, None),
                (2, Some('X')),
                (4, Some('X')),
                (5, Some('X')),
            ]
        );
    }

    #[test]
    fn zero_per_frame_is_an_error() {
        let error = Menu::from_config(&MenuConfig {
            reveal_per_frame: 0,
            ..MenuConfig::default()
        })
        .unwrap_err();
        assert_eq!(error.to_string(), "reveal_per_frame must be at least 1");
    }

    #[test]
    fn zero_size_checkerboard_is_an_error() {
        let result = Menu::from_config(&config(PatternConfig::Checkerboard {
            width: 0,
            height: 4,
            even: '#',
            odd: '.',
        }));
        assert!(result.is_err());
    }
}
