//! Menu configuration files.

use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;

use slotmenu::Ticks;
use slotmenu::schedule::{BoxSchedule, Delays, FixedRate, Schedule as _};

// -------------------------------------------------------------------------------------------------

/// Description of a menu and how it is animated, as stored in a JSON file.
///
/// Every field has a default, so a file need only mention what it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuConfig {
    /// Layout of the menu, as symbols.
    pub pattern: PatternConfig,
    /// What each symbol displays as; `null` clears the slot. Symbols not listed are
    /// never written.
    pub mask: BTreeMap<char, Option<char>>,
    /// Number of slots revealed by each frame of the animation.
    pub reveal_per_frame: usize,
    /// Start the animation over whenever it ends.
    pub continuously: bool,
    /// Delays between frames.
    pub schedule: ScheduleConfig,
}

impl MenuConfig {
    /// The default menu, with `rows` rows of a chest-width border.
    pub fn with_rows(rows: u32) -> Self {
        Self {
            pattern: PatternConfig::Border {
                width: 9,
                height: rows,
                outer: '#',
                inner: '.',
            },
            ..Self::default()
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            pattern: PatternConfig::Border {
                width: 9,
                height: 3,
                outer: '#',
                inner: '.',
            },
            mask: BTreeMap::from([('#', Some('█')), ('.', Some('·'))]),
            reveal_per_frame: 3,
            continuously: false,
            schedule: ScheduleConfig::Append(vec![
                ScheduleConfig::Delays(vec![10]),
                ScheduleConfig::FixedRate(2),
            ]),
        }
    }
}

/// How a menu’s slots are assigned symbols.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum PatternConfig {
    /// Rows of text, one character per slot.
    Grid {
        #[allow(missing_docs)]
        rows: Vec<String>,
        /// Character which stands for “no symbol”.
        #[serde(default)]
        blank: Option<char>,
    },
    /// The edge of the grid versus the inside.
    #[allow(missing_docs)]
    Border {
        width: u32,
        height: u32,
        outer: char,
        inner: char,
    },
    /// Alternating symbols.
    #[allow(missing_docs)]
    Checkerboard {
        width: u32,
        height: u32,
        even: char,
        odd: char,
    },
}

/// A [`Schedule`](slotmenu::schedule::Schedule), as stored in a configuration file.
///
/// ```json
/// { "append": [{ "delays": [20] }, { "limit_steps": { "steps": 8, "schedule": { "fixed_rate": 2 } } }] }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ScheduleConfig {
    /// [`Delays::of()`]
    Delays(Vec<Ticks>),
    /// [`FixedRate::new()`]
    FixedRate(Ticks),
    /// [`Schedule::limit_steps()`](slotmenu::schedule::Schedule::limit_steps)
    #[allow(missing_docs)]
    LimitSteps {
        steps: usize,
        schedule: Box<ScheduleConfig>,
    },
    /// [`Schedule::limit_time()`](slotmenu::schedule::Schedule::limit_time)
    #[allow(missing_docs)]
    LimitTime {
        ticks: Ticks,
        schedule: Box<ScheduleConfig>,
    },
    /// Each schedule in turn, as by
    /// [`Schedule::append()`](slotmenu::schedule::Schedule::append).
    Append(Vec<ScheduleConfig>),
    /// [`Schedule::repeat()`](slotmenu::schedule::Schedule::repeat)
    Repeat(Box<ScheduleConfig>),
}

impl ScheduleConfig {
    /// Constructs the schedule this describes.
    pub fn build(&self) -> BoxSchedule {
        match self {
            Self::Delays(delays) => Box::new(Delays::of(delays.iter().copied())),
            Self::FixedRate(period) => Box::new(FixedRate::new(*period)),
            Self::LimitSteps { steps, schedule } => Box::new(schedule.build().limit_steps(*steps)),
            Self::LimitTime { ticks, schedule } => Box::new(schedule.build().limit_time(*ticks)),
            Self::Append(parts) => parts
                .iter()
                .map(Self::build)
                .reduce(|first, second| -> BoxSchedule { Box::new(first.append(second)) })
                .unwrap_or_else(|| Box::new(Delays::of([]))),
            Self::Repeat(schedule) => Box::new(schedule.build().repeat()),
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Reads a [`MenuConfig`] from `path`, or, if there is no such file, writes the default
/// configuration there and returns it.
pub fn read_or_create_menu_config(path: &Path) -> Result<MenuConfig, anyhow::Error> {
    match File::open(path) {
        Ok(file) => {
            let config = serde_json::from_reader(BufReader::new(file)).with_context(|| {
                format!(
                    "syntax error in menu configuration {path}",
                    path = path.to_string_lossy()
                )
            })?;
            log::trace!(
                "Loaded menu configuration from {path}",
                path = path.to_string_lossy()
            );
            Ok(config)
        }
        Err(open_for_read_error) if open_for_read_error.kind() == std::io::ErrorKind::NotFound => {
            log::info!(
                "No menu configuration file found; creating {path}",
                path = path.to_string_lossy()
            );
            let config = MenuConfig::default();
            let json_text = serde_json::to_string_pretty(&config)?;
            fs::write(path, json_text.as_bytes()).with_context(|| {
                format!(
                    "error while writing default menu configuration {path}",
                    path = path.to_string_lossy()
                )
            })?;
            Ok(config)
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!(
            "error while reading menu configuration {path}",
            path = path.to_string_lossy()
        ))),
    }
}

// -------------------------------------------------------------------------------------------------
