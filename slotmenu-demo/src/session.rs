//! Playing a [`Menu`] in the terminal, driven by one of the available tick sources.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;

use slotmenu::Ticks;
use slotmenu::registry::RunnerRegistry;
use slotmenu::runner::{RunStatus, Runner};
use slotmenu::tick::{ManualTicks, TickProvider};

use crate::menu::{Menu, MenuFrame};
use crate::render::SlotGrid;
use crate::tokio_ticks::{MIN_TICK, TokioTicks};

/// Which [`TickProvider`] drives the menu. Chosen once, at startup.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum, strum::EnumString, strum::IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
#[expect(clippy::exhaustive_enums)]
pub enum SchedulerKind {
    /// Ticks are counted by the demo itself, as fast as possible.
    Manual,
    /// Ticks are real time, kept by Tokio timers.
    Tokio,
}

/// Key under which the demo registers its one menu.
const CONSOLE: &str = "console";

/// State shared by both ways of running a menu.
struct Session<'a> {
    registry: RunnerRegistry<&'static str>,
    grid: SlotGrid,
    runner: Runner<MenuFrame>,
    last_drawn: String,
    out: &'a mut dyn io::Write,
}

impl<'a> Session<'a> {
    fn new(menu: Menu, ticks: Arc<dyn TickProvider>, out: &'a mut dyn io::Write) -> Self {
        let grid = SlotGrid::new(menu.width(), menu.size());
        let runner = menu.into_runner(grid.clone(), ticks);
        let last_drawn = grid.render();
        Self {
            registry: RunnerRegistry::new(),
            grid,
            runner,
            last_drawn,
            out,
        }
    }

    /// Draws the grid if it has changed since it was last drawn.
    fn draw(&mut self, tick: Ticks) -> Result<(), io::Error> {
        let drawing = self.grid.render();
        if drawing != self.last_drawn {
            writeln!(self.out, "tick {tick}:\n{drawing}\n")?;
            self.last_drawn = drawing;
        }
        Ok(())
    }
}

/// Plays `menu` for at most `max_ticks` ticks counted by a [`ManualTicks`], writing the
/// grid to `out` whenever it changes.
///
/// Returns the runner’s status at the end. A step failure is returned as an error.
pub fn run_manual(
    menu: Menu,
    max_ticks: Ticks,
    out: &mut dyn io::Write,
) -> Result<RunStatus, anyhow::Error> {
    let ticks = Arc::new(ManualTicks::new());
    let mut session = Session::new(menu, ticks.clone(), out);
    let _registration = session
        .registry
        .register(CONSOLE, session.runner.handle());

    if !session.runner.play() {
        log::warn!("menu has nothing to play");
    }
    for tick in 1..=max_ticks {
        if let Some(error) = ticks.tick().into_iter().next() {
            return Err(anyhow::Error::new(error).context(format!("menu failed at tick {tick}")));
        }
        session.draw(tick)?;
        if session.runner.status() == RunStatus::Finished {
            break;
        }
    }
    Ok(session.runner.status())
}

/// Plays `menu` for at most `max_ticks` ticks of real time, each `tick_length` long,
/// writing the grid to `out` whenever it changes.
///
/// Must be called within a Tokio runtime with timers enabled. Step failures are logged by
/// the tick provider and leave the runner [`Paused`](RunStatus::Paused).
pub async fn run_tokio(
    menu: Menu,
    max_ticks: Ticks,
    tick_length: Duration,
    out: &mut dyn io::Write,
) -> Result<RunStatus, anyhow::Error> {
    let tick_length = tick_length.max(MIN_TICK);
    let ticks = Arc::new(TokioTicks::new(tokio::runtime::Handle::current(), tick_length));
    let mut session = Session::new(menu, ticks, out);
    let registration = session
        .registry
        .register(CONSOLE, session.runner.handle());

    if !session.runner.play() {
        log::warn!("menu has nothing to play");
    }
    let mut interval = tokio::time::interval(tick_length);
    // The first tick of an interval completes immediately.
    interval.tick().await;
    for tick in 1..=max_ticks {
        interval.tick().await;
        session.draw(tick).context("failed to draw menu")?;
        match session.runner.status() {
            RunStatus::Finished | RunStatus::Paused => break,
            RunStatus::NotStarted | RunStatus::Running => {}
        }
    }
    let status = session.runner.status();
    // Stops the runner if it is still going, so no task touches the grid after this.
    registration.dispose();
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_files::{MenuConfig, PatternConfig, ScheduleConfig};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::str::FromStr as _;

    fn small_menu() -> Menu {
        Menu::from_config(&MenuConfig {
            pattern: PatternConfig::Border {
                width: 3,
                height: 2,
                outer: '#',
                inner: '.',
            },
            mask: BTreeMap::from([('#', Some('#'))]),
            reveal_per_frame: 3,
            continuously: false,
            schedule: ScheduleConfig::FixedRate(2),
        })
        .unwrap()
    }

    #[test]
    fn manual_draws_changes() {
        let mut out = Vec::new();
        let status = run_manual(small_menu(), 100, &mut out).unwrap();
        assert_eq!(status, RunStatus::Finished);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "tick 2:\n###\n   \n\ntick 4:\n###\n###\n\n"
        );
    }

    #[test]
    fn manual_stops_at_tick_limit() {
        let mut out = Vec::new();
        let status = run_manual(small_menu(), 3, &mut out).unwrap();
        assert_eq!(status, RunStatus::Running);
        assert_eq!(String::from_utf8(out).unwrap(), "tick 2:\n###\n   \n\n");
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_finishes() {
        let mut out = Vec::new();
        let status = run_tokio(small_menu(), 100, Duration::from_millis(10), &mut out)
            .await
            .unwrap();
        assert_eq!(status, RunStatus::Finished);
        assert!(String::from_utf8(out).unwrap().ends_with("###\n###\n\n"));
    }

    #[test]
    fn scheduler_kind_names() {
        assert_eq!(SchedulerKind::from_str("tokio"), Ok(SchedulerKind::Tokio));
        assert_eq!(<&'static str>::from(SchedulerKind::Manual), "manual");
    }
}
