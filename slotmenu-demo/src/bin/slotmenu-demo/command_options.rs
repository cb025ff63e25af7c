//! Command line option parsing.

use std::path::PathBuf;

use clap::Parser;

use slotmenu::Ticks;
use slotmenu_demo::SchedulerKind;
use slotmenu_demo::logging::LoggingArgs;

#[derive(Clone, Debug, Parser)]
#[command(
    name = crate::TITLE, author, about, version,
    help_template = "\
{name} {version}
{about-with-newline}
{usage-heading}
    {usage}

{all-args}{after-help}",
)]
pub(crate) struct DemoArgs {
    /// Play for at most this many ticks.
    #[arg(long = "ticks", short = 'n', default_value_t = 60, value_name = "N")]
    pub(crate) ticks: Ticks,

    /// Number of rows in the default menu.
    ///
    /// Mutually exclusive with --config.
    #[arg(
        long = "rows",
        default_value_t = 3,
        value_parser = clap::value_parser!(u32).range(1..=6),
        conflicts_with = "config",
    )]
    pub(crate) rows: u32,

    /// What keeps time.
    #[arg(long = "scheduler", default_value = "manual", value_name = "mode")]
    pub(crate) scheduler: SchedulerKind,

    /// JSON file describing the menu and its animation. Created with the default menu if it
    /// does not exist.
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Length of a tick in milliseconds, when --scheduler=tokio.
    #[arg(long = "tick-millis", default_value_t = 50, value_name = "MS")]
    pub(crate) tick_millis: u64,

    #[command(flatten)]
    pub(crate) logging: LoggingArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> clap::error::Result<DemoArgs> {
        DemoArgs::try_parse_from(std::iter::once("slotmenu-demo").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let DemoArgs {
            ticks,
            rows,
            scheduler,
            config,
            tick_millis,
            logging,
        } = parse(&[]).unwrap();
        assert_eq!(
            (ticks, rows, scheduler, config, tick_millis),
            (60, 3, SchedulerKind::Manual, None, 50)
        );
        assert!(!logging.verbose && !logging.quiet);
    }

    #[test]
    fn scheduler_tokio() {
        assert_eq!(
            parse(&["--scheduler", "tokio", "-n", "5"]).unwrap().scheduler,
            SchedulerKind::Tokio
        );
    }

    #[test]
    fn scheduler_invalid() {
        assert_eq!(
            parse(&["--scheduler", "sundial"]).unwrap_err().kind(),
            ErrorKind::InvalidValue
        );
    }

    #[test]
    fn rows_conflict_with_config() {
        assert_eq!(
            parse(&["--rows", "2", "--config", "menu.json"])
                .unwrap_err()
                .kind(),
            ErrorKind::ArgumentConflict
        );
    }

    #[test]
    fn rows_out_of_range() {
        assert_eq!(
            parse(&["--rows", "7"]).unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert_eq!(
            parse(&["-v", "-q"]).unwrap_err().kind(),
            ErrorKind::ArgumentConflict
        );
    }
}
