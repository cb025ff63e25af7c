//! Logging to stderr.

use anyhow::Context as _;

/// A [`clap::Args`] struct for options controlling log output to stderr.
#[derive(Clone, Debug, Default, clap::Args)]
#[expect(clippy::module_name_repetitions)]
pub struct LoggingArgs {
    /// Additional logging to stderr, including every frame applied.
    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,

    /// Remove timestamps from logs so that they are closer to deterministic.
    ///
    /// This option is intended for internal tests only.
    #[arg(long = "simplify-log-format", hide = true)]
    pub simplify_log_format: bool,

    /// Do not log to stderr at all.
    #[arg(long = "quiet", short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Install a [`log`] global logger based on user-provided `options`.
pub fn install(options: &LoggingArgs) -> Result<(), anyhow::Error> {
    use log::LevelFilter::{Debug, Error, Off, Trace};

    let &LoggingArgs {
        verbose,
        simplify_log_format,
        quiet,
    } = options;

    let (max_level, stderr_logger) = if quiet {
        (Off, None)
    } else {
        let logger = *simplelog::WriteLogger::new(
            match verbose {
                false => Debug,
                true => Trace,
            },
            // Note: This has no target filters because `DemoLogger` calls
            // `slotmenu::util::log::standard_filter` to do it.
            simplelog::ConfigBuilder::new()
                .set_target_level(Off)
                .set_location_level(Off)
                .set_time_level(if simplify_log_format { Off } else { Error })
                .build(),
            std::io::stderr(),
        );
        (simplelog::SharedLogger::level(&logger), Some(logger))
    };

    log::set_boxed_logger(Box::new(DemoLogger { stderr_logger }))
        .context("failed to initialize logging")?;
    log::set_max_level(max_level);
    Ok(())
}

/// [`log::Log`] implementation that [`install()`] registers globally.
struct DemoLogger {
    stderr_logger: Option<simplelog::WriteLogger<std::io::Stderr>>,
}

impl log::Log for DemoLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        slotmenu::util::log::standard_filter(metadata)
            && self
                .stderr_logger
                .as_ref()
                .is_some_and(|l| l.enabled(metadata))
    }

    fn log(&self, record: &log::Record<'_>) {
        if !slotmenu::util::log::standard_filter(record.metadata()) {
            return;
        }
        if let Some(stderr_logger) = &self.stderr_logger {
            stderr_logger.log(record);
        }
    }

    fn flush(&self) {
        if let Some(stderr_logger) = &self.stderr_logger {
            stderr_logger.flush();
        }
    }
}
