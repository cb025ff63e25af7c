//! Binary which plays an animated menu in the terminal.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

use std::time::Duration;

use anyhow::Context as _;
use clap::Parser as _;

use slotmenu_demo::config_files::MenuConfig;
use slotmenu_demo::{Menu, SchedulerKind, logging, read_or_create_menu_config};

mod command_options;
use command_options::DemoArgs;

static TITLE: &str = "slotmenu demo";

fn main() -> Result<(), anyhow::Error> {
    // Destructure as a check that we're using all the args
    let DemoArgs {
        ticks,
        rows,
        scheduler,
        config,
        tick_millis,
        logging: logging_args,
    } = DemoArgs::parse();

    logging::install(&logging_args)?;

    let config = match config {
        Some(path) => read_or_create_menu_config(&path)?,
        None => MenuConfig::with_rows(rows),
    };
    let menu = Menu::from_config(&config).context("invalid menu configuration")?;
    log::debug!("{menu:?}");

    let stdout = &mut std::io::stdout().lock();
    let status = match scheduler {
        SchedulerKind::Manual => slotmenu_demo::run_manual(menu, ticks, stdout)?,
        SchedulerKind::Tokio => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_time()
                .build()
                .context("failed to start Tokio runtime")?;
            runtime.block_on(slotmenu_demo::run_tokio(
                menu,
                ticks,
                Duration::from_millis(tick_millis),
                stdout,
            ))?
        }
    };
    log::info!(
        "{scheduler} scheduler stopped with menu {status:?}",
        scheduler = <&'static str>::from(scheduler)
    );
    Ok(())
}
