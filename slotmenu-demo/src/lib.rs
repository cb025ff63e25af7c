//! Components of the `slotmenu-demo` binary, which plays a [`slotmenu`] menu animation
//! in the terminal.
//!
//! This mostly exists as a library so that the pieces can be tested separately; it is not
//! intended for other uses.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

pub mod config_files;
pub mod logging;
pub mod menu;
pub mod render;
mod session;
pub mod tokio_ticks;

pub use config_files::read_or_create_menu_config;
pub use menu::Menu;
pub use session::{SchedulerKind, run_manual, run_tokio};
