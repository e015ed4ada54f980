//! Terminal styling: semantic colors and tables.

use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};

pub mod colors;
pub mod table;

/// Global flag to track if colors are disabled. Colors stay off until [`init`] runs.
static NO_COLOR: AtomicBool = AtomicBool::new(true);

/// Disables colors when asked to, when `NO_COLOR` is set, or when stdout is
/// not a terminal.
pub fn init(no_color_flag: bool) {
    let disabled =
        no_color_flag || std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal();
    NO_COLOR.store(disabled, Ordering::SeqCst);
}

/// Checks if colors are disabled.
pub fn no_color() -> bool {
    NO_COLOR.load(Ordering::SeqCst)
}
