use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::GlobalFlags;

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    /// Draw progress bars on stderr.
    pub progress: bool,
    /// Print per-path `ok`/`failed` lines.
    pub path_lines: bool,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let is_tty = std::io::stderr().is_terminal();

    let _ = UI_PREFS.set(UiPrefs {
        progress: is_tty && !flags.quiet,
        path_lines: !flags.quiet,
    });
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        progress: false,
        path_lines: true,
    })
}
