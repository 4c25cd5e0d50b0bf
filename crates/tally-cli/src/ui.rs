use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::GlobalFlags;

/// Narrower terminals get no shrinking; tables just wrap.
const MIN_TERM_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiPrefs {
    pub table_color: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

fn resolve(flags: &GlobalFlags, stdout_tty: bool, no_color: bool, columns: Option<&str>) -> UiPrefs {
    UiPrefs {
        table_color: stdout_tty && flags.is_table() && !flags.quiet && !no_color,
        term_width: columns
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|width| *width >= MIN_TERM_WIDTH),
    }
}

pub fn init(flags: &GlobalFlags) {
    let columns = std::env::var("COLUMNS").ok();
    let prefs = resolve(
        flags,
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        columns.as_deref(),
    );
    let _ = UI_PREFS.set(prefs);
}

/// Plain, unbounded tables until [`init`] runs.
#[must_use]
pub fn prefs() -> UiPrefs {
    UI_PREFS.get().copied().unwrap_or_default()
}
