use tally_config::TallyConfig;

use crate::cli::GlobalFlags;

/// Who a mutation is recorded against: `--as`, then `general.operator`,
/// then the login name.
#[must_use]
pub fn resolve_actor(flags: &GlobalFlags, config: &TallyConfig) -> String {
    pick_actor(
        flags.actor.as_deref(),
        config.general.operator(),
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .ok()
            .as_deref(),
    )
}

fn pick_actor(flag: Option<&str>, operator: Option<&str>, login: Option<&str>) -> String {
    [flag, operator, login]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or("unknown")
        .to_string()
}
