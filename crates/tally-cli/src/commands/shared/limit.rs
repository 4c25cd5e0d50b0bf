/// Row cap for list commands. A per-command cap beats `--limit`, which beats
/// the configured default.
#[must_use]
pub fn effective_limit(command: Option<u32>, global: Option<u32>, default: u32) -> u32 {
    command.or(global).unwrap_or(default)
}
