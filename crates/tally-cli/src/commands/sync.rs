use anyhow::Context;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SyncResponse {
    synced: bool,
}

/// Handle `tly sync`.
pub async fn run(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.service
        .sync()
        .await
        .context("sync failed (is [backend] configured with a local_replica_path?)")?;
    output(&SyncResponse { synced: true }, flags.format)
}
