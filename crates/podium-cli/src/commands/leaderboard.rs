use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut rows = ctx.podium.get_leaderboard().await?;
    if let Some(limit) = flags.limit {
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }
    output(&rows, flags.format)
}
