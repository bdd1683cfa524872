use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let view = ctx.podium.get_entry(id).await?;
    output(&view, flags.format)
}
