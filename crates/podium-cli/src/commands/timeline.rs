use crate::cli::GlobalFlags;
use crate::cli::root_commands::TimelineArgs;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(args: &TimelineArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut timeline = ctx.podium.get_timeline(&args.project).await?;
    let limit = effective_limit(args.limit, flags.limit, ctx.config.general.default_limit);
    timeline
        .entries
        .truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    output(&timeline, flags.format)
}
