use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProjectCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    action: &ProjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProjectCommands::Register { team, email } => {
            let project = ctx.podium.register_project(team, email).await?;
            output(&project, flags.format)
        }
        ProjectCommands::List { limit } => {
            let limit = effective_limit(*limit, flags.limit, ctx.config.general.default_limit);
            let projects = ctx.podium.list_projects(limit).await?;
            output(&projects, flags.format)
        }
        ProjectCommands::Get { id } => {
            let project = ctx.podium.get_project(id).await?;
            output(&project, flags.format)
        }
    }
}
