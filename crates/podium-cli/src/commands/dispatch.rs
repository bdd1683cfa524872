use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Project { action } => commands::project::handle(&action, ctx, flags).await,
        Commands::Submit(args) => commands::submit::handle(&args, ctx, flags).await,
        Commands::Timeline(args) => commands::timeline::handle(&args, ctx, flags).await,
        Commands::Entry { id } => commands::entry::handle(&id, ctx, flags).await,
        Commands::Leaderboard => commands::leaderboard::handle(ctx, flags).await,
        Commands::Sweep => commands::sweep::handle(ctx, flags).await,
    }
}
