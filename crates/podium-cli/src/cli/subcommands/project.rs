use clap::Subcommand;

/// Project commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectCommands {
    /// Register a competing project.
    Register {
        #[arg(long)]
        team: String,
        #[arg(long)]
        email: String,
    },
    /// List registered projects, oldest first.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get a project by ID.
    Get { id: String },
}
