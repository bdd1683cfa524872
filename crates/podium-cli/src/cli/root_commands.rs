use clap::{ArgGroup, Args, Subcommand};

use crate::cli::subcommands::ProjectCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Project registration and lookup.
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Append an entry to a project's timeline and schedule its evaluation.
    Submit(SubmitArgs),
    /// Show a project's entries, most recent first.
    Timeline(TimelineArgs),
    /// Show one entry and its evaluation status.
    Entry { id: String },
    /// Rank projects by their latest evaluated entry.
    Leaderboard,
    /// Re-evaluate flagged and stale pending entries.
    Sweep,
}

#[derive(Clone, Debug, Args)]
#[command(group(
    ArgGroup::new("payload")
        .required(true)
        .args(["text", "link", "file", "image"])
))]
pub struct SubmitArgs {
    /// Project ID.
    pub project: String,

    /// Inline text; `-` reads standard input.
    #[arg(long)]
    pub text: Option<String>,

    /// A single http(s) URL.
    #[arg(long)]
    pub link: Option<String>,

    /// File path relative to the configured content root.
    #[arg(long)]
    pub file: Option<String>,

    /// Image path relative to the configured content root.
    #[arg(long)]
    pub image: Option<String>,

    /// Return after the entry is recorded, without waiting for its evaluation.
    /// The entry is picked up by a later `podium sweep`.
    #[arg(long)]
    pub no_wait: bool,
}

#[derive(Clone, Debug, Args)]
pub struct TimelineArgs {
    /// Project ID.
    pub project: String,

    #[arg(long)]
    pub limit: Option<u32>,
}
