use std::io::Read;

use anyhow::Context;

use podium_core::enums::EntryKind;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SubmitArgs;
use crate::context::AppContext;
use crate::output::{SubmitOutcome, output};

pub async fn handle(args: &SubmitArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let (kind, raw) = payload(args)?;
    let content = if kind == EntryKind::Text && raw == "-" {
        read_stdin()?
    } else {
        raw.to_string()
    };

    let submitted = ctx.podium.submit(&args.project, kind, &content).await?;
    if !flags.quiet {
        eprintln!(
            "recorded {} as #{} for {}",
            submitted.entry_id, submitted.sequence, submitted.project_id
        );
    }

    let entry = if args.no_wait {
        None
    } else {
        ctx.podium.drain().await;
        Some(ctx.podium.get_entry(&submitted.entry_id).await?)
    };

    output(&SubmitOutcome { submitted, entry }, flags.format)
}

/// The entry kind and raw payload selected by the mutually exclusive flags.
fn payload(args: &SubmitArgs) -> anyhow::Result<(EntryKind, &str)> {
    [
        (EntryKind::Text, &args.text),
        (EntryKind::Link, &args.link),
        (EntryKind::File, &args.file),
        (EntryKind::Image, &args.image),
    ]
    .into_iter()
    .find_map(|(kind, value)| value.as_deref().map(|v| (kind, v)))
    .context("one of --text, --link, --file, or --image is required")
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read submission text from stdin")?;
    Ok(buf)
}
