//! Prompt context assembly.
//!
//! The current entry comes first, followed by up to N prior entries of the
//! same project, nearest first. The result is cut at a fixed character
//! count, so identical inputs always yield an identical prompt.

use std::fmt::Write as _;

use podium_core::entities::TimelineEntry;
use podium_judge::ContentStore;

pub const TRUNCATION_MARKER: &str = "\n[context truncated]";

/// Text used in place of a reference the content store could not resolve.
#[must_use]
pub fn placeholder(entry: &TimelineEntry) -> String {
    format!("[{} '{}' could not be loaded]", entry.kind, entry.content.trim())
}

/// Resolve the body of the entry being scored.
pub async fn resolve_body<C: ContentStore>(entry: &TimelineEntry, content: &C) -> String {
    if !entry.kind.is_reference() {
        return entry.content.clone();
    }
    match content.resolve(entry.kind, &entry.content).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(entry_id = %entry.id, error = %e, "content unavailable, using placeholder");
            placeholder(entry)
        }
    }
}

/// Build the prompt from an already-resolved body and prior entries.
///
/// `priors` must be ordered nearest first.
#[must_use]
pub fn assemble(entry: &TimelineEntry, body: &str, priors: &[TimelineEntry], limit: usize) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Latest submission (#{}, {}):\n{}",
        entry.sequence,
        entry.kind,
        body.trim()
    );

    if !priors.is_empty() {
        prompt.push_str("\nEarlier submissions, most recent first:\n");
        for prior in priors {
            let score = prior
                .final_score()
                .map_or_else(|| "not scored".to_string(), |s| format!("scored {s}"));
            let _ = writeln!(
                prompt,
                "- #{} ({}, {score}): {}",
                prior.sequence,
                prior.kind,
                prior.content.trim()
            );
        }
    }

    truncate_chars(prompt, limit)
}

/// Cut `text` to at most `limit` characters, marking the cut.
#[must_use]
pub fn truncate_chars(text: String, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text;
    }
    let marker_len = TRUNCATION_MARKER.chars().count();
    if limit <= marker_len {
        return text.chars().take(limit).collect();
    }
    let mut cut: String = text.chars().take(limit - marker_len).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use podium_core::enums::{EntryKind, EvaluationState};
    use pretty_assertions::assert_eq;

    fn entry(sequence: i64, kind: EntryKind, content: &str) -> TimelineEntry {
        TimelineEntry {
            id: format!("ent-{sequence:08x}"),
            project_id: "prj-00000001".into(),
            sequence,
            kind,
            content: content.into(),
            evaluation: None,
            state: EvaluationState::Pending,
            attempts: 0,
            last_error: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn current_entry_comes_first() {
        let current = entry(3, EntryKind::Text, "v3");
        let priors = vec![entry(2, EntryKind::Link, "https://x.io"), entry(1, EntryKind::Text, "v1")];
        let prompt = assemble(&current, "v3", &priors, 10_000);

        let latest = prompt.find("Latest submission (#3, text)").unwrap();
        let second = prompt.find("#2 (link, not scored): https://x.io").unwrap();
        let first = prompt.find("#1 (text, not scored): v1").unwrap();
        assert!(latest < second && second < first);
    }

    #[test]
    fn truncation_is_deterministic_and_bounded() {
        let current = entry(1, EntryKind::Text, "");
        let body = "é".repeat(500);
        let a = assemble(&current, &body, &[], 100);
        let b = assemble(&current, &body, &[], 100);
        assert_eq!(a, b);
        assert_eq!(a.chars().count(), 100);
        assert!(a.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_chars("abc".into(), 3), "abc");
        assert_eq!(truncate_chars("abcdef".into(), 2), "ab");
    }

    #[test]
    fn placeholder_names_the_reference() {
        let e = entry(1, EntryKind::File, " deck.pdf ");
        assert_eq!(placeholder(&e), "[file 'deck.pdf' could not be loaded]");
    }
}
