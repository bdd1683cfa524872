//! Table layouts for the responses the CLI prints.

use serde::Serialize;

use podium_core::entities::Project;
use podium_core::responses::{
    EntryStatus, EntryView, LeaderboardRow, SubmitResponse, TimelineResponse,
};
use podium_pipeline::SweepReport;

/// A response that can be printed as rows under fixed headers.
pub trait TableView {
    const HEADERS: &'static [&'static str];

    fn rows(&self) -> Vec<Vec<String>>;
}

/// What `podium submit` prints: the acknowledgement, plus the entry once
/// its evaluation has settled.
#[derive(Debug, Serialize)]
pub struct SubmitOutcome {
    pub submitted: SubmitResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntryView>,
}

const PREVIEW_CHARS: usize = 48;

fn preview(content: &str) -> String {
    let line = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if line.chars().count() > PREVIEW_CHARS {
        let mut cut: String = line.chars().take(PREVIEW_CHARS - 1).collect();
        cut.push('…');
        cut
    } else {
        line.to_string()
    }
}

fn score_cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

fn status_cell(view: &EntryView) -> &'static str {
    match view.status {
        EntryStatus::Evaluated if view.entry.evaluation.as_ref().is_some_and(|e| e.degraded) => {
            "degraded"
        }
        EntryStatus::Evaluated => "evaluated",
        EntryStatus::Pending if view.flagged_for_reprocessing => "flagged",
        EntryStatus::Pending => "pending",
    }
}

fn entry_row(view: &EntryView) -> Vec<String> {
    let evaluation = view.entry.evaluation.as_ref();
    vec![
        view.entry.sequence.to_string(),
        view.entry.id.clone(),
        view.entry.kind.to_string(),
        status_cell(view).to_string(),
        score_cell(view.entry.final_score()),
        score_cell(evaluation.map(|e| e.delta.total_change)),
        preview(&view.entry.content),
    ]
}

const ENTRY_HEADERS: &[&str] = &["seq", "id", "type", "status", "final", "delta", "content"];

impl TableView for EntryView {
    const HEADERS: &'static [&'static str] = ENTRY_HEADERS;

    fn rows(&self) -> Vec<Vec<String>> {
        vec![entry_row(self)]
    }
}

impl TableView for TimelineResponse {
    const HEADERS: &'static [&'static str] = ENTRY_HEADERS;

    fn rows(&self) -> Vec<Vec<String>> {
        self.entries.iter().map(entry_row).collect()
    }
}

impl TableView for SubmitOutcome {
    const HEADERS: &'static [&'static str] = ENTRY_HEADERS;

    fn rows(&self) -> Vec<Vec<String>> {
        match &self.entry {
            Some(view) => vec![entry_row(view)],
            None => vec![vec![
                self.submitted.sequence.to_string(),
                self.submitted.entry_id.clone(),
                "-".to_string(),
                "pending".to_string(),
            ]],
        }
    }
}

const PROJECT_HEADERS: &[&str] = &["id", "team", "email", "status", "created_at"];

fn project_row(project: &Project) -> Vec<String> {
    vec![
        project.id.clone(),
        project.team_name.clone(),
        project.email.clone(),
        project.status.to_string(),
        project.created_at.format("%Y-%m-%d %H:%M").to_string(),
    ]
}

impl TableView for Project {
    const HEADERS: &'static [&'static str] = PROJECT_HEADERS;

    fn rows(&self) -> Vec<Vec<String>> {
        vec![project_row(self)]
    }
}

impl TableView for Vec<Project> {
    const HEADERS: &'static [&'static str] = PROJECT_HEADERS;

    fn rows(&self) -> Vec<Vec<String>> {
        self.iter().map(project_row).collect()
    }
}

impl TableView for Vec<LeaderboardRow> {
    const HEADERS: &'static [&'static str] = &["rank", "team", "project", "final", "seq", "state"];

    fn rows(&self) -> Vec<Vec<String>> {
        self.iter()
            .map(|row| {
                let state = if !row.evaluated {
                    "pending"
                } else if row.degraded {
                    "degraded"
                } else {
                    "evaluated"
                };
                vec![
                    row.rank.to_string(),
                    row.team_name.clone(),
                    row.project_id.clone(),
                    score_cell(row.evaluated.then_some(row.scores.final_score)),
                    row.last_evaluated_sequence
                        .map_or_else(|| "-".to_string(), |s| s.to_string()),
                    state.to_string(),
                ]
            })
            .collect()
    }
}

impl TableView for SweepReport {
    const HEADERS: &'static [&'static str] = &["examined", "evaluated", "still_failed"];

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.examined.to_string(),
            self.evaluated.to_string(),
            self.still_failed.to_string(),
        ]]
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::preview;

    #[test]
    fn preview_uses_first_non_blank_line() {
        assert_eq!(preview("\n\n  # Title\nbody"), "  # Title");
    }

    #[test]
    fn preview_clips_long_lines() {
        let clipped = preview(&"a".repeat(100));
        assert_eq!(clipped.chars().count(), 48);
        assert!(clipped.ends_with('…'));
    }
}
