//! Validation and repair of raw engine verdicts.
//!
//! Keys are normalised (case, `-` and spaces), numeric strings are accepted,
//! and a missing `final_score` is recomputed with the fixed weights. Any
//! remaining problem rejects the whole verdict.

use serde_json::Value;

use podium_core::entities::Scores;
use podium_core::rubric::{Dimension, final_score_in_range, round1, sub_score_in_range};
use podium_judge::RawVerdict;

/// Longest evidence or gap list kept from a verdict.
pub const MAX_NOTES: usize = 10;

/// A verdict that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub scores: Scores,
    pub evidence: Vec<String>,
    pub gaps: Vec<String>,
}

fn normalise_key(key: &str) -> String {
    key.trim().to_lowercase().replace(['-', ' '], "_")
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn clean_notes(notes: &[String]) -> Vec<String> {
    notes
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .take(MAX_NOTES)
        .map(String::from)
        .collect()
}

/// Check every sub-score and produce a complete [`Verdict`].
///
/// # Errors
///
/// Returns a description of the first problem found.
pub fn validate(raw: &RawVerdict) -> Result<Verdict, String> {
    let lookup = |name: &str| {
        raw.scores
            .iter()
            .find(|(key, _)| normalise_key(key) == name)
            .map(|(_, value)| value)
    };

    let mut scores = Scores::zero();
    for dimension in Dimension::ALL {
        let value = lookup(dimension.as_str())
            .ok_or_else(|| format!("missing sub-score '{dimension}'"))?;
        let number =
            as_number(value).ok_or_else(|| format!("sub-score '{dimension}' is not numeric: {value}"))?;
        if !sub_score_in_range(number) {
            return Err(format!("sub-score '{dimension}' out of range: {number}"));
        }
        scores.set(dimension, number);
    }

    scores.final_score = match lookup("final_score") {
        None | Some(Value::Null) => scores.weighted_final(),
        Some(value) => {
            let number =
                as_number(value).ok_or_else(|| format!("final_score is not numeric: {value}"))?;
            if !final_score_in_range(number) {
                return Err(format!("final_score out of range: {number}"));
            }
            round1(number)
        }
    };

    Ok(Verdict {
        scores,
        evidence: clean_notes(&raw.evidence),
        gaps: clean_notes(&raw.gaps),
    })
}
