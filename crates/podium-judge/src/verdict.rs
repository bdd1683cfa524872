//! Raw verdicts as returned by a scoring engine, before validation.
//!
//! Language models wrap JSON in prose or code fences often enough that the
//! reply is scanned for the first balanced JSON object rather than parsed
//! whole. Range checks and key normalisation happen downstream.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;

/// Unvalidated engine output.
///
/// `scores` keeps whatever keys and values the engine produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawVerdict {
    pub scores: BTreeMap<String, Value>,
    #[serde(default)]
    pub evidence: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
}

impl RawVerdict {
    /// Build a verdict from `(key, number)` pairs.
    #[must_use]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self {
            scores: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), Value::from(v)))
                .collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_evidence(mut self, evidence: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.evidence = evidence.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_gaps(mut self, gaps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.gaps = gaps.into_iter().map(Into::into).collect();
        self
    }
}

/// Parse an engine reply into a [`RawVerdict`].
///
/// Accepts either `{"scores": {...}, "evidence": [...], "gaps": [...]}` or a
/// flat object whose non-list keys are treated as scores.
///
/// # Errors
///
/// Returns `EngineError::Malformed` if no JSON object can be found.
pub fn parse_verdict(reply: &str) -> Result<RawVerdict, EngineError> {
    let json = extract_json_object(reply)
        .ok_or_else(|| EngineError::Malformed("no JSON object in reply".into()))?;
    let value: Value = serde_json::from_str(json)
        .map_err(|e| EngineError::Malformed(format!("invalid JSON: {e}")))?;
    let Value::Object(mut object) = value else {
        return Err(EngineError::Malformed("reply is not a JSON object".into()));
    };

    let evidence = object.remove("evidence").map(string_list).unwrap_or_default();
    let gaps = object.remove("gaps").map(string_list).unwrap_or_default();

    let scores = match object.remove("scores") {
        Some(Value::Object(scores)) => scores.into_iter().collect(),
        Some(other) => {
            return Err(EngineError::Malformed(format!(
                "'scores' must be an object, got {other}"
            )));
        }
        None => object.into_iter().collect(),
    };

    Ok(RawVerdict {
        scores,
        evidence,
        gaps,
    })
}

fn string_list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    }
}

/// Slice out the first balanced `{...}` in `text`, honouring JSON strings.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
