//! Store-independent input validation.
//!
//! Every write path calls one of these functions before touching the ledger.
//! The result is a tagged [`Validation`] carrying all reasons found, not just
//! the first.

use crate::enums::EntryKind;
use crate::errors::CoreError;

/// Longest accepted team name, in characters.
pub const MAX_TEAM_NAME_CHARS: usize = 120;

/// Outcome of validating caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(Vec<String>),
}

impl Validation {
    fn from_reasons(reasons: Vec<String>) -> Self {
        if reasons.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(reasons)
        }
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Reasons for rejection; empty when valid.
    #[must_use]
    pub fn reasons(&self) -> &[String] {
        match self {
            Self::Valid => &[],
            Self::Invalid(reasons) => reasons,
        }
    }

    /// Convert into a `Result`, mapping rejection to [`CoreError::Validation`].
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` with every reason if the input was invalid.
    pub fn into_result(self) -> Result<(), CoreError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(reasons) => Err(CoreError::Validation(reasons)),
        }
    }
}

/// Size limits applied to submissions.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionLimits {
    pub max_content_bytes: usize,
}

impl Default for SubmissionLimits {
    fn default() -> Self {
        Self {
            max_content_bytes: 64 * 1024,
        }
    }
}

/// Validate a submission payload.
#[must_use]
pub fn validate_submission(
    kind: EntryKind,
    content: &str,
    limits: &SubmissionLimits,
) -> Validation {
    let mut reasons = Vec::new();
    let trimmed = content.trim();

    if trimmed.is_empty() {
        reasons.push("content must not be empty".to_string());
    }
    if content.len() > limits.max_content_bytes {
        reasons.push(format!(
            "content is {} bytes, limit is {}",
            content.len(),
            limits.max_content_bytes
        ));
    }

    match kind {
        EntryKind::Link if !trimmed.is_empty() => {
            let scheme_ok = trimmed.starts_with("http://") || trimmed.starts_with("https://");
            if !scheme_ok || trimmed.contains(char::is_whitespace) {
                reasons.push(format!("link must be a single http(s) URL, got '{trimmed}'"));
            }
        }
        EntryKind::File | EntryKind::Image if !trimmed.is_empty() => {
            if trimmed.lines().count() > 1 {
                reasons.push("file reference must be a single line".to_string());
            }
            if trimmed.split(['/', '\\']).any(|part| part == "..") {
                reasons.push("file reference must not contain '..'".to_string());
            }
        }
        _ => {}
    }

    Validation::from_reasons(reasons)
}

/// Validate the fields of a project registration.
#[must_use]
pub fn validate_registration(team_name: &str, email: &str) -> Validation {
    let mut reasons = Vec::new();

    let team = team_name.trim();
    if team.is_empty() {
        reasons.push("team name must not be empty".to_string());
    } else if team.chars().count() > MAX_TEAM_NAME_CHARS {
        reasons.push(format!(
            "team name must be at most {MAX_TEAM_NAME_CHARS} characters"
        ));
    }

    if !is_plausible_email(email.trim()) {
        reasons.push(format!("'{}' is not a valid e-mail address", email.trim()));
    }

    Validation::from_reasons(reasons)
}

fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !email.contains(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn accepts_plain_text() {
        let v = validate_submission(EntryKind::Text, "We built a thing.", &SubmissionLimits::default());
        assert!(v.is_valid());
    }

    #[rstest]
    #[case(EntryKind::Text, "")]
    #[case(EntryKind::Text, "   \n\t ")]
    #[case(EntryKind::Link, "ftp://example.com")]
    #[case(EntryKind::Link, "https://a.com https://b.com")]
    #[case(EntryKind::File, "../../etc/passwd")]
    #[case(EntryKind::Image, "a.png\nb.png")]
    fn rejects_bad_payloads(#[case] kind: EntryKind, #[case] content: &str) {
        let v = validate_submission(kind, content, &SubmissionLimits::default());
        assert!(!v.is_valid(), "{kind} {content:?} should be rejected");
    }

    #[test]
    fn rejects_oversized_content() {
        let limits = SubmissionLimits {
            max_content_bytes: 8,
        };
        let v = validate_submission(EntryKind::Text, "123456789", &limits);
        assert_eq!(v.reasons(), &["content is 9 bytes, limit is 8".to_string()]);
    }

    #[test]
    fn collects_every_reason() {
        let v = validate_registration("", "nope");
        assert_eq!(v.reasons().len(), 2);
    }

    #[rstest]
    #[case("team@example.com", true)]
    #[case("a.b@sub.example.org", true)]
    #[case("missing-at.example.com", false)]
    #[case("two@@example.com", false)]
    #[case("@example.com", false)]
    #[case("user@localhost", false)]
    #[case("user@example.", false)]
    fn email_plausibility(#[case] email: &str, #[case] ok: bool) {
        assert_eq!(validate_registration("Team", email).is_valid(), ok);
    }

    #[test]
    fn into_result_carries_reasons() {
        let err = validate_registration(" ", "x@y.z").into_result().unwrap_err();
        assert!(err.to_string().contains("team name must not be empty"));
    }
}
