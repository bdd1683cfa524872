//! The fixed scoring rubric.
//!
//! Six sub-score dimensions, each in `[0, 10]`, combine into a `[0, 100]`
//! final score with fixed weights:
//!
//! | dimension              | weight |
//! |------------------------|--------|
//! | `clarity`              | 0.15   |
//! | `problem_value`        | 0.20   |
//! | `feasibility_signal`   | 0.15   |
//! | `originality`          | 0.15   |
//! | `impact_convert`       | 0.20   |
//! | `submission_readiness` | 0.15   |
//!
//! `final_score = 10 × Σ weight × sub_score`, rounded to one decimal.

use std::fmt;

use crate::entities::Scores;

pub const SUB_SCORE_MIN: f64 = 0.0;
pub const SUB_SCORE_MAX: f64 = 10.0;
pub const FINAL_SCORE_MIN: f64 = 0.0;
pub const FINAL_SCORE_MAX: f64 = 100.0;

/// One scored dimension of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Clarity,
    ProblemValue,
    FeasibilitySignal,
    Originality,
    ImpactConvert,
    SubmissionReadiness,
}

impl Dimension {
    pub const ALL: [Self; 6] = [
        Self::Clarity,
        Self::ProblemValue,
        Self::FeasibilitySignal,
        Self::Originality,
        Self::ImpactConvert,
        Self::SubmissionReadiness,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clarity => "clarity",
            Self::ProblemValue => "problem_value",
            Self::FeasibilitySignal => "feasibility_signal",
            Self::Originality => "originality",
            Self::ImpactConvert => "impact_convert",
            Self::SubmissionReadiness => "submission_readiness",
        }
    }

    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::ProblemValue | Self::ImpactConvert => 0.20,
            Self::Clarity
            | Self::FeasibilitySignal
            | Self::Originality
            | Self::SubmissionReadiness => 0.15,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[must_use]
pub fn sub_score_in_range(value: f64) -> bool {
    value.is_finite() && (SUB_SCORE_MIN..=SUB_SCORE_MAX).contains(&value)
}

#[must_use]
pub fn final_score_in_range(value: f64) -> bool {
    value.is_finite() && (FINAL_SCORE_MIN..=FINAL_SCORE_MAX).contains(&value)
}

impl Scores {
    /// Sub-score for a single dimension.
    #[must_use]
    pub const fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Clarity => self.clarity,
            Dimension::ProblemValue => self.problem_value,
            Dimension::FeasibilitySignal => self.feasibility_signal,
            Dimension::Originality => self.originality,
            Dimension::ImpactConvert => self.impact_convert,
            Dimension::SubmissionReadiness => self.submission_readiness,
        }
    }

    pub const fn set(&mut self, dimension: Dimension, value: f64) {
        match dimension {
            Dimension::Clarity => self.clarity = value,
            Dimension::ProblemValue => self.problem_value = value,
            Dimension::FeasibilitySignal => self.feasibility_signal = value,
            Dimension::Originality => self.originality = value,
            Dimension::ImpactConvert => self.impact_convert = value,
            Dimension::SubmissionReadiness => self.submission_readiness = value,
        }
    }

    /// The weighted final score implied by the current sub-scores.
    #[must_use]
    pub fn weighted_final(&self) -> f64 {
        let sum: f64 = Dimension::ALL
            .into_iter()
            .map(|d| d.weight() * self.get(d))
            .sum();
        round1((sum * 10.0).clamp(FINAL_SCORE_MIN, FINAL_SCORE_MAX))
    }

    /// Build scores from sub-scores, computing `final_score` with the fixed weights.
    #[must_use]
    pub fn from_sub_scores(sub_scores: [f64; 6]) -> Self {
        let mut scores = Self::zero();
        for (dimension, value) in Dimension::ALL.into_iter().zip(sub_scores) {
            scores.set(dimension, value);
        }
        scores.final_score = scores.weighted_final();
        scores
    }

    /// Whether every sub-score and the final score lie in their ranges.
    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        Dimension::ALL
            .into_iter()
            .all(|d| sub_score_in_range(self.get(d)))
            && final_score_in_range(self.final_score)
    }
}
