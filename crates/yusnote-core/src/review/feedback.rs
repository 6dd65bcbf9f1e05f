//! Feedback scores and their interval multipliers.
//!
//! Two fallbacks apply, at two different points:
//! - a missing score is read as [`DEFAULT_FEEDBACK`] before lookup;
//! - a score with no entry in the table maps to [`UNMAPPED_MULTIPLIER`].

use serde::{Deserialize, Serialize};

/// Score assumed when the caller supplies none ("generally remembered").
pub const DEFAULT_FEEDBACK: i64 = 2;

/// Multiplier for a raw score that has no table entry.
pub const UNMAPPED_MULTIPLIER: f64 = 1.0;

/// Typed view of the raw recall scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLevel {
    /// Could not recall the note.
    Forgot,
    /// Recalled with difficulty.
    Vague,
    /// Generally remembered.
    Remembered,
    /// Recalled effortlessly.
    Mastered,
}

impl FeedbackLevel {
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(Self::Forgot),
            1 => Some(Self::Vague),
            2 => Some(Self::Remembered),
            3 => Some(Self::Mastered),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i64 {
        match self {
            Self::Forgot => 0,
            Self::Vague => 1,
            Self::Remembered => 2,
            Self::Mastered => 3,
        }
    }
}

impl From<FeedbackLevel> for i64 {
    fn from(level: FeedbackLevel) -> i64 {
        level.as_raw()
    }
}

/// Apply the missing-score default.
pub fn resolve_feedback(raw: Option<i64>) -> i64 {
    raw.unwrap_or(DEFAULT_FEEDBACK)
}

/// Lookup table from raw score to interval multiplier, indexed by score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackMap {
    multipliers: Vec<f64>,
}

impl Default for FeedbackMap {
    fn default() -> Self {
        Self {
            multipliers: vec![0.5, 0.7, 1.0, 1.2],
        }
    }
}

impl FeedbackMap {
    pub fn new(multipliers: Vec<f64>) -> Self {
        Self { multipliers }
    }

    pub fn multipliers(&self) -> &[f64] {
        &self.multipliers
    }

    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }

    /// Multiplier for `raw`, or [`UNMAPPED_MULTIPLIER`] when the score has no entry.
    pub fn multiplier(&self, raw: i64) -> f64 {
        usize::try_from(raw)
            .ok()
            .and_then(|idx| self.multipliers.get(idx))
            .copied()
            .unwrap_or(UNMAPPED_MULTIPLIER)
    }
}
