//! Interval plan parsing and serialization.
//!
//! A plan is stored by the caller as a comma-joined list of day counts such as
//! `"1,3,7,30"`. After one pass through the scheduler every entry carries
//! exactly two fraction digits (`"1.00,3.00,7.00,30.00"`).

use std::fmt;
use std::str::FromStr;

use crate::error::ReviewError;

/// Plan given to a freshly created user record.
pub const DEFAULT_REVIEW_PLAN: &str = "1,3,7,30";

/// Ordered, non-empty sequence of review intervals in days.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewPlan {
    intervals: Vec<f64>,
}

impl ReviewPlan {
    /// Parse a comma-joined plan string.
    ///
    /// Surrounding whitespace on each token is ignored. An empty string, an
    /// empty token, or a token that is not a finite number is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::MalformedPlan`] when any token fails to parse.
    pub fn parse(plan: &str) -> Result<Self, ReviewError> {
        if plan.trim().is_empty() {
            return Err(ReviewError::malformed(plan, "plan is empty"));
        }

        let intervals = plan
            .split(',')
            .map(|token| {
                let token = token.trim();
                let value = token.parse::<f64>().map_err(|_| {
                    ReviewError::malformed(plan, format!("token '{token}' is not a number"))
                })?;
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(ReviewError::malformed(
                        plan,
                        format!("token '{token}' is not a finite number"),
                    ))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { intervals })
    }

    /// Build a plan from already-parsed intervals.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::MalformedPlan`] when `intervals` is empty or holds
    /// a non-finite value.
    pub fn from_intervals(intervals: Vec<f64>) -> Result<Self, ReviewError> {
        if intervals.is_empty() {
            return Err(ReviewError::malformed("", "plan is empty"));
        }
        if let Some(bad) = intervals.iter().find(|v| !v.is_finite()) {
            let rendered = intervals
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",");
            return Err(ReviewError::malformed(
                &rendered,
                format!("interval {bad} is not a finite number"),
            ));
        }
        Ok(Self { intervals })
    }

    pub fn intervals(&self) -> &[f64] {
        &self.intervals
    }

    pub(crate) fn intervals_mut(&mut self) -> &mut [f64] {
        &mut self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Always false for a parsed plan; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Index of the terminal stage.
    pub fn last_stage(&self) -> usize {
        self.intervals.len() - 1
    }

    /// Clamp an arbitrary stage into `[0, len - 1]`.
    pub fn clamp_stage(&self, stage: i64) -> usize {
        let last = self.last_stage();
        if stage < 0 {
            0
        } else {
            usize::try_from(stage).map_or(last, |s| s.min(last))
        }
    }

    /// Serialized form with two fraction digits per entry.
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

/// Render a single interval the way plans are stored.
pub fn format_interval(value: f64) -> String {
    format!("{value:.2}")
}

impl fmt::Display for ReviewPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.intervals.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{value:.2}")?;
        }
        Ok(())
    }
}

impl FromStr for ReviewPlan {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
