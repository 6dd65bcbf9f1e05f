//! Feedback-adjusted review scheduling.
//!
//! One review event rescales every remaining interval of the plan, from the
//! current stage to the end, by the same factor:
//!
//! ```text
//! delta = feedback_multiplier_factor * (f + amend_factor * (f - f_prev))
//! ```
//!
//! where `f` and `f_prev` are the table multipliers of the current and the
//! previous feedback. Each rescaled interval is clamped into
//! `[min_interval, max_interval]`. The interval at the current stage is
//! rescaled once on its own and once more as the head of the remaining range.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::feedback::{resolve_feedback, FeedbackMap};
use super::plan::ReviewPlan;
use crate::error::{ConfigError, ReviewError};

/// Tunables for [`ReviewScheduler`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Raw feedback score to multiplier table
    pub feedback_map: FeedbackMap,
    /// Lower bound of a rescaled interval (days)
    pub min_interval: f64,
    /// Upper bound of a rescaled interval (days)
    pub max_interval: f64,
    /// Overall scale applied to the feedback adjustment
    pub feedback_multiplier_factor: f64,
    /// Weight of the change from the previous feedback
    pub amend_factor: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            feedback_map: FeedbackMap::default(),
            min_interval: 1.0,
            max_interval: 60.0,
            feedback_multiplier_factor: 1.0,
            amend_factor: 1.0,
        }
    }
}

impl SchedulerConfig {
    /// Check that the bounds and factors describe a usable scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.feedback_map.is_empty() {
            return Err(invalid("feedback_map", "must hold at least one multiplier"));
        }
        if self.feedback_map.multipliers().iter().any(|m| !m.is_finite()) {
            return Err(invalid("feedback_map", "multipliers must be finite"));
        }
        if !self.min_interval.is_finite() || self.min_interval <= 0.0 {
            return Err(invalid("min_interval", "must be a positive number"));
        }
        if !self.max_interval.is_finite() || self.max_interval < self.min_interval {
            return Err(invalid("max_interval", "must be a number >= min_interval"));
        }
        if !self.feedback_multiplier_factor.is_finite() {
            return Err(invalid("feedback_multiplier_factor", "must be finite"));
        }
        if !self.amend_factor.is_finite() {
            return Err(invalid("amend_factor", "must be finite"));
        }
        Ok(())
    }
}

/// Result of one review: what the caller persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    /// Adjusted plan, two fraction digits per entry
    pub new_plan: String,
    /// Stage the item moves to
    pub new_stage: usize,
    /// Date of the next review
    pub next_review_date: NaiveDate,
}

/// Response half of the collaborator contract.
pub type ReviewResponse = ReviewOutcome;

/// Request half of the collaborator contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub plan: String,
    #[serde(default)]
    pub feedback: Option<i64>,
    #[serde(default)]
    pub last_feedback: Option<i64>,
    #[serde(default)]
    pub stage: i64,
}

/// Computes adjusted plans and next review dates.
#[derive(Debug, Clone, Default)]
pub struct ReviewScheduler {
    config: SchedulerConfig,
}

impl ReviewScheduler {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails [`SchedulerConfig::validate`].
    pub fn with_config(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// `f + amend_factor * (f - f_prev)` for the given raw scores.
    pub fn adjustment(&self, feedback: Option<i64>, last_feedback: Option<i64>) -> f64 {
        let map = &self.config.feedback_map;
        let f = map.multiplier(resolve_feedback(feedback));
        let f_prev = map.multiplier(resolve_feedback(last_feedback));
        f + self.config.amend_factor * (f - f_prev)
    }

    /// Full multiplicative factor applied to each remaining interval.
    pub fn delta_factor(&self, feedback: Option<i64>, last_feedback: Option<i64>) -> f64 {
        self.config.feedback_multiplier_factor * self.adjustment(feedback, last_feedback)
    }

    fn clamp_interval(&self, value: f64) -> f64 {
        let mut value = value;
        if value < self.config.min_interval {
            value = self.config.min_interval;
        }
        if value > self.config.max_interval {
            value = self.config.max_interval;
        }
        value
    }

    fn rescale(&self, interval: f64, adjustment: f64) -> f64 {
        self.clamp_interval(interval * self.config.feedback_multiplier_factor * adjustment)
    }

    /// Rescale `plan` in place from `stage` onward.
    ///
    /// A `stage` past the end is treated as the last stage. Intervals before
    /// it are left untouched.
    pub fn adjust_plan(&self, plan: &mut ReviewPlan, stage: usize, adjustment: f64) {
        let stage = stage.min(plan.last_stage());
        let intervals = plan.intervals_mut();
        intervals[stage] = self.rescale(intervals[stage], adjustment);
        for interval in intervals.iter_mut().skip(stage) {
            *interval = self.rescale(*interval, adjustment);
        }
    }

    /// Adjust `plan` for one review and compute where the item goes next.
    ///
    /// `stage` may be out of range; it is clamped into the plan. Missing
    /// feedback counts as score 2, unknown scores use multiplier 1.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::MalformedPlan`] if `plan` does not parse.
    pub fn adjust_and_get_next(
        &self,
        plan: &str,
        feedback: Option<i64>,
        last_feedback: Option<i64>,
        stage: i64,
        today: NaiveDate,
    ) -> Result<ReviewOutcome, ReviewError> {
        let mut parsed = ReviewPlan::parse(plan)?;
        let stage = parsed.clamp_stage(stage);
        let adjustment = self.adjustment(feedback, last_feedback);

        self.adjust_plan(&mut parsed, stage, adjustment);
        let new_plan = parsed.serialize();

        let new_stage = if stage < parsed.last_stage() {
            stage + 1
        } else {
            stage
        };

        // The date follows the stored two-digit value, not the raw float.
        let stored = ReviewPlan::parse(&new_plan)?;
        let days = stored.intervals()[new_stage].trunc().max(0.0) as u64;
        let next_review_date = today
            .checked_add_days(chrono::Days::new(days))
            .unwrap_or(NaiveDate::MAX);

        tracing::debug!(
            stage,
            new_stage,
            adjustment,
            days,
            plan = %new_plan,
            "adjusted review plan"
        );

        Ok(ReviewOutcome {
            new_plan,
            new_stage,
            next_review_date,
        })
    }

    /// Serve a [`ReviewRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::MalformedPlan`] if the request plan does not parse.
    pub fn handle(
        &self,
        request: &ReviewRequest,
        today: NaiveDate,
    ) -> Result<ReviewResponse, ReviewError> {
        self.adjust_and_get_next(
            &request.plan,
            request.feedback,
            request.last_feedback,
            request.stage,
            today,
        )
    }
}

/// [`ReviewScheduler::adjust_and_get_next`] with the default configuration.
///
/// # Errors
///
/// Returns [`ReviewError::MalformedPlan`] if `plan` does not parse.
pub fn adjust_and_get_next(
    plan: &str,
    feedback: Option<i64>,
    last_feedback: Option<i64>,
    stage: i64,
    today: NaiveDate,
) -> Result<ReviewOutcome, ReviewError> {
    ReviewScheduler::new().adjust_and_get_next(plan, feedback, last_feedback, stage, today)
}

/// Same as [`adjust_and_get_next`], dated from the local calendar day.
///
/// # Errors
///
/// Returns [`ReviewError::MalformedPlan`] if `plan` does not parse.
pub fn adjust_and_get_next_today(
    plan: &str,
    feedback: Option<i64>,
    last_feedback: Option<i64>,
    stage: i64,
) -> Result<ReviewOutcome, ReviewError> {
    adjust_and_get_next(
        plan,
        feedback,
        last_feedback,
        stage,
        Local::now().date_naive(),
    )
}
