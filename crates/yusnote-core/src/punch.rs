//! Review completion ("punch") for a note or collected item.
//!
//! A punch ties the two halves together: the user's plan is rescaled by the
//! scheduler, the user's review history counts the event, and the item moves
//! to its next stage and review date. Storage and locking stay with the caller;
//! everything here works on in-memory copies.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{HistoryError, Result};
use crate::history::ActivityHistory;
use crate::review::{ReviewOutcome, ReviewScheduler, DEFAULT_REVIEW_PLAN};

/// Review fields carried by a note or a collected item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    #[serde(default)]
    pub stage: i64,
    #[serde(default)]
    pub last_feedback: Option<i64>,
    #[serde(default)]
    pub review_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_review_date: Option<NaiveDate>,
}

/// Review fields carried by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserReviewProfile {
    #[serde(default = "default_plan")]
    pub review_plan: String,
    #[serde(default)]
    pub review_history: ActivityHistory,
    #[serde(default)]
    pub publish_history: ActivityHistory,
}

fn default_plan() -> String {
    DEFAULT_REVIEW_PLAN.to_string()
}

impl Default for UserReviewProfile {
    fn default() -> Self {
        Self {
            review_plan: default_plan(),
            review_history: ActivityHistory::default(),
            publish_history: ActivityHistory::default(),
        }
    }
}

impl UserReviewProfile {
    /// Profile starting from a custom plan.
    pub fn with_plan(plan: impl Into<String>) -> Self {
        Self {
            review_plan: plan.into(),
            ..Self::default()
        }
    }
}

/// What the user submitted when finishing a review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PunchRequest {
    #[serde(default)]
    pub feedback: Option<i64>,
    /// Send the item back to stage 0 instead of advancing it.
    #[serde(default)]
    pub reset: bool,
}

/// Result of a punch, after it has been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchOutcome {
    pub review: ReviewOutcome,
    /// Stage stored on the item (0 after a reset).
    pub stage: i64,
}

/// Apply one completed review.
///
/// The scheduler runs on the user's plan with the item's stage and previous
/// feedback. On success the plan, the review history and the item state are
/// all updated; on error none of them is touched.
///
/// # Errors
///
/// Returns an error if the user's plan or review history is malformed.
pub fn punch(
    scheduler: &ReviewScheduler,
    profile: &mut UserReviewProfile,
    state: &mut ReviewState,
    request: &PunchRequest,
    now: NaiveDateTime,
    retention_days: i64,
) -> Result<PunchOutcome> {
    let today = now.date();
    let review = scheduler.adjust_and_get_next(
        &profile.review_plan,
        request.feedback,
        state.last_feedback,
        state.stage,
        today,
    )?;

    let mut review_history = profile.review_history.clone();
    review_history.record(now, retention_days)?;

    let stage = if request.reset {
        0
    } else {
        i64::try_from(review.new_stage).unwrap_or(i64::MAX)
    };

    profile.review_plan = review.new_plan.clone();
    profile.review_history = review_history;
    state.stage = stage;
    state.review_date = Some(review.next_review_date);
    state.last_review_date = Some(today);
    state.last_feedback = request.feedback;

    tracing::debug!(
        stage,
        reset = request.reset,
        next_review = %review.next_review_date,
        "punch applied"
    );

    Ok(PunchOutcome { review, stage })
}

/// Count a note publication in the user's publish history.
///
/// # Errors
///
/// Returns an error if the stored publish history is malformed.
pub fn record_publish(
    profile: &mut UserReviewProfile,
    now: NaiveDateTime,
    retention_days: i64,
) -> std::result::Result<(), HistoryError> {
    profile.publish_history.record(now, retention_days)
}
