//! Adaptive review scheduling.
//!
//! A user's review plan is an ordered list of day intervals. Each note or
//! collection tracks its position (stage) in that plan. On every review the
//! remaining intervals are rescaled according to the user's feedback, and the
//! item advances one stage until it saturates at the last interval.

mod feedback;
mod plan;
mod scheduler;

pub use feedback::{
    resolve_feedback, FeedbackLevel, FeedbackMap, DEFAULT_FEEDBACK, UNMAPPED_MULTIPLIER,
};
pub use plan::{format_interval, ReviewPlan, DEFAULT_REVIEW_PLAN};
pub use scheduler::{
    adjust_and_get_next, adjust_and_get_next_today, ReviewOutcome, ReviewRequest,
    ReviewResponse, ReviewScheduler, SchedulerConfig,
};
