//! # yusnote Core Library
//!
//! This library provides the review logic behind yusnote, a note-taking
//! application where users periodically review their notes. It is pure
//! computation: storage, HTTP and authentication belong to the surrounding
//! application, which reads the opaque plan and history strings, calls in here,
//! and writes the results back.
//!
//! ## Architecture
//!
//! - **Review**: feedback-adjusted interval plans and next review dates
//! - **History**: sparse per-month activity counters with a retention window
//! - **Punch**: applies one completed review to a user and an item
//! - **Storage**: TOML-based configuration of the tunables
//!
//! ## Key Components
//!
//! - [`ReviewScheduler`]: plan adjustment and next review date
//! - [`ActivityHistory`]: per-month activity record
//! - [`punch()`]: review completion for a note or collected item
//! - [`Config`]: application configuration management

pub mod error;
pub mod history;
pub mod punch;
pub mod review;
pub mod storage;

pub use error::{ConfigError, CoreError, HistoryError, ReviewError};
pub use history::{days_in_month, record_activity, ActivityHistory, MonthKey, DEFAULT_RETENTION_DAYS};
pub use punch::{punch, record_publish, PunchOutcome, PunchRequest, ReviewState, UserReviewProfile};
pub use review::{
    adjust_and_get_next, adjust_and_get_next_today, FeedbackLevel, FeedbackMap, ReviewOutcome,
    ReviewPlan, ReviewRequest, ReviewResponse, ReviewScheduler, SchedulerConfig,
    DEFAULT_REVIEW_PLAN,
};
pub use storage::Config;
