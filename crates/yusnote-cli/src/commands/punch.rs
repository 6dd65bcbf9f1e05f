//! Punch command: complete a review against a JSON state file.
//!
//! The state file holds the user's review fields and one item's review fields:
//!
//! ```json
//! { "profile": { "review_plan": "1,3,7,30", "review_history": {}, "publish_history": {} },
//!   "item": { "stage": 0, "last_feedback": null, "review_date": null, "last_review_date": null } }
//! ```

use std::path::PathBuf;

use clap::Args;
use serde::{Deserialize, Serialize};
use yusnote_core::{punch, Config, PunchRequest, ReviewState, UserReviewProfile};

use crate::common::{parse_now, read_json_or_default, write_json, CliResult};

#[derive(Args)]
pub struct PunchArgs {
    /// JSON state file (created when missing)
    #[arg(long)]
    state: PathBuf,
    /// Feedback for this review (0-3)
    #[arg(long, allow_negative_numbers = true)]
    feedback: Option<i64>,
    /// Send the item back to its first stage
    #[arg(long)]
    reset: bool,
    /// Time of the review (YYYY-MM-DD[THH:MM:SS], default now)
    #[arg(long)]
    now: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PunchState {
    #[serde(default)]
    profile: Option<UserReviewProfile>,
    #[serde(default)]
    item: ReviewState,
}

pub fn run(args: PunchArgs) -> CliResult {
    let config = Config::load_or_default();
    let scheduler = config.scheduler()?;
    let now = parse_now(args.now.as_deref())?;

    let mut state: PunchState = read_json_or_default(&args.state)?;
    let mut profile = state
        .profile
        .take()
        .unwrap_or_else(|| UserReviewProfile::with_plan(config.review.default_plan.clone()));

    let request = PunchRequest {
        feedback: args.feedback,
        reset: args.reset,
    };
    let outcome = punch(
        &scheduler,
        &mut profile,
        &mut state.item,
        &request,
        now,
        config.history.retention_days,
    )?;

    state.profile = Some(profile);
    write_json(&args.state, &state)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("Plan:        {}", outcome.review.new_plan);
        println!("Stage:       {}", outcome.stage);
        println!("Next review: {}", outcome.review.next_review_date);
    }
    Ok(())
}
