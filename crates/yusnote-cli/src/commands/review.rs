use clap::Subcommand;
use yusnote_core::{Config, ReviewPlan};

use crate::common::{parse_date, CliResult};

#[derive(Subcommand)]
pub enum ReviewAction {
    /// Adjust a plan for one review and print the next review date
    Adjust {
        /// Interval plan (defaults to the configured default plan)
        #[arg(long)]
        plan: Option<String>,
        /// Feedback for this review (0-3)
        #[arg(long, allow_negative_numbers = true)]
        feedback: Option<i64>,
        /// Feedback given at the previous review
        #[arg(long, allow_negative_numbers = true)]
        last_feedback: Option<i64>,
        /// Current stage of the item
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        stage: i64,
        /// Date of the review (YYYY-MM-DD, default today)
        #[arg(long)]
        today: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a plan and print its normalized form
    Plan {
        /// Interval plan (defaults to the configured default plan)
        plan: Option<String>,
    },
}

pub fn run(action: ReviewAction) -> CliResult {
    let config = Config::load_or_default();

    match action {
        ReviewAction::Adjust {
            plan,
            feedback,
            last_feedback,
            stage,
            today,
            json,
        } => {
            let scheduler = config.scheduler()?;
            let plan = plan.unwrap_or_else(|| config.review.default_plan.clone());
            let today = parse_date(today.as_deref())?;
            let outcome = scheduler.adjust_and_get_next(&plan, feedback, last_feedback, stage, today)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("Plan:        {}", outcome.new_plan);
                println!("Stage:       {}", outcome.new_stage);
                println!("Next review: {}", outcome.next_review_date);
            }
        }
        ReviewAction::Plan { plan } => {
            let plan = plan.unwrap_or_else(|| config.review.default_plan.clone());
            let parsed = ReviewPlan::parse(&plan)?;
            println!("{parsed}");
        }
    }
    Ok(())
}
