//! Property-based tests for the review scheduler.
//!
//! Invariants:
//! - Determinism: identical inputs give identical outcomes
//! - Bounds: every interval of a plan drawn from [1, 60] stays in [1, 60]
//! - Stage monotonicity: new stage is stage + 1, or stage at the terminal index
//! - Prefix preservation: intervals before the stage only get reformatted
//! - Double rescale at the current stage agrees with a single rescale exactly
//!   when the factor is a fixed point of the clamp (<= 0 or == 1)

use chrono::NaiveDate;
use proptest::prelude::*;

use yusnote_core::review::format_interval;
use yusnote_core::{adjust_and_get_next, ReviewPlan, ReviewScheduler};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_interval() -> impl Strategy<Value = f64> {
    (100u32..=6000u32).prop_map(|v| f64::from(v) / 100.0)
}

fn arb_plan() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_interval(), 1..8)
}

fn arb_feedback() -> impl Strategy<Value = Option<i64>> {
    prop_oneof![
        Just(None),
        (0i64..=3).prop_map(Some),
        (-3i64..=10).prop_map(Some),
    ]
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..20_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + chrono::Duration::days(offset)
    })
}

fn render(intervals: &[f64]) -> String {
    intervals
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse(plan: &str) -> Vec<f64> {
    ReviewPlan::parse(plan).unwrap().intervals().to_vec()
}

/// Rescale from `stage` onward, applying the factor once per index.
fn single_rescale(intervals: &[f64], stage: usize, adjustment: f64) -> String {
    let adjusted = intervals
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if i < stage {
                v
            } else {
                (v * adjustment).max(1.0).min(60.0)
            }
        })
        .collect::<Vec<_>>();
    ReviewPlan::from_intervals(adjusted).unwrap().serialize()
}

proptest! {
    #[test]
    fn outcome_is_deterministic(
        plan in arb_plan(),
        feedback in arb_feedback(),
        last in arb_feedback(),
        stage in -5i64..12,
        today in arb_date(),
    ) {
        let plan = render(&plan);
        let a = adjust_and_get_next(&plan, feedback, last, stage, today).unwrap();
        let b = adjust_and_get_next(&plan, feedback, last, stage, today).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn intervals_stay_in_bounds(
        plan in arb_plan(),
        feedback in arb_feedback(),
        last in arb_feedback(),
        stage in -5i64..12,
        today in arb_date(),
    ) {
        let out = adjust_and_get_next(&render(&plan), feedback, last, stage, today).unwrap();
        for value in parse(&out.new_plan) {
            prop_assert!((1.0..=60.0).contains(&value), "{} out of bounds", value);
        }
        let days = (out.next_review_date - today).num_days();
        prop_assert!((1..=60).contains(&days));
    }

    #[test]
    fn stage_advances_by_one_until_terminal(
        plan in arb_plan(),
        feedback in arb_feedback(),
        last in arb_feedback(),
        stage in -5i64..12,
        today in arb_date(),
    ) {
        let len = plan.len();
        let clamped = stage.clamp(0, len as i64 - 1) as usize;
        let out = adjust_and_get_next(&render(&plan), feedback, last, stage, today).unwrap();
        if clamped == len - 1 {
            prop_assert_eq!(out.new_stage, clamped);
        } else {
            prop_assert_eq!(out.new_stage, clamped + 1);
        }
    }

    #[test]
    fn prefix_before_stage_is_preserved(
        plan in arb_plan(),
        feedback in arb_feedback(),
        last in arb_feedback(),
        stage in 0i64..8,
        today in arb_date(),
    ) {
        let clamped = stage.min(plan.len() as i64 - 1) as usize;
        let out = adjust_and_get_next(&render(&plan), feedback, last, stage, today).unwrap();
        let tokens: Vec<&str> = out.new_plan.split(',').collect();
        prop_assert_eq!(tokens.len(), plan.len());
        for i in 0..clamped {
            prop_assert_eq!(tokens[i], format_interval(plan[i]));
        }
    }

    #[test]
    fn next_date_follows_stored_interval(
        plan in arb_plan(),
        feedback in arb_feedback(),
        last in arb_feedback(),
        stage in -5i64..12,
        today in arb_date(),
    ) {
        let out = adjust_and_get_next(&render(&plan), feedback, last, stage, today).unwrap();
        let stored = parse(&out.new_plan);
        let expected = stored[out.new_stage].trunc() as i64;
        prop_assert_eq!((out.next_review_date - today).num_days(), expected);
    }

    #[test]
    fn double_rescale_matches_single_for_fixed_point_factors(
        plan in arb_plan(),
        pair in prop_oneof![
            Just((Some(2), Some(2))),
            Just((None, None)),
            Just((Some(0), Some(2))),
            Just((Some(0), Some(3))),
            Just((Some(7), Some(8))),
        ],
        stage in 0i64..8,
        today in arb_date(),
    ) {
        let scheduler = ReviewScheduler::new();
        let (feedback, last) = pair;
        let adjustment = scheduler.adjustment(feedback, last);
        prop_assume!(adjustment <= 0.0 || adjustment == 1.0);

        let clamped = stage.min(plan.len() as i64 - 1) as usize;
        let out = scheduler
            .adjust_and_get_next(&render(&plan), feedback, last, stage, today)
            .unwrap();
        prop_assert_eq!(out.new_plan, single_rescale(&plan, clamped, adjustment));
    }
}

#[test]
fn double_rescale_diverges_for_other_factors() {
    let scheduler = ReviewScheduler::new();
    let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let adjustment = scheduler.adjustment(Some(3), Some(3));
    let out = scheduler
        .adjust_and_get_next("1,3,7,30", Some(3), Some(3), 1, today)
        .unwrap();
    assert_eq!(out.new_plan, "1.00,4.32,8.40,36.00");
    assert_eq!(single_rescale(&[1.0, 3.0, 7.0, 30.0], 1, adjustment), "1.00,3.60,8.40,36.00");
}

#[test]
fn documented_examples() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let out = adjust_and_get_next("1,3,7,30", Some(2), Some(2), 0, today).unwrap();
    assert_eq!(
        (out.new_plan.as_str(), out.new_stage, out.next_review_date),
        ("1.00,3.00,7.00,30.00", 1, NaiveDate::from_ymd_opt(2024, 6, 4).unwrap())
    );

    let out = adjust_and_get_next("1,3,7,30", Some(0), Some(2), 0, today).unwrap();
    assert_eq!(
        (out.new_plan.as_str(), out.new_stage, out.next_review_date),
        ("1.00,1.00,1.00,1.00", 1, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap())
    );

    let out = adjust_and_get_next("1,3,7,30", Some(3), Some(0), 3, today).unwrap();
    assert_eq!(
        (out.new_plan.as_str(), out.new_stage, out.next_review_date),
        ("1.00,3.00,7.00,60.00", 3, NaiveDate::from_ymd_opt(2024, 7, 31).unwrap())
    );
}
