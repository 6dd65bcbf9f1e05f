use std::path::PathBuf;

use clap::Subcommand;
use yusnote_core::{record_activity, ActivityHistory, Config, MonthKey};

use crate::common::{parse_now, read_json_or_default, write_json, CliResult};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Count one activity and drop expired months
    Record {
        /// JSON history file (created when missing)
        #[arg(long)]
        file: PathBuf,
        /// Time of the activity (YYYY-MM-DD[THH:MM:SS], default now)
        #[arg(long)]
        now: Option<String>,
        /// Retention window in days (defaults to history.retention_days)
        #[arg(long)]
        retention_days: Option<i64>,
    },
    /// Show monthly totals, or daily counters for one month
    Show {
        /// JSON history file
        #[arg(long)]
        file: PathBuf,
        /// Month to expand (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: HistoryAction) -> CliResult {
    match action {
        HistoryAction::Record {
            file,
            now,
            retention_days,
        } => {
            let retention_days =
                retention_days.unwrap_or_else(|| Config::load_or_default().history.retention_days);
            let now = parse_now(now.as_deref())?;

            let mut history: ActivityHistory = read_json_or_default(&file)?;
            record_activity(&mut history, now, retention_days)?;
            write_json(&file, &history)?;

            let today = history.count_on(now.date())?;
            println!("{}: {today}", now.date());
        }
        HistoryAction::Show { file, month, json } => {
            let history: ActivityHistory = read_json_or_default(&file)?;
            match month {
                Some(key) => {
                    let month = MonthKey::parse(&key)?;
                    let counters = history.counters(&month)?.unwrap_or_default();
                    if json {
                        println!("{}", serde_json::to_string(&counters)?);
                    } else {
                        for (day, count) in counters.iter().enumerate() {
                            println!("{month}-{:02}: {count}", day + 1);
                        }
                    }
                }
                None => {
                    let mut totals = Vec::with_capacity(history.len());
                    for key in history.keys() {
                        totals.push((key.to_string(), history.month_total(key)?));
                    }
                    if json {
                        let map: serde_json::Map<String, serde_json::Value> = totals
                            .into_iter()
                            .map(|(k, v)| (k, serde_json::Value::from(v)))
                            .collect();
                        println!("{}", serde_json::Value::Object(map));
                    } else {
                        for (key, total) in totals {
                            println!("{key}: {total}");
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
