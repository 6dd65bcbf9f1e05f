//! Per-month activity counters.
//!
//! A history maps a `"YYYY-MM"` key to one comma-joined counter per day of that
//! month, e.g. `"0,0,3,1,..."`. Months are created lazily on first activity and
//! dropped once their first day falls outside the retention window.
//!
//! The window is a plain day count subtracted from "now" and compared with the
//! month's first instant, not a calendar-month difference.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;

/// Days of history kept when no other window is configured.
pub const DEFAULT_RETENTION_DAYS: i64 = 90;

/// Number of days in `month` of `year`, leap years included.
///
/// Returns 0 for a month outside `1..=12`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// A validated `"YYYY-MM"` history key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    first_day: NaiveDate,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    /// Parse a stored key: four-digit year, dash, two-digit month.
    ///
    /// Only the canonical form is accepted, so every month has exactly one
    /// key (`"2024-2"` would otherwise alias `"2024-02"`).
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::MalformedMonthKey`] for anything else.
    pub fn parse(key: &str) -> Result<Self, HistoryError> {
        let malformed = || HistoryError::MalformedMonthKey {
            key: key.to_string(),
        };

        let (year, month) = key.split_once('-').ok_or_else(malformed)?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if month.len() != 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        Self::new(year, month).ok_or_else(malformed)
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Midnight of the first day of the month.
    pub fn first_instant(&self) -> NaiveDateTime {
        self.first_day.and_time(NaiveTime::MIN)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Sparse per-month activity record, as stored by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityHistory {
    months: BTreeMap<String, String>,
}

impl From<BTreeMap<String, String>> for ActivityHistory {
    fn from(months: BTreeMap<String, String>) -> Self {
        Self { months }
    }
}

impl From<HashMap<String, String>> for ActivityHistory {
    fn from(months: HashMap<String, String>) -> Self {
        Self {
            months: months.into_iter().collect(),
        }
    }
}

impl ActivityHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.months
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.months
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.months.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.months.keys().map(String::as_str)
    }

    /// Parsed counters for `month`, if the month has an entry.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::MalformedCounters`] when the stored entry does
    /// not hold exactly one non-negative integer per day.
    pub fn counters(&self, month: &MonthKey) -> Result<Option<Vec<u64>>, HistoryError> {
        let key = month.to_string();
        self.months
            .get(&key)
            .map(|raw| parse_counters(&key, raw, month.days()))
            .transpose()
    }

    /// Activity count recorded on `date` (0 when the month has no entry).
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::MalformedCounters`] for a corrupt month entry.
    pub fn count_on(&self, date: NaiveDate) -> Result<u64, HistoryError> {
        let counters = self.counters(&MonthKey::of(date))?;
        Ok(counters
            .and_then(|c| c.get(date.day0() as usize).copied())
            .unwrap_or(0))
    }

    /// Sum of all counters in the month named by `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` or its entry is malformed.
    pub fn month_total(&self, key: &str) -> Result<u64, HistoryError> {
        let month = MonthKey::parse(key)?;
        Ok(self
            .counters(&month)?
            .map(|c| c.iter().sum())
            .unwrap_or(0))
    }

    /// Count one activity at `now` and evict months outside the window.
    ///
    /// Every stored key and the current month's entry are validated before
    /// anything changes, so a failed call leaves the history as it was.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::MalformedMonthKey`] or
    /// [`HistoryError::MalformedCounters`] on corrupt stored data.
    pub fn record(&mut self, now: NaiveDateTime, retention_days: i64) -> Result<(), HistoryError> {
        let stored = self
            .months
            .keys()
            .map(|k| MonthKey::parse(k).map(|month| (k.clone(), month)))
            .collect::<Result<Vec<_>, _>>()?;

        let current = MonthKey::of(now.date());
        let day_index = now.day0() as usize;
        let mut counters = self
            .counters(&current)?
            .unwrap_or_else(|| vec![0; current.days() as usize]);
        counters[day_index] =
            counters[day_index]
                .checked_add(1)
                .ok_or_else(|| HistoryError::MalformedCounters {
                    key: current.to_string(),
                    reason: "counter overflow".to_string(),
                })?;

        tracing::debug!(
            month = %current,
            day = now.day(),
            count = counters[day_index],
            "recorded activity"
        );
        self.months.insert(current.to_string(), join_counters(&counters));

        let Some(cutoff) = TimeDelta::try_days(retention_days)
            .and_then(|window| now.checked_sub_signed(window))
        else {
            return Ok(());
        };

        let mut evicted = Vec::new();
        for (key, month) in stored
            .into_iter()
            .chain(std::iter::once((current.to_string(), current)))
        {
            if month.first_instant() < cutoff && self.months.remove(&key).is_some() {
                evicted.push(key);
            }
        }
        if !evicted.is_empty() {
            tracing::info!(?evicted, %cutoff, "evicted expired history months");
        }
        Ok(())
    }
}

fn parse_counters(key: &str, raw: &str, days: u32) -> Result<Vec<u64>, HistoryError> {
    let counters = raw
        .split(',')
        .map(|token| {
            token
                .trim()
                .parse::<u64>()
                .map_err(|_| HistoryError::MalformedCounters {
                    key: key.to_string(),
                    reason: format!("counter '{token}' is not a non-negative integer"),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if counters.len() != days as usize {
        return Err(HistoryError::MalformedCounters {
            key: key.to_string(),
            reason: format!("expected {days} counters, found {}", counters.len()),
        });
    }
    Ok(counters)
}

fn join_counters(counters: &[u64]) -> String {
    counters
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Count one activity at `now` in `history`, then evict expired months.
///
/// # Errors
///
/// See [`ActivityHistory::record`].
pub fn record_activity(
    history: &mut ActivityHistory,
    now: NaiveDateTime,
    retention_days: i64,
) -> Result<&mut ActivityHistory, HistoryError> {
    history.record(now, retention_days)?;
    Ok(history)
}
