//! Shared helpers for CLI commands.

use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Parse a `YYYY-MM-DD` date, or today's local date when absent.
pub fn parse_date(value: Option<&str>) -> CliResult<NaiveDate> {
    match value {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| format!("invalid date '{raw}', expected YYYY-MM-DD").into()),
        None => Ok(Local::now().date_naive()),
    }
}

/// Parse `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or a bare date (noon),
/// or the current local time when absent.
pub fn parse_now(value: Option<&str>) -> CliResult<NaiveDateTime> {
    let Some(raw) = value else {
        return Ok(Local::now().naive_local());
    };

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt);
        }
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid time '{raw}', expected YYYY-MM-DD[THH:MM:SS]"))?;
    let noon = NaiveTime::from_hms_opt(12, 0, 0).ok_or("invalid time of day")?;
    Ok(date.and_time(noon))
}

/// Read a JSON document, or `T::default()` when the file does not exist.
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> CliResult<T> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(serde_json::from_str(&content)
            .map_err(|e| format!("cannot parse {}: {e}", path.display()))?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "state file missing, starting empty");
            Ok(T::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Write `value` as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> CliResult {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)?;
    Ok(())
}
