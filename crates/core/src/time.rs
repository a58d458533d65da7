//! Wire timestamp formats and local time-of-day resolution.
//!
//! teleport.io only speaks UTC. Image lookups take second precision
//! (`2025-11-26T21:12:00Z`); frame queries and video requests take
//! millisecond precision (`2025-11-26T21:12:00.000Z`).

use chrono::{
    DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::error::CoreError;
use crate::types::Timestamp;

/// `strftime` pattern for `frametime` query values.
pub const FRAME_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Accepted calendar date format for caller-supplied dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format an instant as a second-precision wire timestamp.
pub fn format_frame_time(ts: &Timestamp) -> String {
    ts.format(FRAME_TIME_FORMAT).to_string()
}

/// Format an instant with millisecond precision and a literal `Z`.
pub fn format_millis_time(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a timestamp echoed back by the service.
///
/// Accepts RFC 3339 with `Z` or an explicit offset. Strings without any
/// zone designator are taken to be UTC.
pub fn parse_wire_timestamp(value: &str) -> Result<Timestamp, CoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| CoreError::Validation(format!("Invalid timestamp '{value}': {e}")))
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| CoreError::Validation("Invalid date format. Use YYYY-MM-DD".to_string()))
}

/// Build the wall-clock time `hour:minute`, rejecting out-of-range values.
pub fn time_of_day(hour: u32, minute: u32) -> Result<NaiveTime, CoreError> {
    if hour > 23 {
        return Err(CoreError::Validation(format!(
            "hour must be between 0 and 23, got {hour}"
        )));
    }
    if minute > 59 {
        return Err(CoreError::Validation(format!(
            "minute must be between 0 and 59, got {minute}"
        )));
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| CoreError::Validation(format!("Invalid time {hour}:{minute}")))
}

/// Interpret `date` at `hour:minute` in `tz`.
///
/// Ambiguous local times (the repeated hour when clocks go back) resolve
/// to the earlier instant. Times skipped by a forward transition do not
/// exist and are rejected.
pub fn local_datetime(
    tz: &Tz,
    date: NaiveDate,
    hour: u32,
    minute: u32,
) -> Result<DateTime<Tz>, CoreError> {
    let naive = date.and_time(time_of_day(hour, minute)?);
    tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
        CoreError::Validation(format!("{naive} does not exist in {}", tz.name()))
    })
}

/// Convert `date` at `hour:minute` local time in `tz` to UTC.
pub fn local_to_utc(
    tz: &Tz,
    date: NaiveDate,
    hour: u32,
    minute: u32,
) -> Result<Timestamp, CoreError> {
    local_datetime(tz, date, hour, minute).map(|dt| dt.with_timezone(&Utc))
}

/// Resolve "the most recent `hour:minute`" relative to `now`.
///
/// The candidate is built on `now`'s local date. If it lies strictly in
/// the future, or was skipped today by a forward DST transition, the
/// previous calendar day is used instead. The previous day is rebuilt
/// from the date, not by subtracting 24 hours, so the local wall-clock
/// time survives DST transitions and month boundaries.
pub fn resolve_time_of_day(
    now: &DateTime<Tz>,
    hour: u32,
    minute: u32,
) -> Result<Timestamp, CoreError> {
    let tz = now.timezone();
    let today = now.date_naive();
    let time = time_of_day(hour, minute)?;

    if let Some(candidate) = tz.from_local_datetime(&today.and_time(time)).earliest() {
        if candidate <= *now {
            return Ok(candidate.with_timezone(&Utc));
        }
    }

    let yesterday = today
        .pred_opt()
        .ok_or_else(|| CoreError::Validation(format!("No day before {today}")))?;
    local_to_utc(&tz, yesterday, hour, minute)
}
