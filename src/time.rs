//! Clock and calendar helpers.
//!
//! Everything inside the pipeline works in UTC. The only local-time concern
//! is the report's date label, which follows the configured time zone.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

pub const DATE_LABEL_FORMAT: &str = "%Y-%m-%d";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

pub fn to_local(instant: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    instant.with_timezone(&tz)
}

/// Calendar day of `instant` in `tz`, e.g. `2025-10-16`.
pub fn date_label(instant: DateTime<Utc>, tz: Tz) -> String {
    to_local(instant, tz).format(DATE_LABEL_FORMAT).to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_LABEL_FORMAT).to_string()
}

/// Timestamp as shown in report lines.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}
