use chrono::{DateTime, Utc};

/// Calendar date and minute, as shown in the attempt history.
#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}
