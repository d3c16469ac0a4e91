use chrono::NaiveDate;

pub const RECORD_KEY_FORMAT: &str = "%Y-%m-%d";

/// This is the standard way of converting a date to a record key in rhythm.
pub fn date_to_record_key(date: NaiveDate) -> String {
    date.format(RECORD_KEY_FORMAT).to_string()
}

/// Minutes credited for a timed session. Any started minute counts as a whole one.
pub fn minutes_from_seconds(seconds: u64) -> u32 {
    u32::try_from(seconds.div_ceil(60)).unwrap_or(u32::MAX)
}

/// Formats elapsed seconds the way timers display them, `MM:SS`.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
