use std::fmt::Display;

use anyhow::{bail, Result};
use chrono::{DateTime, Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use crate::storage::entities::{DayPart, DayRecord};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct DayArgs {
    #[arg(
        long = "date",
        short,
        help = "Day to work with. Examples are \"today\", \"yesterday\", \"2 days ago\", \"15/03/2025\". Defaults to today"
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

impl DayArgs {
    /// Turns the `--date` expression into a calendar day. Days after today are rejected, nothing
    /// can be tracked for them yet.
    pub fn resolve(&self, now: DateTime<Local>) -> Result<NaiveDate> {
        let today = now.date_naive();
        let Some(expression) = &self.date else {
            return Ok(today);
        };

        let day = match parse_date_string(expression, now, self.date_style.into()) {
            Ok(v) => v.date_naive(),
            Err(e) => {
                return Err(Args::command()
                    .error(
                        clap::error::ErrorKind::ValueValidation,
                        format!("Failed to validate date {e}"),
                    )
                    .into());
            }
        };

        if day > today {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("{day} is in the future"),
                )
                .into());
        }
        Ok(day)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Meal {
    Breakfast,
    Lunch,
    NoDinner,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExerciseKind {
    JinGangGong,
    Strength,
}

/// Minute counters of a record.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Counter {
    Morning,
    Noon,
    Evening,
    Focus,
}

pub fn toggle_diet(record: &mut DayRecord, meal: Meal) {
    let flag = match meal {
        Meal::Breakfast => &mut record.diet.standard_breakfast,
        Meal::Lunch => &mut record.diet.standard_lunch,
        Meal::NoDinner => &mut record.diet.no_dinner,
    };
    *flag = !*flag;
}

pub fn toggle_exercise(record: &mut DayRecord, kind: ExerciseKind) {
    let flag = match kind {
        ExerciseKind::JinGangGong => &mut record.exercise.jin_gang_gong,
        ExerciseKind::Strength => &mut record.exercise.strength_training,
    };
    *flag = !*flag;
}

pub fn set_minutes(record: &mut DayRecord, counter: Counter, minutes: u32) {
    match counter {
        Counter::Morning => *record.meditation.get_mut(DayPart::Morning) = minutes,
        Counter::Noon => *record.meditation.get_mut(DayPart::Noon) = minutes,
        Counter::Evening => *record.meditation.get_mut(DayPart::Evening) = minutes,
        Counter::Focus => record.focus.minutes = minutes,
    }
}

/// Durations are only edited by hand on the day they happen. Past days keep what the timers
/// recorded.
pub fn ensure_today(day: NaiveDate, today: NaiveDate) -> Result<()> {
    if day != today {
        bail!("Minutes can only be edited for today ({today}), not for {day}");
    }
    Ok(())
}

/// An empty input clears the weight.
pub fn parse_weight(value: &str) -> Result<Option<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let weight = value.parse::<f64>()?;
    if !weight.is_finite() || weight <= 0. {
        bail!("Weight has to be a positive number, got {value}");
    }
    Ok(Some(weight))
}

#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate, TimeZone};

    use crate::storage::entities::DayRecord;

    use super::{
        ensure_today, parse_weight, set_minutes, toggle_diet, toggle_exercise, Counter, DateStyle,
        DayArgs, ExerciseKind, Meal,
    };

    fn args(date: Option<&str>, date_style: DateStyle) -> DayArgs {
        DayArgs {
            date: date.map(String::from),
            date_style,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn resolve_defaults_to_today() {
        let now = Local.with_ymd_and_hms(2025, 3, 16, 12, 0, 0).unwrap();
        assert_eq!(args(None, DateStyle::Uk).resolve(now).unwrap(), day(2025, 3, 16));
    }

    #[test]
    fn resolve_understands_dialects() {
        let now = Local.with_ymd_and_hms(2025, 3, 16, 12, 0, 0).unwrap();
        assert_eq!(
            args(Some("15/03/2025"), DateStyle::Uk).resolve(now).unwrap(),
            day(2025, 3, 15)
        );
        assert_eq!(
            args(Some("03/15/2025"), DateStyle::Us).resolve(now).unwrap(),
            day(2025, 3, 15)
        );
    }

    #[test]
    fn resolve_understands_relative_days() {
        let now = Local.with_ymd_and_hms(2025, 3, 16, 12, 0, 0).unwrap();
        assert_eq!(
            args(Some("yesterday"), DateStyle::Uk).resolve(now).unwrap(),
            day(2025, 3, 15)
        );
    }

    #[test]
    fn resolve_rejects_future_and_garbage() {
        let now = Local.with_ymd_and_hms(2025, 3, 16, 12, 0, 0).unwrap();
        assert!(args(Some("17/03/2025"), DateStyle::Uk).resolve(now).is_err());
        assert!(args(Some("not a date at all"), DateStyle::Uk).resolve(now).is_err());
    }

    #[test]
    fn toggles_flip_flags() {
        let mut record = DayRecord::new("2024-01-01");
        toggle_diet(&mut record, Meal::NoDinner);
        toggle_exercise(&mut record, ExerciseKind::Strength);
        assert!(record.diet.no_dinner);
        assert!(record.exercise.strength_training);

        toggle_diet(&mut record, Meal::NoDinner);
        assert!(!record.diet.no_dinner);
    }

    #[test]
    fn minutes_replace_counters() {
        let mut record = DayRecord::new("2024-01-01");
        set_minutes(&mut record, Counter::Noon, 12);
        set_minutes(&mut record, Counter::Focus, 40);
        set_minutes(&mut record, Counter::Noon, 5);
        assert_eq!(record.meditation.noon, 5);
        assert_eq!(record.focus.minutes, 40);
    }

    #[test]
    fn minutes_only_for_today() {
        assert!(ensure_today(day(2024, 1, 1), day(2024, 1, 1)).is_ok());
        assert!(ensure_today(day(2023, 12, 31), day(2024, 1, 1)).is_err());
    }

    #[test]
    fn weight_parsing() {
        assert_eq!(parse_weight("").unwrap(), None);
        assert_eq!(parse_weight("  ").unwrap(), None);
        assert_eq!(parse_weight("64.5").unwrap(), Some(64.5));
        assert!(parse_weight("-3").is_err());
        assert!(parse_weight("0").is_err());
        assert!(parse_weight("heavy").is_err());
        assert!(parse_weight("inf").is_err());
    }
}
