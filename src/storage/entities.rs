use std::collections::HashSet;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::utils::time::date_to_record_key;

/// Reads one stored field, keeping its default when the stored value has the wrong type (a
/// negative counter, a string flag). The rest of the record is read as usual.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        warn!("Ignoring stored value {value}: {e}");
        T::default()
    }))
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DietRecord {
    #[serde(deserialize_with = "or_default")]
    pub standard_breakfast: bool,
    #[serde(deserialize_with = "or_default")]
    pub standard_lunch: bool,
    #[serde(deserialize_with = "or_default")]
    pub no_dinner: bool,
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ExerciseRecord {
    #[serde(deserialize_with = "or_default")]
    pub jin_gang_gong: bool,
    #[serde(deserialize_with = "or_default")]
    pub strength_training: bool,
}

/// Minutes spent meditating, one counter per part of the day.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MeditationRecord {
    #[serde(deserialize_with = "or_default")]
    pub morning: u32,
    #[serde(deserialize_with = "or_default")]
    pub noon: u32,
    #[serde(deserialize_with = "or_default")]
    pub evening: u32,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    Morning,
    Noon,
    Evening,
}

impl DayPart {
    pub fn title(&self) -> &'static str {
        match self {
            DayPart::Morning => "晨间觉察",
            DayPart::Noon => "午间静心",
            DayPart::Evening => "晚间静心",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            DayPart::Morning => "晨冥",
            DayPart::Noon => "午冥",
            DayPart::Evening => "晚冥",
        }
    }
}

impl MeditationRecord {
    pub fn get(&self, part: DayPart) -> u32 {
        match part {
            DayPart::Morning => self.morning,
            DayPart::Noon => self.noon,
            DayPart::Evening => self.evening,
        }
    }

    pub fn get_mut(&mut self, part: DayPart) -> &mut u32 {
        match part {
            DayPart::Morning => &mut self.morning,
            DayPart::Noon => &mut self.noon,
            DayPart::Evening => &mut self.evening,
        }
    }

    /// Counters saturate instead of wrapping.
    pub fn add(&mut self, part: DayPart, minutes: u32) {
        let counter = self.get_mut(part);
        *counter = counter.saturating_add(minutes);
    }

    pub fn total(&self) -> u32 {
        self.morning
            .saturating_add(self.noon)
            .saturating_add(self.evening)
    }
}

/// The focused study activity. Stored under the `japanese` key for compatibility with existing
/// data.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct FocusRecord {
    #[serde(deserialize_with = "or_default")]
    pub minutes: u32,
    #[serde(deserialize_with = "or_default")]
    pub notes: String,
}

/// Everything tracked for a single calendar day. One record exists per date key.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub date: String,
    #[serde(default, deserialize_with = "or_default")]
    pub diet: DietRecord,
    #[serde(default, deserialize_with = "or_default")]
    pub exercise: ExerciseRecord,
    #[serde(default, deserialize_with = "or_default")]
    pub meditation: MeditationRecord,
    #[serde(rename = "japanese", default, deserialize_with = "or_default")]
    pub focus: FocusRecord,
    #[serde(default, deserialize_with = "or_default")]
    pub weight: Option<f64>,
    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub ai_briefing: Option<String>,
}

impl DayRecord {
    /// Canonical default record. Every field of the current shape is present here, which is what
    /// older stored records are upgraded against.
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            diet: DietRecord::default(),
            exercise: ExerciseRecord::default(),
            meditation: MeditationRecord::default(),
            focus: FocusRecord::default(),
            weight: None,
            ai_briefing: None,
        }
    }

    /// Whether anything was checked in for the day. Notes and briefings alone don't count.
    pub fn has_data(&self) -> bool {
        self.diet.standard_breakfast
            || self.diet.standard_lunch
            || self.diet.no_dinner
            || self.exercise.jin_gang_gong
            || self.exercise.strength_training
            || self.focus.minutes > 0
            || self.weight.is_some()
            || self.meditation.total() > 0
    }

    /// Every habit of the day as a task, completed or not.
    pub fn habit_tasks(&self) -> Vec<Task> {
        let mut tasks = vec![
            Task::charge("standard-breakfast", "标准早餐", "diet", 10, self.diet.standard_breakfast),
            Task::charge("standard-lunch", "标准午餐", "diet", 10, self.diet.standard_lunch),
            Task::charge("no-dinner", "过午不食", "diet", 20, self.diet.no_dinner),
            Task::charge("jin-gang-gong", "金刚功", "exercise", 20, self.exercise.jin_gang_gong),
            Task::charge(
                "strength-training",
                "力量训练",
                "exercise",
                20,
                self.exercise.strength_training,
            ),
        ];

        for part in [DayPart::Morning, DayPart::Noon, DayPart::Evening] {
            let minutes = self.meditation.get(part);
            tasks.push(Task::charge(
                format!("meditation-{}", part_key(part)),
                format!("{} {minutes}m", part.short_label()),
                "meditation",
                15,
                minutes > 0,
            ));
        }

        tasks.push(Task::charge(
            "focus",
            format!("日语 {}m", self.focus.minutes),
            "study",
            15,
            self.focus.minutes > 0,
        ));
        tasks
    }
}

fn part_key(part: DayPart) -> &'static str {
    match part {
        DayPart::Morning => "morning",
        DayPart::Noon => "noon",
        DayPart::Evening => "evening",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskType {
    /// Restores energy.
    Charge,
    /// Spends energy.
    Drain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub category: String,
    pub energy_value: i32,
}

impl Task {
    fn charge(
        id: impl Into<String>,
        title: impl Into<String>,
        category: &str,
        energy_value: i32,
        completed: bool,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed,
            task_type: TaskType::Charge,
            category: category.into(),
            energy_value,
        }
    }
}

/// Number of consecutive days with check-ins ending at `today`. A day that hasn't been checked
/// in yet doesn't break the streak, counting then starts from yesterday.
pub fn current_streak(history: &[DayRecord], today: NaiveDate) -> u32 {
    let active = history
        .iter()
        .filter(|record| record.has_data())
        .map(|record| record.date.as_str())
        .collect::<HashSet<_>>();

    let mut day = today;
    if !active.contains(date_to_record_key(day).as_str()) {
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => return 0,
        }
    }

    let mut streak = 0;
    while active.contains(date_to_record_key(day).as_str()) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::{current_streak, DayPart, DayRecord, TaskType};

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn checked_in(date: &str) -> DayRecord {
        let mut record = DayRecord::new(date);
        record.diet.no_dinner = true;
        record
    }

    #[test]
    fn default_record_serializes_with_legacy_names() {
        let value = serde_json::to_value(DayRecord::new("2024-01-01")).unwrap();
        assert_eq!(
            value,
            json!({
                "date": "2024-01-01",
                "diet": { "standardBreakfast": false, "standardLunch": false, "noDinner": false },
                "exercise": { "jinGangGong": false, "strengthTraining": false },
                "meditation": { "morning": 0, "noon": 0, "evening": 0 },
                "japanese": { "minutes": 0, "notes": "" },
                "weight": null
            })
        );
    }

    #[test]
    fn briefing_is_read_back_when_present() {
        let mut record = DayRecord::new("2024-01-01");
        record.ai_briefing = Some("well done".into());
        let text = serde_json::to_string(&record).unwrap();
        assert!(text.contains("\"aiBriefing\":\"well done\""));
        assert_eq!(serde_json::from_str::<DayRecord>(&text).unwrap(), record);
    }

    #[test]
    fn wrong_leaf_keeps_the_rest_of_the_record() {
        let record: DayRecord = serde_json::from_value(json!({
            "date": "2024-01-01",
            "diet": { "standardBreakfast": "yes", "noDinner": true },
            "meditation": { "morning": -5, "noon": 2.5, "evening": 7 },
            "japanese": { "minutes": 30, "notes": 12 },
            "weight": "heavy",
            "aiBriefing": false
        }))
        .unwrap();

        let mut expected = DayRecord::new("2024-01-01");
        expected.diet.no_dinner = true;
        expected.meditation.evening = 7;
        expected.focus.minutes = 30;
        assert_eq!(record, expected);
    }

    #[test]
    fn wrong_group_falls_back_to_default_group() {
        let record: DayRecord = serde_json::from_value(json!({
            "date": "2024-01-01",
            "exercise": 5,
            "weight": 61.0
        }))
        .unwrap();

        assert_eq!(record.exercise, Default::default());
        assert_eq!(record.weight, Some(61.0));
    }

    #[test]
    fn has_data_ignores_notes() {
        let mut record = DayRecord::new("2024-01-01");
        record.focus.notes = "kana".into();
        assert!(!record.has_data());

        record.meditation.add(DayPart::Noon, 3);
        assert!(record.has_data());
    }

    #[test]
    fn meditation_add_saturates() {
        let mut record = DayRecord::new("2024-01-01");
        record.meditation.evening = u32::MAX - 1;
        record.meditation.add(DayPart::Evening, 10);
        assert_eq!(record.meditation.evening, u32::MAX);
    }

    #[test]
    fn habit_tasks_reflect_the_record() {
        let mut record = DayRecord::new("2024-01-01");
        record.exercise.jin_gang_gong = true;
        record.meditation.morning = 12;

        let tasks = record.habit_tasks();
        let completed = tasks
            .iter()
            .filter(|task| task.completed)
            .map(|task| task.title.as_str())
            .collect::<Vec<_>>();

        assert_eq!(completed, vec!["金刚功", "晨冥 12m"]);
        assert!(tasks.iter().all(|task| task.task_type == TaskType::Charge));
    }

    #[test]
    fn streak_counts_back_from_today() {
        let history = vec![
            checked_in("2024-03-10"),
            checked_in("2024-03-09"),
            checked_in("2024-03-08"),
            checked_in("2024-03-06"),
        ];
        assert_eq!(current_streak(&history, day("2024-03-10")), 3);
    }

    #[test]
    fn streak_survives_unchecked_today() {
        let history = vec![
            DayRecord::new("2024-03-10"),
            checked_in("2024-03-09"),
            checked_in("2024-03-08"),
        ];
        assert_eq!(current_streak(&history, day("2024-03-10")), 2);
    }

    #[test]
    fn streak_is_zero_after_a_gap() {
        let history = vec![checked_in("2024-03-07")];
        assert_eq!(current_streak(&history, day("2024-03-10")), 0);
    }
}
