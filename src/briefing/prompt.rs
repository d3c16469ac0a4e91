use crate::storage::entities::{DayRecord, Task};

fn yes_no(value: bool, yes: &str, no: &str) -> String {
    (if value { yes } else { no }).to_string()
}

/// Prompt for the daily review of a single record.
pub fn daily_briefing_prompt(record: &DayRecord) -> String {
    let weight = record
        .weight
        .map(|w| format!("{w}kg"))
        .unwrap_or_else(|| "Not recorded".into());
    let notes = if record.focus.notes.trim().is_empty() {
        "No specific notes"
    } else {
        record.focus.notes.as_str()
    };

    format!(
        "Role: A wise mentor combining Traditional Chinese Medicine (TCM) wisdom, discipline, and modern fitness.

User's Data for Today ({date}):
[Diet]
- Standard Breakfast: {breakfast}
- Standard Lunch: {lunch}
- No Dinner (Intermittent Fasting): {no_dinner}

[Body Cultivation]
- Jin Gang Gong (TCM Exercise): {jin_gang_gong}
- Strength Training: {strength}
- Weight: {weight}

[Inner Peace & Meditation]
- Morning Meditation: {morning} mins
- Noon Meditation: {noon} mins
- Evening Meditation: {evening} mins

[Mind & Skill]
- Japanese Study: {minutes} mins.
- Notes: {notes}

Task: Provide a short, insightful daily review (max 100 words).
Requirements:
1. If \"Jin Gang Gong\" and \"No Dinner\" are met, praise the user's \"Internal Energy (Qi)\" cultivation.
2. If Meditation is practiced (Morning, Noon, or Evening), acknowledge the cultivation of \"Shen\" (Spirit).
3. If Japanese notes are present, briefly acknowledge the topic.
4. Tone: Stoic, Encouraging, Zen.
5. Language: Chinese (Simplified).
",
        date = record.date,
        breakfast = yes_no(record.diet.standard_breakfast, "Yes", "No"),
        lunch = yes_no(record.diet.standard_lunch, "Yes", "No"),
        no_dinner = yes_no(record.diet.no_dinner, "Success", "Skipped"),
        jin_gang_gong = yes_no(record.exercise.jin_gang_gong, "Practiced", "Not yet"),
        strength = yes_no(record.exercise.strength_training, "Done", "Rest"),
        morning = record.meditation.morning,
        noon = record.meditation.noon,
        evening = record.meditation.evening,
        minutes = record.focus.minutes,
    )
}

/// Prompt for the commendation of completed tasks. `tasks` are expected to be completed ones.
pub fn hero_report_prompt(tasks: &[Task], streak: u32) -> String {
    let titles = tasks
        .iter()
        .map(|task| task.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Role: A legendary chronicler of heroes.

The user has completed these tasks: {titles}.
Current Streak: {streak} days.

Task: Write a very short (max 50 words), epic commendation for the user's achievements today.
Use metaphors of battle, leveling up, or cultivation.
Language: Chinese (Simplified).
"
    )
}
