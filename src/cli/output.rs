use ansi_term::{Colour, Style};

use crate::storage::entities::{DayPart, DayRecord};

/// Short colored label for something checked in during a day.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub label: String,
    pub colour: Colour,
}

impl Tag {
    fn new(label: impl Into<String>, colour: Colour) -> Self {
        Self {
            label: label.into(),
            colour,
        }
    }

    fn paint(&self) -> String {
        self.colour.paint(format!("[{}]", self.label)).to_string()
    }
}

pub fn record_tags(record: &DayRecord) -> Vec<Tag> {
    let mut tags = vec![];
    if record.diet.standard_breakfast {
        tags.push(Tag::new("标准早餐", Colour::Green));
    }
    if record.diet.standard_lunch {
        tags.push(Tag::new("标准午餐", Colour::Green));
    }
    if record.diet.no_dinner {
        tags.push(Tag::new("过午不食", Colour::Blue));
    }
    if record.exercise.jin_gang_gong {
        tags.push(Tag::new("金刚功", Colour::Yellow));
    }
    if record.exercise.strength_training {
        tags.push(Tag::new("力量训练", Colour::Red));
    }
    for (part, colour) in [
        (DayPart::Morning, Colour::Purple),
        (DayPart::Noon, Colour::Yellow),
        (DayPart::Evening, Colour::Blue),
    ] {
        let minutes = record.meditation.get(part);
        if minutes > 0 {
            tags.push(Tag::new(format!("{} {minutes}m", part.short_label()), colour));
        }
    }
    if record.focus.minutes > 0 {
        tags.push(Tag::new(format!("日语 {}m", record.focus.minutes), Colour::Cyan));
    }
    tags
}

fn format_weight(weight: Option<f64>) -> String {
    weight
        .map(|w| format!("{w} kg"))
        .unwrap_or_else(|| "-- kg".to_string())
}

/// One history entry: date and weight, then tags, then notes if there are any.
pub fn format_history_entry(record: &DayRecord) -> String {
    let mut lines = vec![format!(
        "{}\t{}",
        Style::new().bold().paint(record.date.as_str()),
        format_weight(record.weight)
    )];

    if record.has_data() {
        lines.push(
            record_tags(record)
                .iter()
                .map(Tag::paint)
                .collect::<Vec<_>>()
                .join(" "),
        );
    } else {
        lines.push(Colour::Fixed(8).italic().paint("-- 暂无打卡 --").to_string());
    }

    if !record.focus.notes.is_empty() {
        lines.push(format!("  {}", record.focus.notes));
    }
    lines.join("\n")
}

fn check(value: bool) -> &'static str {
    if value {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Full view of a day.
pub fn format_record(record: &DayRecord) -> String {
    let mut lines = vec![
        Style::new().bold().paint(record.date.as_str()).to_string(),
        format!(
            "饮食纪律\t{} 标准早餐  {} 标准午餐  {} 过午不食",
            check(record.diet.standard_breakfast),
            check(record.diet.standard_lunch),
            check(record.diet.no_dinner)
        ),
        format!(
            "身体修炼\t{} 金刚功  {} 力量训练  体重 {}",
            check(record.exercise.jin_gang_gong),
            check(record.exercise.strength_training),
            format_weight(record.weight)
        ),
        format!(
            "静心冥想\t晨 {}m  午 {}m  晚 {}m",
            record.meditation.morning, record.meditation.noon, record.meditation.evening
        ),
        format!("日语学习\t{}m", record.focus.minutes),
    ];
    if !record.focus.notes.is_empty() {
        lines.push(format!("学习笔记\t{}", record.focus.notes));
    }
    if let Some(briefing) = &record.ai_briefing {
        lines.push(format!("AI 简报\t{briefing}"));
    }
    lines.join("\n")
}
