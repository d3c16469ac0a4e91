//! Short natural-language summaries produced by an external text generation service. Nothing
//! here ever fails outward: every error turns into a fixed fallback text.

pub mod gemini;
pub mod prompt;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

use crate::storage::entities::{DayRecord, Task};

use prompt::{daily_briefing_prompt, hero_report_prompt};

pub const ASSISTANT_NOT_READY: &str = "AI 助手准备中...";
pub const BRIEFING_EMPTY: &str = "道阻且长，行则将至。";
pub const BRIEFING_FAILED: &str = "心静自然凉，数据已记录。";
pub const HERO_RESTING: &str = "今日英雄正在休整，暂无事迹记录。";
pub const HERO_EMPTY: &str = "今日胜绩已载入史册。";
pub const HERO_FAILED: &str = "英雄无言，行胜于言。";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("service responded with {status}: {body}")]
    Status { status: u16, body: String },
}

/// Anything able to turn a prompt into text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

fn resolve(result: Result<String, GenerationError>, empty: &str, failed: &str) -> String {
    match result {
        Ok(text) if text.trim().is_empty() => empty.to_string(),
        Ok(text) => text.trim().to_string(),
        Err(GenerationError::MissingApiKey) => {
            error!("API key not found in environment variables");
            ASSISTANT_NOT_READY.to_string()
        }
        Err(e) => {
            error!("Text generation failed {e:?}");
            failed.to_string()
        }
    }
}

/// Review of a single day.
pub async fn generate_daily_briefing<G: TextGenerator + ?Sized>(
    generator: &G,
    record: &DayRecord,
) -> String {
    info!("Requesting briefing for {}", record.date);
    let result = generator.generate(&daily_briefing_prompt(record)).await;
    resolve(result, BRIEFING_EMPTY, BRIEFING_FAILED)
}

/// Commendation for the completed part of `tasks`. Without completed tasks the service isn't
/// asked at all.
pub async fn generate_hero_report<G: TextGenerator + ?Sized>(
    generator: &G,
    tasks: &[Task],
    streak: u32,
) -> String {
    let completed = tasks
        .iter()
        .filter(|task| task.completed)
        .cloned()
        .collect::<Vec<_>>();
    if completed.is_empty() {
        return HERO_RESTING.to_string();
    }

    info!("Requesting hero report for {} tasks", completed.len());
    let result = generator
        .generate(&hero_report_prompt(&completed, streak))
        .await;
    resolve(result, HERO_EMPTY, HERO_FAILED)
}

#[cfg(test)]
mod tests {
    use mockall::predicate::function;

    use crate::storage::entities::DayRecord;

    use super::{
        generate_daily_briefing, generate_hero_report, GenerationError, MockTextGenerator,
        ASSISTANT_NOT_READY, BRIEFING_EMPTY, BRIEFING_FAILED, HERO_EMPTY, HERO_FAILED,
        HERO_RESTING,
    };

    fn generator_returning(
        result: fn() -> Result<String, GenerationError>,
    ) -> MockTextGenerator {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(move |_| result());
        generator
    }

    #[tokio::test]
    async fn briefing_is_trimmed() {
        let generator = generator_returning(|| Ok("  气定神闲。\n".into()));
        let text = generate_daily_briefing(&generator, &DayRecord::new("2024-01-01")).await;
        assert_eq!(text, "气定神闲。");
    }

    #[tokio::test]
    async fn briefing_fallbacks() {
        let record = DayRecord::new("2024-01-01");

        let empty = generator_returning(|| Ok("   ".into()));
        assert_eq!(generate_daily_briefing(&empty, &record).await, BRIEFING_EMPTY);

        let failing = generator_returning(|| {
            Err(GenerationError::Status {
                status: 500,
                body: "boom".into(),
            })
        });
        assert_eq!(generate_daily_briefing(&failing, &record).await, BRIEFING_FAILED);

        let keyless = generator_returning(|| Err(GenerationError::MissingApiKey));
        assert_eq!(
            generate_daily_briefing(&keyless, &record).await,
            ASSISTANT_NOT_READY
        );
    }

    #[tokio::test]
    async fn briefing_prompt_carries_the_date() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .with(function(|prompt: &str| prompt.contains("2024-03-08")))
            .times(1)
            .returning(|_| Ok("ok".into()));

        generate_daily_briefing(&generator, &DayRecord::new("2024-03-08")).await;
    }

    #[tokio::test]
    async fn resting_hero_skips_the_service() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().times(0);

        let tasks = DayRecord::new("2024-01-01").habit_tasks();
        assert_eq!(generate_hero_report(&generator, &tasks, 3).await, HERO_RESTING);
    }

    #[tokio::test]
    async fn hero_report_only_mentions_completed_tasks() {
        let mut record = DayRecord::new("2024-01-01");
        record.exercise.jin_gang_gong = true;

        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .with(function(|prompt: &str| {
                prompt.contains("completed these tasks: 金刚功.") && prompt.contains("Streak: 9")
            }))
            .times(1)
            .returning(|_| Ok("破阵而出。".into()));

        let text = generate_hero_report(&generator, &record.habit_tasks(), 9).await;
        assert_eq!(text, "破阵而出。");
    }

    #[tokio::test]
    async fn hero_report_fallbacks() {
        let mut record = DayRecord::new("2024-01-01");
        record.diet.no_dinner = true;
        let tasks = record.habit_tasks();

        let empty = generator_returning(|| Ok(String::new()));
        assert_eq!(generate_hero_report(&empty, &tasks, 1).await, HERO_EMPTY);

        let failing = generator_returning(|| {
            Err(GenerationError::Status {
                status: 429,
                body: "slow down".into(),
            })
        });
        assert_eq!(generate_hero_report(&failing, &tasks, 1).await, HERO_FAILED);
    }
}
