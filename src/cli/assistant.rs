use chrono::NaiveDate;

use crate::{
    briefing::{generate_daily_briefing, generate_hero_report, TextGenerator},
    storage::{backend::StorageBackend, entities::current_streak, record_storage::RecordStore},
    utils::time::date_to_record_key,
};

use super::save_logged;

/// Generates the briefing for `day` and stores it on the record, whatever text came back.
pub async fn write_briefing<B: StorageBackend, G: TextGenerator + ?Sized>(
    store: &RecordStore<B>,
    generator: &G,
    day: NaiveDate,
) -> String {
    let date = date_to_record_key(day);
    let text = generate_daily_briefing(generator, &store.get_record_for_date(&date)).await;

    let mut latest = store.get_record_for_date(&date);
    latest.ai_briefing = Some(text.clone());
    save_logged(store, &latest);
    text
}

/// Commendation for what was done on `day`, counting the streak up to it.
pub async fn hero_report<B: StorageBackend, G: TextGenerator + ?Sized>(
    store: &RecordStore<B>,
    generator: &G,
    day: NaiveDate,
) -> String {
    let streak = current_streak(&store.get_all_history(), day);
    let record = store.get_record_for_date(&date_to_record_key(day));
    generate_hero_report(generator, &record.habit_tasks(), streak).await
}
