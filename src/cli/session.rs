use std::io::{self, Write};

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    storage::{
        backend::StorageBackend,
        entities::{DayPart, DayRecord},
        record_storage::RecordStore,
    },
    timer::{breath::BreathPhase, shutdown::detect_shutdown, Stopwatch},
    utils::{
        clock::Clock,
        time::{date_to_record_key, format_clock, minutes_from_seconds},
    },
};

use super::update_record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Focus,
    Meditation(DayPart),
}

impl SessionKind {
    fn title(&self) -> &'static str {
        match self {
            SessionKind::Focus => "深度专注",
            SessionKind::Meditation(part) => part.title(),
        }
    }
}

/// Adds a finished session to the record, rounding up to whole minutes. Returns the minutes
/// added.
pub fn credit_session(record: &mut DayRecord, kind: SessionKind, seconds: u64) -> u32 {
    let minutes = minutes_from_seconds(seconds);
    if minutes == 0 {
        return 0;
    }
    match kind {
        SessionKind::Focus => record.focus.minutes = record.focus.minutes.saturating_add(minutes),
        SessionKind::Meditation(part) => record.meditation.add(part, minutes),
    }
    minutes
}

fn print_tick(kind: SessionKind, elapsed: u64) {
    match kind {
        SessionKind::Focus => print!("\r{}", format_clock(elapsed)),
        SessionKind::Meditation(_) => {
            print!("\r{}  {}", format_clock(elapsed), BreathPhase::at(elapsed))
        }
    }
    let _ = io::stdout().flush();
}

/// Runs a stopwatch until Ctrl-C and credits the session to the day it was started on.
pub async fn run_session<B: StorageBackend>(
    store: &RecordStore<B>,
    clock: Box<dyn Clock>,
    kind: SessionKind,
) -> Result<()> {
    let date = date_to_record_key(clock.today());
    println!("{} ({date}), press Ctrl-C to finish", kind.title());

    let shutdown = CancellationToken::new();
    let stopwatch = Stopwatch::new(clock, shutdown.clone());
    let (seconds, _) = tokio::join!(
        stopwatch.run(|elapsed| print_tick(kind, elapsed)),
        detect_shutdown(shutdown),
    );
    println!();

    if seconds == 0 {
        println!("Nothing to record");
        return Ok(());
    }

    let mut added = 0;
    update_record(store, &date, |record| {
        added = credit_session(record, kind, seconds);
        Ok(())
    })?;
    info!("Credited {added} minutes of {kind:?} to {date}");
    println!("+{added} min");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::storage::entities::{DayPart, DayRecord};

    use super::{credit_session, SessionKind};

    #[test]
    fn short_sessions_count_as_a_minute() {
        let mut record = DayRecord::new("2024-01-01");
        assert_eq!(credit_session(&mut record, SessionKind::Focus, 5), 1);
        assert_eq!(record.focus.minutes, 1);
    }

    #[test]
    fn sessions_accumulate() {
        let mut record = DayRecord::new("2024-01-01");
        record.meditation.noon = 10;
        let kind = SessionKind::Meditation(DayPart::Noon);

        assert_eq!(credit_session(&mut record, kind, 121), 3);
        assert_eq!(record.meditation.noon, 13);
        assert_eq!(record.meditation.morning, 0);
    }

    #[test]
    fn empty_session_changes_nothing() {
        let mut record = DayRecord::new("2024-01-01");
        assert_eq!(credit_session(&mut record, SessionKind::Focus, 0), 0);
        assert_eq!(record, DayRecord::new("2024-01-01"));
    }
}
