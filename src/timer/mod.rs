//! Stopwatch sessions for focus study and meditation. A session only measures time, crediting
//! the minutes to a record is up to the caller.

pub mod breath;
pub mod shutdown;

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::utils::clock::Clock;

const TICK: Duration = Duration::from_secs(1);

pub struct Stopwatch {
    clock: Box<dyn Clock>,
    shutdown: CancellationToken,
}

impl Stopwatch {
    pub fn new(clock: Box<dyn Clock>, shutdown: CancellationToken) -> Self {
        Self { clock, shutdown }
    }

    /// Counts whole seconds until `shutdown` is cancelled and returns them. `on_tick` receives
    /// the elapsed seconds after each one.
    pub async fn run(self, mut on_tick: impl FnMut(u64)) -> u64 {
        let mut elapsed = 0;
        let mut next_tick = self.clock.instant();
        loop {
            next_tick += TICK;

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Session stopped after {elapsed} seconds");
                    return elapsed;
                }
                _ = self.clock.sleep_until(next_tick) => {
                    elapsed += 1;
                    debug!("Tick {elapsed}");
                    on_tick(elapsed);
                }
            }
        }
    }
}
