//! Personal daily habit tracker. Diet, exercise, meditation and study check-ins are kept as one
//! record per calendar day, with stopwatch sessions and generated reviews on top.
//!

pub mod briefing;
pub mod cli;
pub mod storage;
pub mod timer;
pub mod utils;
