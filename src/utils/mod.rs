pub mod clock;
pub mod config;
pub mod dir;
pub mod logging;
pub mod time;
