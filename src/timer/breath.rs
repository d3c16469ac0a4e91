use std::fmt::Display;

const CYCLE_SECONDS: u64 = 10;
const INHALE_SECONDS: u64 = 4;
const HOLD_SECONDS: u64 = 2;

/// Breathing guide shown during meditation. One cycle lasts 10 seconds: 4 inhaling, 2 holding,
/// 4 exhaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
}

impl BreathPhase {
    pub fn at(elapsed_seconds: u64) -> Self {
        match elapsed_seconds % CYCLE_SECONDS {
            s if s < INHALE_SECONDS => BreathPhase::Inhale,
            s if s < INHALE_SECONDS + HOLD_SECONDS => BreathPhase::Hold,
            _ => BreathPhase::Exhale,
        }
    }
}

impl Display for BreathPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreathPhase::Inhale => write!(f, "吸 气"),
            BreathPhase::Hold => write!(f, "屏 息"),
            BreathPhase::Exhale => write!(f, "呼 气"),
        }
    }
}
