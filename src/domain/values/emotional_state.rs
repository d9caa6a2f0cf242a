use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the trader felt when taking the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalState {
    #[default]
    Calm,
    Anxious,
    Excited,
    Frustrated,
    Confident,
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmotionalState::Calm => write!(f, "calm"),
            EmotionalState::Anxious => write!(f, "anxious"),
            EmotionalState::Excited => write!(f, "excited"),
            EmotionalState::Frustrated => write!(f, "frustrated"),
            EmotionalState::Confident => write!(f, "confident"),
        }
    }
}

impl FromStr for EmotionalState {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "calm" => Ok(EmotionalState::Calm),
            "anxious" => Ok(EmotionalState::Anxious),
            "excited" => Ok(EmotionalState::Excited),
            "frustrated" => Ok(EmotionalState::Frustrated),
            "confident" => Ok(EmotionalState::Confident),
            _ => Err(format!("Unknown emotional state: {s}")),
        }
    }
}
