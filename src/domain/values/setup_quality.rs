use serde::{Deserialize, Serialize};
use std::fmt;

/// Pre-trade setup score on a 1-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SetupQuality(u8);

impl SetupQuality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, String> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(format!(
                "Setup quality must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            ));
        }
        Ok(SetupQuality(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Lower bound of the width-2 bucket this score falls in (0, 2, 4, ...).
    pub fn bucket_floor(&self) -> u8 {
        (self.0 / 2) * 2
    }
}

impl TryFrom<u8> for SetupQuality {
    type Error = String;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SetupQuality::new(value)
    }
}

impl From<SetupQuality> for u8 {
    fn from(q: SetupQuality) -> Self {
        q.0
    }
}

impl fmt::Display for SetupQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

impl Default for SetupQuality {
    fn default() -> Self {
        SetupQuality(5)
    }
}
