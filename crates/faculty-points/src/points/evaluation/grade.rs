use serde::{Deserialize, Serialize};

/// Qualitative band for an achievement percentage. Lower edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    NeedsImprovement,
    Acceptable,
    Good,
    VeryGood,
    Excellent,
}

impl Grade {
    pub const fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Self::Excellent,
            75..=89 => Self::VeryGood,
            60..=74 => Self::Good,
            50..=59 => Self::Acceptable,
            _ => Self::NeedsImprovement,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Acceptable => "Acceptable",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}
