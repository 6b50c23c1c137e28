use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use stockcast_core::DomainError;

/// Forward-looking window a forecast covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Week,
    #[default]
    Month,
    Quarter,
}

impl Horizon {
    pub fn days(self) -> u32 {
        match self {
            Horizon::Week => 7,
            Horizon::Month => 30,
            Horizon::Quarter => 90,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Horizon::Week => "week",
            Horizon::Month => "month",
            Horizon::Quarter => "quarter",
        }
    }
}

impl core::fmt::Display for Horizon {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Horizon {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Horizon::Week),
            "month" => Ok(Horizon::Month),
            "quarter" => Ok(Horizon::Quarter),
            other => Err(DomainError::validation(format!(
                "unknown horizon '{other}' (expected week, month or quarter)"
            ))),
        }
    }
}

/// Parameters of one analysis run.
///
/// `generated_at` pins "now" for the run: its calendar date drives seasonality
/// and it is stamped on every alert, so identical requests reproduce identical
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub horizon: Horizon,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisRequest {
    pub fn new(horizon: Horizon, generated_at: DateTime<Utc>) -> Self {
        Self {
            horizon,
            generated_at,
        }
    }

    /// Request for `horizon` as of the current wall-clock time.
    pub fn now(horizon: Horizon) -> Self {
        Self::new(horizon, Utc::now())
    }

    pub fn as_of(&self) -> NaiveDate {
        self.generated_at.date_naive()
    }
}
