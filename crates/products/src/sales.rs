use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Season label attached to a sales observation (display/reporting only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl core::fmt::Display for Season {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        };
        f.write_str(s)
    }
}

/// One day of recorded sales for a single product.
///
/// Immutable once recorded. Sequences are ordered oldest-to-newest with at most
/// one observation per calendar day; gaps between days are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesObservation {
    pub date: NaiveDate,
    pub quantity_sold: u32,
    /// Revenue in smallest currency unit. Informational only.
    #[serde(default)]
    pub revenue: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<bool>,
}

impl SalesObservation {
    pub fn new(date: NaiveDate, quantity_sold: u32) -> Self {
        Self {
            date,
            quantity_sold,
            revenue: 0,
            season: None,
            promotion: None,
        }
    }

    pub fn with_revenue(mut self, revenue: u64) -> Self {
        self.revenue = revenue;
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_promotion(mut self, promotion: bool) -> Self {
        self.promotion = Some(promotion);
        self
    }
}
