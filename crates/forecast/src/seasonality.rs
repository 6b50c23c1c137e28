//! Calendar-driven seasonal demand effects.

use chrono::{Datelike, NaiveDate};

use stockcast_products::{SalesObservation, Season};

/// Demand multiplier for the month containing `date`.
///
/// Nov–Dec peak at 1.5x, Jan–Feb trough at 0.7x, every other month is neutral.
pub fn multiplier(date: NaiveDate) -> f64 {
    match date.month() {
        11 | 12 => 1.5,
        1 | 2 => 0.7,
        _ => 1.0,
    }
}

/// Meteorological season for `date` (labelling only; does not feed the multiplier).
pub fn season_label(date: NaiveDate) -> Season {
    match date.month() {
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        9..=11 => Season::Autumn,
        _ => Season::Winter,
    }
}

/// Copy of `observation` labelled with its season.
pub fn annotate(observation: &SalesObservation) -> SalesObservation {
    observation
        .clone()
        .with_season(season_label(observation.date))
}
