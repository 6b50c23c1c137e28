//! Split-window trend classification.

use serde::{Deserialize, Serialize};

use stockcast_products::SalesObservation;

/// Maximum number of most-recent observations used for trend and base demand.
pub const TREND_WINDOW: usize = 30;

const UP_RATIO: f64 = 1.1;
const DOWN_RATIO: f64 = 0.9;

/// Direction of demand over the trend window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    /// Forecast adjustment applied for this direction.
    pub fn adjustment(self) -> f64 {
        match self {
            Trend::Up => 1.2,
            Trend::Down => 0.8,
            Trend::Stable => 1.0,
        }
    }
}

/// Half-window means plus the resulting classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendStats {
    pub first_half_mean: f64,
    pub second_half_mean: f64,
    pub trend: Trend,
}

impl TrendStats {
    pub fn spread(&self) -> f64 {
        (self.first_half_mean - self.second_half_mean).abs()
    }
}

/// The most recent `TREND_WINDOW` observations (or all of them if fewer).
pub fn trend_window(history: &[SalesObservation]) -> &[SalesObservation] {
    let start = history.len().saturating_sub(TREND_WINDOW);
    &history[start..]
}

/// Classify the trend of `window`.
///
/// The window is split into two contiguous halves of equal length. For an odd
/// length the middle observation belongs to neither half. Fewer than two
/// observations, or an all-zero first half, classify as stable.
pub fn analyze(window: &[SalesObservation]) -> TrendStats {
    let half = window.len() / 2;
    if half == 0 {
        let mean = mean_quantity(window);
        return TrendStats {
            first_half_mean: mean,
            second_half_mean: mean,
            trend: Trend::Stable,
        };
    }

    let first = mean_quantity(&window[..half]);
    let second = mean_quantity(&window[window.len() - half..]);

    let trend = if first <= 0.0 {
        Trend::Stable
    } else if second > first * UP_RATIO {
        Trend::Up
    } else if second < first * DOWN_RATIO {
        Trend::Down
    } else {
        Trend::Stable
    };

    TrendStats {
        first_half_mean: first,
        second_half_mean: second,
        trend,
    }
}

pub(crate) fn mean_quantity(xs: &[SalesObservation]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    total_quantity(xs) as f64 / (xs.len() as f64)
}

pub(crate) fn total_quantity(xs: &[SalesObservation]) -> u64 {
    xs.iter().map(|o| u64::from(o.quantity_sold)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn series(quantities: &[u32]) -> Vec<SalesObservation> {
        let start = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        quantities
            .iter()
            .enumerate()
            .map(|(i, q)| SalesObservation::new(start + Days::new(i as u64), *q))
            .collect()
    }

    #[test]
    fn rising_second_half_is_up() {
        let mut q = vec![2; 15];
        q.extend(vec![3; 15]);
        let stats = analyze(&series(&q));
        assert_eq!(stats.first_half_mean, 2.0);
        assert_eq!(stats.second_half_mean, 3.0);
        assert_eq!(stats.trend, Trend::Up);
        assert_eq!(stats.trend.adjustment(), 1.2);
    }

    #[test]
    fn falling_second_half_is_down() {
        let mut q = vec![10; 15];
        q.extend(vec![8; 15]);
        assert_eq!(analyze(&series(&q)).trend, Trend::Down);
    }

    #[test]
    fn ten_percent_band_is_stable() {
        let mut q = vec![10; 15];
        q.extend(vec![11; 15]);
        assert_eq!(analyze(&series(&q)).trend, Trend::Stable);

        let mut q = vec![10; 15];
        q.extend(vec![9; 15]);
        assert_eq!(analyze(&series(&q)).trend, Trend::Stable);
    }

    #[test]
    fn zero_first_half_defaults_to_stable() {
        let mut q = vec![0; 15];
        q.extend(vec![7; 15]);
        let stats = analyze(&series(&q));
        assert_eq!(stats.trend, Trend::Stable);
        assert_eq!(stats.second_half_mean, 7.0);
    }

    #[test]
    fn short_histories_do_not_fail() {
        assert_eq!(analyze(&[]).trend, Trend::Stable);
        let one = analyze(&series(&[4]));
        assert_eq!(one.trend, Trend::Stable);
        assert_eq!(one.spread(), 0.0);

        // Odd length: middle observation is excluded from both halves.
        let odd = analyze(&series(&[1, 100, 5]));
        assert_eq!(odd.first_half_mean, 1.0);
        assert_eq!(odd.second_half_mean, 5.0);
        assert_eq!(odd.trend, Trend::Up);
    }

    #[test]
    fn window_keeps_only_most_recent_observations() {
        let q: Vec<u32> = (0..45).collect();
        let history = series(&q);
        let window = trend_window(&history);
        assert_eq!(window.len(), TREND_WINDOW);
        assert_eq!(window[0].quantity_sold, 15);
        assert_eq!(trend_window(&history[..10]).len(), 10);
    }
}
