use std::time::Duration;

/// Thresholds for inventory-state alerts.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertThresholds {
    /// `low_stock` escalates to high severity below `min_stock * critical_stock_ratio`.
    pub critical_stock_ratio: f64,
    /// Number of most recent observations that define short-term sales velocity.
    pub velocity_window: usize,
    /// `stockout_risk` fires when days left at recent velocity is at or below this.
    pub stockout_risk_days: f64,
    /// `stockout_risk` is high severity at or below this many days.
    pub stockout_critical_days: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            critical_stock_ratio: 0.5,
            velocity_window: 7,
            stockout_risk_days: 5.0,
            stockout_critical_days: 2.0,
        }
    }
}

/// Engine-wide policy knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPolicy {
    pub alerts: AlertThresholds,
    /// A prediction is flagged as an imminent stockout below this many days.
    pub stockout_warning_days: u64,
    /// Also derive `order_suggestion` / `high_demand` alerts from predictions.
    pub forecast_alerts: bool,
    /// Wall-clock time an analysis is held in `Analyzing` before publishing.
    pub simulated_latency: Duration,
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self {
            alerts: AlertThresholds::default(),
            stockout_warning_days: 10,
            forecast_alerts: false,
            simulated_latency: Duration::ZERO,
        }
    }
}

impl ForecastPolicy {
    pub fn with_alert_thresholds(mut self, alerts: AlertThresholds) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn with_stockout_warning_days(mut self, days: u64) -> Self {
        self.stockout_warning_days = days;
        self
    }

    pub fn with_forecast_alerts(mut self, enabled: bool) -> Self {
        self.forecast_alerts = enabled;
        self
    }

    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }
}
