use serde::{Deserialize, Serialize};

/// Cut-offs separating yellow from red signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthThresholds {
    /// Booked hours above plan by more than this share turn the signal red.
    pub time_red_overrun_pct: f64,
    /// Days before the end date from which a deadline counts as at risk.
    pub deadline_window_days: i64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            time_red_overrun_pct: 0.20,
            deadline_window_days: 7,
        }
    }
}
