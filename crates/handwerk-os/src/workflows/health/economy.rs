use serde::{Deserialize, Serialize};

use super::calendar::{round_half_up, round_to};

/// Target against actual economics of a project.
///
/// Fields derived from the target stay `None` while no target is set, so a
/// missing target is never confused with zero profit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomySummary {
    pub target_revenue: Option<f64>,
    pub actual_costs: f64,
    pub gross_profit: Option<f64>,
    pub gross_margin_pct: Option<i64>,
}

impl EconomySummary {
    pub fn margin_tier(&self) -> MarginTier {
        MarginTier::from_margin(self.gross_margin_pct)
    }
}

/// Colour band for the gross margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginTier {
    Healthy,
    Moderate,
    Thin,
    Negative,
    Unknown,
}

impl MarginTier {
    pub fn from_margin(margin_pct: Option<i64>) -> Self {
        match margin_pct {
            None => Self::Unknown,
            Some(pct) if pct >= 20 => Self::Healthy,
            Some(pct) if pct >= 10 => Self::Moderate,
            Some(pct) if pct >= 0 => Self::Thin,
            Some(_) => Self::Negative,
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Healthy => "green",
            Self::Moderate => "yellow",
            Self::Thin => "orange",
            Self::Negative => "red",
            Self::Unknown => "gray",
        }
    }
}

pub fn calculate_economy(target_revenue: Option<f64>, actual_costs: f64) -> EconomySummary {
    let gross_profit = target_revenue.map(|target| target - actual_costs);
    let gross_margin_pct = match (target_revenue, gross_profit) {
        (Some(target), Some(profit)) if target != 0.0 => {
            Some(round_half_up(round_to(profit * 100.0 / target, 6)))
        }
        _ => None,
    };

    EconomySummary {
        target_revenue,
        actual_costs,
        gross_profit,
        gross_margin_pct,
    }
}
