use serde::{Deserialize, Serialize};

use super::profile::{InvestmentHorizon, InvestmentObjective, RiskTolerance};

/// Inclusive percentage range on the 0-100 scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RangePct {
    pub min: f64,
    pub max: f64,
}

impl RangePct {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Policy the portfolio review benchmarks against when no IPS is in play.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BenchmarkPolicy {
    pub min_cash_pct: Option<f64>,
    pub max_cash_pct: Option<f64>,
    pub single_position_max_pct: Option<f64>,
    pub sector_max_pct: Option<f64>,
}

/// Per-symbol weight target. A target weight implies a +/- 2.5 point band;
/// explicit min/max bounds are used as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionTarget {
    pub symbol: String,
    pub target_weight_pct: Option<f64>,
    pub min_weight_pct: Option<f64>,
    pub max_weight_pct: Option<f64>,
}

/// Target allocation policy consumed by the drift monitor and rebalancer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TargetPolicy {
    pub cash_target_range_pct: Option<RangePct>,
    pub single_position_max_pct: Option<f64>,
    pub sector_max_pct: Option<f64>,
    pub position_targets: Option<Vec<PositionTarget>>,
}

impl TargetPolicy {
    pub fn find_target(&self, symbol: &str) -> Option<&PositionTarget> {
        self.position_targets
            .as_deref()?
            .iter()
            .find(|target| target.symbol.eq_ignore_ascii_case(symbol))
    }
}

/// Hard constraints on rebalance trade generation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RebalanceConstraints {
    pub min_trade_value: Option<f64>,
    pub blacklist_symbols: Option<Vec<String>>,
    pub no_sell_symbols: Option<Vec<String>>,
    pub allow_taxable_sales: Option<bool>,
}

/// Execution-level constraints on a single-position strategy.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExecutionConstraints {
    pub min_trade_value: Option<f64>,
    pub avoid_selling: Option<bool>,
    pub blacklist_symbols: Option<Vec<String>>,
    pub no_margin: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Monthly,
    Quarterly,
}

/// Investment Policy Statement: target ranges and trading rules derived
/// from the investor profile and client goals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentPolicyStatement {
    pub risk_profile_tier: RiskTolerance,
    pub investment_horizon: InvestmentHorizon,
    pub objectives: Vec<InvestmentObjective>,
    pub target_return_range_pct: RangePct,
    pub max_acceptable_drawdown_pct: f64,
    pub cash_target_range_pct: RangePct,
    pub single_position_max_pct: f64,
    pub sector_max_pct: f64,
    pub rebalance_frequency: Cadence,
    pub review_cadence: Cadence,
    pub trading_rules: Vec<String>,
    pub constraints: Vec<String>,
    pub assumptions: Vec<String>,
    pub disclaimer: String,
}
