use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::profile::RiskTolerance;

/// Threshold set for one risk tier.
///
/// Percentage values are on the 0-100 scale; volatility is an annualized
/// fraction (e.g. 0.45 for 45%).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskThresholds {
    pub max_single_position_pct: f64,
    pub max_sector_pct: f64,
    pub max_volatility_annualized: f64,
    pub max_drawdown_pct: f64,
    pub min_cash_pct: f64,
    pub max_cash_pct: f64,
    pub max_stress_loss_pct: f64,
}

/// Versioned per-tier threshold table. The registry owns one built-in
/// default; callers may supply a full replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskThresholdTemplate {
    pub template_id: String,
    pub version: String,
    pub tiers: BTreeMap<RiskTolerance, RiskThresholds>,
    pub notes: Option<String>,
}

impl RiskTolerance {
    /// BTreeMap key ordering for template tiers.
    fn rank(&self) -> u8 {
        match self {
            RiskTolerance::Conservative => 0,
            RiskTolerance::Moderate => 1,
            RiskTolerance::Aggressive => 2,
        }
    }
}

impl Ord for RiskTolerance {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for RiskTolerance {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Severity of one risk flag. Ordered: info < warning < critical.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RiskSeverity {
    Info,
    Warning,
    Critical,
}

/// One triggered (or informational) risk-budget check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFlag {
    pub code: String,
    pub severity: RiskSeverity,
    pub message: String,
    pub metric: Option<f64>,
    pub threshold: Option<f64>,
}

/// How far past a threshold a metric must land before the flag escalates
/// from warning to critical. Margins are policy, not physics; override as
/// needed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeverityMargins {
    pub single_position_pct: f64,
    pub sector_pct: f64,
    pub volatility: f64,
    pub drawdown_pct: f64,
    pub stress_loss_pct: f64,
}

impl Default for SeverityMargins {
    fn default() -> Self {
        Self {
            single_position_pct: 5.0,
            sector_pct: 7.0,
            volatility: 0.12,
            drawdown_pct: 8.0,
            stress_loss_pct: 8.0,
        }
    }
}

/// Result of one risk-budget monitoring pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBudgetMonitor {
    pub risk_tier: RiskTolerance,
    pub thresholds: RiskThresholds,
    pub template_id: String,
    pub template_version: String,
    pub flags: Vec<RiskFlag>,
    pub overall_severity: RiskSeverity,
    pub summary: String,
}
