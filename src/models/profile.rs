use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::policy::RangePct;

/// Investor risk tolerance; also the tier key into risk threshold templates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl std::fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RiskTolerance::Conservative => "conservative",
            RiskTolerance::Moderate => "moderate",
            RiskTolerance::Aggressive => "aggressive",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentHorizon {
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentObjective {
    Income,
    Growth,
    CapitalPreservation,
    Speculation,
    Diversification,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LiquidityNeeds {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Taxable,
    Ira,
    Roth,
    #[serde(rename = "401k")]
    K401,
    Other,
}

/// Free-form investor restriction, e.g. kind "sector-ban" with value
/// "Technology" or kind "no-buy" with a symbol list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restriction {
    pub kind: String,
    pub value: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaxProfile {
    pub federal_bracket_pct: Option<f64>,
    pub state_bracket_pct: Option<f64>,
    pub short_term_gain_sensitive: Option<bool>,
    pub long_term_gain_sensitive: Option<bool>,
    pub prefers_tax_loss_harvesting: Option<bool>,
}

/// Investor profile. Immutable once normalized (strings trimmed,
/// objectives and account types deduplicated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorProfile {
    pub client_label: Option<String>,
    pub risk_tolerance: RiskTolerance,
    pub investment_horizon: InvestmentHorizon,
    pub objectives: Vec<InvestmentObjective>,
    pub liquidity_needs: LiquidityNeeds,
    pub max_drawdown_tolerance_pct: Option<f64>,
    pub account_types: Option<Vec<AccountType>>,
    pub restrictions: Option<Vec<Restriction>>,
    pub tax_profile: Option<TaxProfile>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    Medium,
    High,
}

/// One client financial goal, e.g. "retirement income at 60".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialGoal {
    pub goal_id: Option<String>,
    pub label: String,
    pub target_amount: Option<f64>,
    pub target_date: Option<DateTime<Utc>>,
    pub priority: Option<GoalPriority>,
    pub notes: Option<String>,
}

/// Client goal set feeding the IPS builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientGoals {
    pub planning_horizon_years: Option<f64>,
    pub target_return_range_pct: Option<RangePct>,
    pub max_loss_tolerance_pct: Option<f64>,
    pub liquidity_buffer_pct: Option<f64>,
    pub goals: Vec<FinancialGoal>,
    pub cash_flow_plan: Option<String>,
    pub restrictions: Option<Vec<Restriction>>,
    pub notes: Option<String>,
}
