use serde::{Deserialize, Serialize};

/// What a shock applies to. Market-bucket "all" hits every position;
/// symbol and sector shocks stack on top.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "target_type", content = "target", rename_all = "kebab-case")]
pub enum ShockTarget {
    Symbol(String),
    Sector(String),
    MarketBucket(String),
}

/// A hypothetical percent price change applied to one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressShock {
    #[serde(flatten)]
    pub target: ShockTarget,
    pub pct_change: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressScenario {
    pub name: String,
    pub shocks: Vec<StressShock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressContributor {
    pub symbol: String,
    pub account_id: String,
    pub estimated_pnl: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressScenarioResult {
    pub name: String,
    pub estimated_portfolio_change_pct: f64,
    pub estimated_pnl: f64,
    /// Up to three contributors, worst P&L first.
    pub top_loss_contributors: Vec<StressContributor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressTestResult {
    pub scenario_results: Vec<StressScenarioResult>,
    pub worst_scenario: StressScenarioResult,
    pub key_vulnerabilities: Vec<String>,
}
