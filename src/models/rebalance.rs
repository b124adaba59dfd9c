use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Add,
    Trim,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TradeAction::Add => "add",
            TradeAction::Trim => "trim",
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TradePriority {
    Low,
    Medium,
    High,
}

/// Resolved target range for one position at plan time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceTargetRange {
    pub symbol: String,
    pub current_weight_pct: f64,
    pub target_min_pct: f64,
    pub target_max_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceTradeItem {
    pub symbol: String,
    pub account_id: String,
    pub action: TradeAction,
    pub priority: TradePriority,
    pub estimated_trade_value: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalancePlan {
    pub target_ranges: Vec<RebalanceTargetRange>,
    /// Sorted by descending estimated trade value.
    pub trade_priority_queue: Vec<RebalanceTradeItem>,
    pub deferred_actions: Vec<String>,
    pub tax_impact_notes: Vec<String>,
    pub execution_conditions: Vec<String>,
}
