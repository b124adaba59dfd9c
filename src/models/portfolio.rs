use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::{AccountType, Restriction};

/// One tax lot inside a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxLot {
    pub lot_id: String,
    pub quantity: f64,
    pub cost_basis_per_share: f64,
    pub acquired_at: DateTime<Utc>,
}

/// A holding inside one account. After normalization `market_value` is
/// always defined: supplied value, else quantity * last price, else 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioPosition {
    pub symbol: String,
    pub quantity: f64,
    pub last_price: Option<f64>,
    pub market_value: f64,
    pub avg_cost: Option<f64>,
    pub sector: Option<String>,
    /// Target weight as a fraction of portfolio value (0-1).
    pub target_weight: Option<f64>,
    /// Max weight as a fraction of portfolio value (0-1).
    pub max_weight: Option<f64>,
    pub tax_lots: Option<Vec<TaxLot>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AccountFees {
    pub commission_per_trade: Option<f64>,
    pub slippage_bps: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioAccount {
    pub account_id: String,
    pub account_type: AccountType,
    pub cash_balance: f64,
    pub fees: Option<AccountFees>,
    pub restrictions: Option<Vec<Restriction>>,
    pub positions: Vec<PortfolioPosition>,
}

/// Point-in-time portfolio across one or more accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub as_of: DateTime<Utc>,
    pub base_currency: String,
    pub accounts: Vec<PortfolioAccount>,
}

/// A position joined with its owning account, for engines that work over
/// all holdings regardless of account boundaries.
#[derive(Debug, Clone)]
pub struct FlatPosition<'a> {
    pub position: &'a PortfolioPosition,
    pub account_id: &'a str,
    pub account_type: AccountType,
}
