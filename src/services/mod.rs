pub mod analysis;
pub mod decision_log;
pub mod drift_monitor;
pub mod fundamentals;
pub mod indicators;
pub mod ips;
pub mod normalize;
pub mod portfolio_review;
pub mod position_strategy;
pub mod rebalance;
pub mod report;
pub mod resolvers;
pub mod review_packet;
pub mod risk_monitor;
pub mod risk_templates;
pub mod stress_test;
pub mod suitability;
pub mod summary;

pub use analysis::{run_market_analysis, AnalysisRequest, DEFAULT_CANDLE_LIMIT};
pub use decision_log::{build_decision_log, DecisionLogInput};
pub use drift_monitor::build_drift_report;
pub use fundamentals::{fetch_fundamentals, normalize_fundamentals};
pub use indicators::{compute_indicator_set, MIN_REQUIRED_CANDLES};
pub use ips::build_investment_policy_statement;
pub use normalize::{
    flatten_positions, normalize_goals, normalize_portfolio, normalize_profile,
    portfolio_cash_value, portfolio_market_value, portfolio_total_value,
};
pub use portfolio_review::build_portfolio_review;
pub use position_strategy::{build_position_strategy, PositionStrategyInput};
pub use rebalance::{build_rebalance_plan, RebalanceInput, DEFAULT_MIN_TRADE_VALUE};
pub use report::generate_report;
pub use resolvers::{resolve_fundamentals, resolve_portfolio, resolve_profile};
pub use review_packet::{build_review_packet, ReviewPacketInput};
pub use risk_monitor::{build_risk_monitor, RiskMonitorInput};
pub use risk_templates::{default_template, resolve_template, resolve_thresholds};
pub use stress_test::build_stress_test;
pub use suitability::{build_suitability_assessment, PositionContext};
pub use summary::{build_advisory_summary, SummaryInput};
