mod advisory;
mod drift;
mod fundamentals;
mod market;
mod policy;
mod portfolio;
mod profile;
mod rebalance;
mod reporting;
mod review;
mod risk;
mod strategy;
mod stress;

pub use advisory::{ArtifactKind, ArtifactRef, Computed, Coverage, Envelope, SummaryPart, DISCLAIMER};
pub use drift::{DriftAction, DriftBreach, DriftKind, DriftPriorityItem, DriftReport, DriftSeverity};
pub use fundamentals::{
    FieldKind, FieldMetadata, FieldMetadataMap, FundamentalsArtifact, FundamentalsSection,
    FundamentalsSnapshot, NormalizedFundamentals, NormalizedUnit,
};
pub use market::{
    AnalysisContext, AnalysisReport, Candle, IndicatorSet, MarketData, ReportConfidence, Timeframe,
};
pub use policy::{
    BenchmarkPolicy, Cadence, ExecutionConstraints, InvestmentPolicyStatement, PositionTarget,
    RangePct, RebalanceConstraints, TargetPolicy,
};
pub use portfolio::{
    AccountFees, FlatPosition, PortfolioAccount, PortfolioPosition, PortfolioSnapshot, TaxLot,
};
pub use profile::{
    AccountType, ClientGoals, FinancialGoal, GoalPriority, InvestmentHorizon, InvestmentObjective,
    InvestorProfile, LiquidityNeeds, Restriction, RiskTolerance, TaxProfile,
};
pub use rebalance::{
    RebalancePlan, RebalanceTargetRange, RebalanceTradeItem, TradeAction, TradePriority,
};
pub use reporting::{
    ActionsSnapshot, AdvisorySummary, AuditEnvelope, AuditRequest, ClientSnapshot, ComplianceBlock,
    DecisionLog, MonitoringSnapshot, PolicySnapshot, ReviewPacket,
};
pub use review::PortfolioReview;
pub use risk::{
    RiskBudgetMonitor, RiskFlag, RiskSeverity, RiskThresholdTemplate, RiskThresholds,
    SeverityMargins,
};
pub use strategy::{FitLevel, PositionStrategyPlan, SuitabilityAssessment, SuitabilitySummary};
pub use stress::{
    ShockTarget, StressContributor, StressScenario, StressScenarioResult, StressShock,
    StressTestResult,
};
