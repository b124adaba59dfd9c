use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::policy::{Cadence, RangePct};
use super::profile::{InvestmentHorizon, RiskTolerance};
use super::risk::RiskSeverity;

/// Advisor rationale record for one recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionLog {
    pub decision_summary: String,
    pub recommendation: String,
    pub evidence: Vec<String>,
    pub constraints: Vec<String>,
    pub related_artifact_ids: Vec<String>,
    pub disclaimer: String,
    pub logged_at: DateTime<Utc>,
}

/// Client-facing digest of the current monitoring artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewPacket {
    pub headline: String,
    pub key_updates: Vec<String>,
    pub risk_alerts: Vec<String>,
    pub recommended_actions: Vec<String>,
    pub client_questions: Vec<String>,
    pub disclaimer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSnapshot {
    pub client_label: Option<String>,
    pub risk_tier: Option<RiskTolerance>,
    pub investment_horizon: Option<InvestmentHorizon>,
    pub goal_labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub target_return_range_pct: RangePct,
    pub max_acceptable_drawdown_pct: f64,
    pub cash_target_range_pct: RangePct,
    pub single_position_max_pct: f64,
    pub sector_max_pct: f64,
    pub rebalance_frequency: Cadence,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSnapshot {
    pub risk_severity: Option<RiskSeverity>,
    pub risk_flag_count: usize,
    pub risk_template_id: Option<String>,
    pub risk_template_version: Option<String>,
    pub drift_breach_count: usize,
    pub worst_stress_scenario: Option<String>,
    pub worst_stress_loss_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsSnapshot {
    pub priority_actions: Vec<String>,
    pub client_actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceBlock {
    pub disclaimer: String,
    pub decision_log_id: Option<Uuid>,
    pub evidence_summary: Vec<String>,
}

/// Caller opt-in for the audit envelope on the summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditRequest {
    pub run_id: Option<String>,
    pub workflow: Option<String>,
    pub artifact_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEnvelope {
    pub run_id: String,
    pub workflow: String,
    pub generated_at: DateTime<Utc>,
    pub coverage: super::advisory::Coverage,
    pub warnings_count: usize,
    pub template_id: Option<String>,
    pub template_version: Option<String>,
    pub artifact_ids: Vec<String>,
}

/// Aggregated cross-artifact summary. Coverage is the worst coverage among
/// the enveloped inputs that were supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorySummary {
    pub generated_at: DateTime<Utc>,
    pub coverage: super::advisory::Coverage,
    pub warnings: Vec<String>,
    pub client: ClientSnapshot,
    pub policy: Option<PolicySnapshot>,
    pub monitoring: MonitoringSnapshot,
    pub actions: ActionsSnapshot,
    pub compliance: ComplianceBlock,
    pub audit: Option<AuditEnvelope>,
}
