use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standing non-advice disclaimer attached to every client-facing artifact.
pub const DISCLAIMER: &str = "For research and educational purposes only, not investment advice.";

/// Confidence level of a computed artifact.
///
/// Ordered: `Placeholder < Partial < Full`. Coverage only ever degrades:
/// a missing required input lowers `Full` to `Partial`, and total absence
/// of real data yields `Placeholder`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    Placeholder,
    Partial,
    Full,
}

impl Coverage {
    /// Worst coverage wins when rolling up multiple artifacts.
    pub fn worst(levels: impl IntoIterator<Item = Coverage>) -> Coverage {
        levels.into_iter().min().unwrap_or(Coverage::Full)
    }
}

/// Discriminates the artifact caches and the per-kind not-found codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Profile,
    Portfolio,
    Fundamentals,
    Assessment,
    PositionPlan,
    PortfolioReview,
    StressTest,
    RebalancePlan,
    Goals,
    Ips,
    DriftReport,
    RiskMonitor,
    ReviewPacket,
    DecisionLog,
    Summary,
}

impl ArtifactKind {
    pub fn not_found_code(&self) -> &'static str {
        match self {
            ArtifactKind::Profile => "ADVISORY_PROFILE_NOT_FOUND",
            ArtifactKind::Portfolio => "PORTFOLIO_STATE_NOT_FOUND",
            ArtifactKind::Fundamentals => "FUNDAMENTALS_STATE_NOT_FOUND",
            ArtifactKind::Assessment => "ASSESSMENT_NOT_FOUND",
            ArtifactKind::PositionPlan => "POSITION_PLAN_NOT_FOUND",
            ArtifactKind::PortfolioReview => "PORTFOLIO_REVIEW_NOT_FOUND",
            ArtifactKind::StressTest => "STRESS_TEST_NOT_FOUND",
            ArtifactKind::RebalancePlan => "REBALANCE_PLAN_NOT_FOUND",
            ArtifactKind::Goals => "ADVISORY_GOALS_NOT_FOUND",
            ArtifactKind::Ips => "ADVISORY_IPS_NOT_FOUND",
            ArtifactKind::DriftReport => "DRIFT_REPORT_NOT_FOUND",
            ArtifactKind::RiskMonitor => "RISK_MONITOR_NOT_FOUND",
            ArtifactKind::ReviewPacket => "REVIEW_PACKET_NOT_FOUND",
            ArtifactKind::DecisionLog => "DECISION_LOG_NOT_FOUND",
            ArtifactKind::Summary => "ADVISORY_SUMMARY_NOT_FOUND",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ArtifactKind::Profile => "investor profile",
            ArtifactKind::Portfolio => "portfolio state",
            ArtifactKind::Fundamentals => "fundamentals state",
            ArtifactKind::Assessment => "suitability assessment",
            ArtifactKind::PositionPlan => "position plan",
            ArtifactKind::PortfolioReview => "portfolio review",
            ArtifactKind::StressTest => "stress test",
            ArtifactKind::RebalancePlan => "rebalance plan",
            ArtifactKind::Goals => "client goals",
            ArtifactKind::Ips => "investment policy statement",
            ArtifactKind::DriftReport => "drift report",
            ArtifactKind::RiskMonitor => "risk monitor",
            ArtifactKind::ReviewPacket => "review packet",
            ArtifactKind::DecisionLog => "decision log",
            ArtifactKind::Summary => "advisory summary",
        };
        f.write_str(label)
    }
}

/// Wrapper around every stored artifact: generated id, immutable payload,
/// coverage level, warning trail and save timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub id: Uuid,
    pub payload: T,
    pub coverage: Coverage,
    pub warnings: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl<T> Envelope<T> {
    pub fn new(payload: T, coverage: Coverage, warnings: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload,
            coverage,
            warnings,
            updated_at: Utc::now(),
        }
    }
}

/// Result of one engine run before it is saved: the payload plus the
/// coverage level and warnings the save will stamp onto the envelope.
#[derive(Debug, Clone)]
pub struct Computed<T> {
    pub value: T,
    pub coverage: Coverage,
    pub warnings: Vec<String>,
}

impl<T> Computed<T> {
    pub fn full(value: T, warnings: Vec<String>) -> Self {
        Self { value, coverage: Coverage::Full, warnings }
    }

    /// Full when the warning list is empty, partial otherwise. Most engines
    /// degrade coverage exactly this way.
    pub fn from_warnings(value: T, warnings: Vec<String>) -> Self {
        let coverage = if warnings.is_empty() { Coverage::Full } else { Coverage::Partial };
        Self { value, coverage, warnings }
    }
}

/// An engine input supplied either inline or as the id of a previously
/// saved artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactRef<T> {
    Inline(T),
    ById(Uuid),
}

/// A summary input supplied either as a raw payload or as a previously
/// saved envelope. Replaces shape-sniffing with an explicit tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryPart<T> {
    Enveloped(Envelope<T>),
    Value(T),
}

impl<T> SummaryPart<T> {
    pub fn payload(&self) -> &T {
        match self {
            SummaryPart::Value(value) => value,
            SummaryPart::Enveloped(envelope) => &envelope.payload,
        }
    }

    /// Coverage is only known for enveloped inputs; a raw value carries none.
    pub fn coverage(&self) -> Option<Coverage> {
        match self {
            SummaryPart::Value(_) => None,
            SummaryPart::Enveloped(envelope) => Some(envelope.coverage),
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            SummaryPart::Value(_) => &[],
            SummaryPart::Enveloped(envelope) => &envelope.warnings,
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        match self {
            SummaryPart::Value(_) => None,
            SummaryPart::Enveloped(envelope) => Some(envelope.id),
        }
    }
}
