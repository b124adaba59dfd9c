use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::errors::AdvisoryError;
use crate::models::{
    AdvisorySummary, ArtifactKind, ClientGoals, Coverage, DecisionLog, DriftReport, Envelope,
    FundamentalsArtifact, InvestmentPolicyStatement, InvestorProfile, PortfolioReview,
    PortfolioSnapshot, PositionStrategyPlan, RebalancePlan, ReviewPacket, RiskBudgetMonitor,
    StressTestResult, SuitabilityAssessment,
};
use crate::store::bounded::BoundedCache;

pub const DEFAULT_ADVISORY_CAPACITY: usize = 100;

/// One stored artifact envelope, discriminated by kind.
#[derive(Debug, Clone)]
enum ArtifactRecord {
    Profile(Envelope<InvestorProfile>),
    Portfolio(Envelope<PortfolioSnapshot>),
    Fundamentals(Envelope<FundamentalsArtifact>),
    Assessment(Envelope<SuitabilityAssessment>),
    PositionPlan(Envelope<PositionStrategyPlan>),
    PortfolioReview(Envelope<PortfolioReview>),
    StressTest(Envelope<StressTestResult>),
    RebalancePlan(Envelope<RebalancePlan>),
    Goals(Envelope<ClientGoals>),
    Ips(Envelope<InvestmentPolicyStatement>),
    DriftReport(Envelope<DriftReport>),
    RiskMonitor(Envelope<RiskBudgetMonitor>),
    ReviewPacket(Envelope<ReviewPacket>),
    DecisionLog(Envelope<DecisionLog>),
    Summary(Envelope<AdvisorySummary>),
}

/// Bounded artifact store shared across every artifact kind; entries are
/// keyed by (kind, id) so kinds cannot shadow each other's ids. Cloning
/// shares the underlying cache.
#[derive(Clone)]
pub struct AdvisoryStore {
    inner: Arc<Mutex<BoundedCache<(ArtifactKind, Uuid), ArtifactRecord>>>,
}

macro_rules! artifact_accessors {
    ($save:ident, $get:ident, $get_or_err:ident, $variant:ident, $payload:ty, $kind:expr) => {
        pub fn $save(
            &self,
            payload: $payload,
            coverage: Coverage,
            warnings: Vec<String>,
        ) -> Envelope<$payload> {
            let envelope = Envelope::new(payload, coverage, warnings);
            self.inner
                .lock()
                .save(($kind, envelope.id), ArtifactRecord::$variant(envelope.clone()));
            envelope
        }

        pub fn $get(&self, id: Uuid) -> Option<Envelope<$payload>> {
            match self.inner.lock().get(&($kind, id)) {
                Some(ArtifactRecord::$variant(envelope)) => Some(envelope.clone()),
                _ => None,
            }
        }

        pub fn $get_or_err(&self, id: Uuid) -> Result<Envelope<$payload>, AdvisoryError> {
            self.$get(id)
                .ok_or(AdvisoryError::ArtifactNotFound { kind: $kind, id })
        }
    };
}

impl AdvisoryStore {
    /// `capacity` of 0 falls back to the default of 100 entries.
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 { DEFAULT_ADVISORY_CAPACITY } else { capacity };
        Self {
            inner: Arc::new(Mutex::new(BoundedCache::new(capacity))),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    artifact_accessors!(save_profile, get_profile, get_profile_or_err, Profile, InvestorProfile, ArtifactKind::Profile);
    artifact_accessors!(save_portfolio, get_portfolio, get_portfolio_or_err, Portfolio, PortfolioSnapshot, ArtifactKind::Portfolio);
    artifact_accessors!(save_fundamentals, get_fundamentals, get_fundamentals_or_err, Fundamentals, FundamentalsArtifact, ArtifactKind::Fundamentals);
    artifact_accessors!(save_assessment, get_assessment, get_assessment_or_err, Assessment, SuitabilityAssessment, ArtifactKind::Assessment);
    artifact_accessors!(save_position_plan, get_position_plan, get_position_plan_or_err, PositionPlan, PositionStrategyPlan, ArtifactKind::PositionPlan);
    artifact_accessors!(save_portfolio_review, get_portfolio_review, get_portfolio_review_or_err, PortfolioReview, PortfolioReview, ArtifactKind::PortfolioReview);
    artifact_accessors!(save_stress_test, get_stress_test, get_stress_test_or_err, StressTest, StressTestResult, ArtifactKind::StressTest);
    artifact_accessors!(save_rebalance_plan, get_rebalance_plan, get_rebalance_plan_or_err, RebalancePlan, RebalancePlan, ArtifactKind::RebalancePlan);
    artifact_accessors!(save_goals, get_goals, get_goals_or_err, Goals, ClientGoals, ArtifactKind::Goals);
    artifact_accessors!(save_ips, get_ips, get_ips_or_err, Ips, InvestmentPolicyStatement, ArtifactKind::Ips);
    artifact_accessors!(save_drift_report, get_drift_report, get_drift_report_or_err, DriftReport, DriftReport, ArtifactKind::DriftReport);
    artifact_accessors!(save_risk_monitor, get_risk_monitor, get_risk_monitor_or_err, RiskMonitor, RiskBudgetMonitor, ArtifactKind::RiskMonitor);
    artifact_accessors!(save_review_packet, get_review_packet, get_review_packet_or_err, ReviewPacket, ReviewPacket, ArtifactKind::ReviewPacket);
    artifact_accessors!(save_decision_log, get_decision_log, get_decision_log_or_err, DecisionLog, DecisionLog, ArtifactKind::DecisionLog);
    artifact_accessors!(save_summary, get_summary, get_summary_or_err, Summary, AdvisorySummary, ArtifactKind::Summary);
}
