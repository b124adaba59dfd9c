//! Cross-artifact advisory summary. Every input is optional and may arrive
//! raw or as a saved envelope; coverage rolls up to the worst supplied level.

use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    ActionsSnapshot, AdvisorySummary, AuditEnvelope, AuditRequest, ClientGoals, ClientSnapshot,
    ComplianceBlock, Coverage, DecisionLog, DriftReport, InvestmentPolicyStatement,
    InvestorProfile, MonitoringSnapshot, PolicySnapshot, PortfolioReview, RebalancePlan,
    ReviewPacket, RiskBudgetMonitor, StressTestResult, SummaryPart, DISCLAIMER,
};

#[derive(Default)]
pub struct SummaryInput {
    pub profile: Option<SummaryPart<InvestorProfile>>,
    pub goals: Option<SummaryPart<ClientGoals>>,
    pub ips: Option<SummaryPart<InvestmentPolicyStatement>>,
    pub portfolio_review: Option<SummaryPart<PortfolioReview>>,
    pub stress_test: Option<SummaryPart<StressTestResult>>,
    pub rebalance_plan: Option<SummaryPart<RebalancePlan>>,
    pub drift_report: Option<SummaryPart<DriftReport>>,
    pub risk_monitor: Option<SummaryPart<RiskBudgetMonitor>>,
    pub review_packet: Option<SummaryPart<ReviewPacket>>,
    pub decision_log: Option<SummaryPart<DecisionLog>>,
    pub audit: Option<AuditRequest>,
}

fn push_part_meta<T>(
    part: Option<&SummaryPart<T>>,
    coverages: &mut Vec<Coverage>,
    warnings: &mut Vec<String>,
) {
    if let Some(part) = part {
        if let Some(coverage) = part.coverage() {
            coverages.push(coverage);
        }
        for warning in part.warnings() {
            if !warnings.contains(warning) {
                warnings.push(warning.clone());
            }
        }
    }
}

fn build_audit(
    request: &AuditRequest,
    summary: &AdvisorySummary,
) -> AuditEnvelope {
    let run_id = request
        .run_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let workflow = request
        .workflow
        .clone()
        .unwrap_or_else(|| "operations".to_string());

    let mut artifact_ids: Vec<String> = Vec::new();
    for id in &request.artifact_ids {
        let trimmed = id.trim();
        if !trimmed.is_empty() && !artifact_ids.iter().any(|seen| seen == trimmed) {
            artifact_ids.push(trimmed.to_string());
        }
    }

    AuditEnvelope {
        run_id,
        workflow,
        generated_at: summary.generated_at,
        coverage: summary.coverage,
        warnings_count: summary.warnings.len(),
        template_id: summary.monitoring.risk_template_id.clone(),
        template_version: summary.monitoring.risk_template_version.clone(),
        artifact_ids,
    }
}

pub fn build_advisory_summary(input: SummaryInput) -> AdvisorySummary {
    let mut coverages = Vec::new();
    let mut warnings = Vec::new();
    push_part_meta(input.profile.as_ref(), &mut coverages, &mut warnings);
    push_part_meta(input.goals.as_ref(), &mut coverages, &mut warnings);
    push_part_meta(input.ips.as_ref(), &mut coverages, &mut warnings);
    push_part_meta(input.portfolio_review.as_ref(), &mut coverages, &mut warnings);
    push_part_meta(input.stress_test.as_ref(), &mut coverages, &mut warnings);
    push_part_meta(input.rebalance_plan.as_ref(), &mut coverages, &mut warnings);
    push_part_meta(input.drift_report.as_ref(), &mut coverages, &mut warnings);
    push_part_meta(input.risk_monitor.as_ref(), &mut coverages, &mut warnings);
    push_part_meta(input.review_packet.as_ref(), &mut coverages, &mut warnings);
    push_part_meta(input.decision_log.as_ref(), &mut coverages, &mut warnings);

    let profile = input.profile.as_ref().map(SummaryPart::payload);
    let goals = input.goals.as_ref().map(SummaryPart::payload);
    let ips = input.ips.as_ref().map(SummaryPart::payload);
    let portfolio_review = input.portfolio_review.as_ref().map(SummaryPart::payload);
    let stress_test = input.stress_test.as_ref().map(SummaryPart::payload);
    let rebalance_plan = input.rebalance_plan.as_ref().map(SummaryPart::payload);
    let drift_report = input.drift_report.as_ref().map(SummaryPart::payload);
    let risk_monitor = input.risk_monitor.as_ref().map(SummaryPart::payload);
    let review_packet = input.review_packet.as_ref().map(SummaryPart::payload);
    let decision_log = input.decision_log.as_ref().map(SummaryPart::payload);

    let mut priority_actions = Vec::new();
    if let Some(drift) = drift_report {
        priority_actions.extend(
            drift
                .priority_queue
                .iter()
                .take(3)
                .map(|item| format!("{}: {}", item.action, item.reason)),
        );
    }
    if let Some(plan) = rebalance_plan {
        priority_actions.extend(
            plan.trade_priority_queue
                .iter()
                .take(3)
                .map(|item| format!("{}: {}", item.action, item.reason)),
        );
    }
    if let Some(review) = portfolio_review {
        priority_actions.extend(review.priority_actions.iter().take(2).cloned());
    }

    let client_actions = review_packet
        .map(|packet| packet.recommended_actions.clone())
        .unwrap_or_default();

    let mut summary = AdvisorySummary {
        generated_at: Utc::now(),
        coverage: Coverage::worst(coverages),
        warnings,
        client: ClientSnapshot {
            client_label: profile.and_then(|p| p.client_label.clone()),
            risk_tier: ips
                .map(|i| i.risk_profile_tier)
                .or_else(|| profile.map(|p| p.risk_tolerance)),
            investment_horizon: ips
                .map(|i| i.investment_horizon)
                .or_else(|| profile.map(|p| p.investment_horizon)),
            goal_labels: goals
                .map(|g| g.goals.iter().map(|goal| goal.label.clone()).collect())
                .unwrap_or_default(),
        },
        policy: ips.map(|ips| PolicySnapshot {
            target_return_range_pct: ips.target_return_range_pct,
            max_acceptable_drawdown_pct: ips.max_acceptable_drawdown_pct,
            cash_target_range_pct: ips.cash_target_range_pct,
            single_position_max_pct: ips.single_position_max_pct,
            sector_max_pct: ips.sector_max_pct,
            rebalance_frequency: ips.rebalance_frequency,
        }),
        monitoring: MonitoringSnapshot {
            risk_severity: risk_monitor.map(|m| m.overall_severity),
            risk_flag_count: risk_monitor.map(|m| m.flags.len()).unwrap_or(0),
            risk_template_id: risk_monitor.map(|m| m.template_id.clone()),
            risk_template_version: risk_monitor.map(|m| m.template_version.clone()),
            drift_breach_count: drift_report.map(|d| d.breaches.len()).unwrap_or(0),
            worst_stress_scenario: stress_test.map(|s| s.worst_scenario.name.clone()),
            worst_stress_loss_pct: stress_test
                .map(|s| s.worst_scenario.estimated_portfolio_change_pct),
        },
        actions: ActionsSnapshot { priority_actions, client_actions },
        compliance: ComplianceBlock {
            disclaimer: decision_log
                .map(|log| log.disclaimer.clone())
                .or_else(|| review_packet.map(|packet| packet.disclaimer.clone()))
                .or_else(|| ips.map(|ips| ips.disclaimer.clone()))
                .unwrap_or_else(|| DISCLAIMER.to_string()),
            decision_log_id: input.decision_log.as_ref().and_then(SummaryPart::id),
            evidence_summary: decision_log
                .map(|log| log.evidence.iter().take(5).cloned().collect())
                .unwrap_or_default(),
        },
        audit: None,
    };

    if let Some(request) = &input.audit {
        summary.audit = Some(build_audit(request, &summary));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Envelope, InvestmentHorizon, InvestmentObjective, LiquidityNeeds, RiskSeverity,
        RiskThresholds, RiskTolerance, StressScenarioResult,
    };

    fn profile() -> InvestorProfile {
        InvestorProfile {
            client_label: Some("Jordan".into()),
            risk_tolerance: RiskTolerance::Moderate,
            investment_horizon: InvestmentHorizon::Long,
            objectives: vec![InvestmentObjective::Growth],
            liquidity_needs: LiquidityNeeds::Medium,
            max_drawdown_tolerance_pct: None,
            account_types: None,
            restrictions: None,
            tax_profile: None,
            notes: None,
        }
    }

    fn risk_monitor() -> RiskBudgetMonitor {
        RiskBudgetMonitor {
            risk_tier: RiskTolerance::Moderate,
            thresholds: RiskThresholds {
                max_single_position_pct: 18.0,
                max_sector_pct: 35.0,
                max_volatility_annualized: 0.45,
                max_drawdown_pct: 22.0,
                min_cash_pct: 4.0,
                max_cash_pct: 20.0,
                max_stress_loss_pct: 20.0,
            },
            template_id: "default-core".into(),
            template_version: "2026-02-23".into(),
            flags: vec![],
            overall_severity: RiskSeverity::Info,
            summary: "ok".into(),
        }
    }

    fn stress() -> StressTestResult {
        StressTestResult {
            scenario_results: vec![],
            worst_scenario: StressScenarioResult {
                name: "market_down_20".into(),
                estimated_portfolio_change_pct: -16.0,
                estimated_pnl: -16_000.0,
                top_loss_contributors: vec![],
            },
            key_vulnerabilities: vec![],
        }
    }

    #[test]
    fn empty_input_yields_full_coverage_defaults() {
        let summary = build_advisory_summary(SummaryInput::default());
        assert_eq!(summary.coverage, Coverage::Full);
        assert!(summary.warnings.is_empty());
        assert!(summary.policy.is_none());
        assert_eq!(summary.compliance.disclaimer, DISCLAIMER);
        assert!(summary.audit.is_none());
    }

    #[test]
    fn worst_supplied_coverage_wins() {
        let enveloped =
            Envelope::new(profile(), Coverage::Partial, vec!["profile gap".to_string()]);
        let summary = build_advisory_summary(SummaryInput {
            profile: Some(SummaryPart::Enveloped(enveloped)),
            stress_test: Some(SummaryPart::Value(stress())),
            ..Default::default()
        });
        assert_eq!(summary.coverage, Coverage::Partial);
        assert_eq!(summary.warnings, vec!["profile gap".to_string()]);
        assert_eq!(summary.client.client_label.as_deref(), Some("Jordan"));
        assert_eq!(
            summary.monitoring.worst_stress_scenario.as_deref(),
            Some("market_down_20")
        );
    }

    #[test]
    fn duplicate_warnings_roll_up_once() {
        let a = Envelope::new(profile(), Coverage::Partial, vec!["same gap".to_string()]);
        let b = Envelope::new(stress(), Coverage::Partial, vec!["same gap".to_string()]);
        let summary = build_advisory_summary(SummaryInput {
            profile: Some(SummaryPart::Enveloped(a)),
            stress_test: Some(SummaryPart::Enveloped(b)),
            ..Default::default()
        });
        assert_eq!(summary.warnings.len(), 1);
    }

    #[test]
    fn decision_log_envelope_id_lands_in_compliance() {
        let log = DecisionLog {
            decision_summary: "Hold".into(),
            recommendation: "No action".into(),
            evidence: vec!["e1".into(), "e2".into()],
            constraints: vec![],
            related_artifact_ids: vec![],
            disclaimer: DISCLAIMER.to_string(),
            logged_at: Utc::now(),
        };
        let envelope = Envelope::new(log, Coverage::Full, vec![]);
        let id = envelope.id;
        let summary = build_advisory_summary(SummaryInput {
            decision_log: Some(SummaryPart::Enveloped(envelope)),
            ..Default::default()
        });
        assert_eq!(summary.compliance.decision_log_id, Some(id));
        assert_eq!(summary.compliance.evidence_summary.len(), 2);
    }

    #[test]
    fn audit_envelope_only_on_request() {
        let summary = build_advisory_summary(SummaryInput {
            risk_monitor: Some(SummaryPart::Value(risk_monitor())),
            audit: Some(AuditRequest {
                run_id: Some("  ".into()),
                workflow: None,
                artifact_ids: vec![" a-1 ".into(), "a-1".into(), String::new()],
            }),
            ..Default::default()
        });
        let audit = summary.audit.unwrap();
        assert_eq!(audit.workflow, "operations");
        assert!(!audit.run_id.is_empty());
        assert_eq!(audit.artifact_ids, vec!["a-1".to_string()]);
        assert_eq!(audit.template_id.as_deref(), Some("default-core"));
    }
}
