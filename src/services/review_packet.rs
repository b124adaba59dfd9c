//! Client-facing review packet assembled from monitoring artifacts. Absent
//! inputs degrade coverage but never block packet generation.

use crate::models::{
    ClientGoals, Computed, DriftReport, PortfolioReview, RebalancePlan, ReviewPacket,
    RiskBudgetMonitor, RiskSeverity, StressTestResult, DISCLAIMER,
};

#[derive(Default)]
pub struct ReviewPacketInput<'a> {
    pub client_label: Option<&'a str>,
    pub goals: Option<&'a ClientGoals>,
    pub portfolio_review: Option<&'a PortfolioReview>,
    pub stress_test: Option<&'a StressTestResult>,
    pub rebalance_plan: Option<&'a RebalancePlan>,
    pub drift_report: Option<&'a DriftReport>,
    pub risk_monitor: Option<&'a RiskBudgetMonitor>,
}

pub fn build_review_packet(input: ReviewPacketInput<'_>) -> Computed<ReviewPacket> {
    let mut warnings = Vec::new();
    let mut key_updates = Vec::new();
    let mut risk_alerts = Vec::new();
    let mut recommended_actions = Vec::new();

    if let Some(goals) = input.goals {
        key_updates.push(format!("Tracking {} active financial goal(s).", goals.goals.len()));
    }

    if let Some(review) = input.portfolio_review {
        key_updates.push(review.summary.clone());
        recommended_actions.extend(review.priority_actions.iter().take(3).cloned());
        risk_alerts.extend(review.restriction_violations.iter().take(2).cloned());
    }

    if let Some(stress) = input.stress_test {
        risk_alerts.push(format!(
            "Worst stress scenario: {} ({:.1}%).",
            stress.worst_scenario.name, stress.worst_scenario.estimated_portfolio_change_pct
        ));
    }

    if let Some(monitor) = input.risk_monitor {
        risk_alerts.extend(
            monitor
                .flags
                .iter()
                .filter(|flag| flag.severity != RiskSeverity::Info)
                .map(|flag| flag.message.clone())
                .take(3),
        );
    }

    if let Some(drift) = input.drift_report {
        recommended_actions.extend(
            drift
                .priority_queue
                .iter()
                .take(3)
                .map(|item| format!("{}: {}", item.action.to_string().to_uppercase(), item.reason)),
        );
    }

    if let Some(plan) = input.rebalance_plan {
        recommended_actions.extend(plan.execution_conditions.iter().take(2).cloned());
    }

    if input.portfolio_review.is_none() {
        warnings.push(
            "Portfolio review missing; packet may omit concentration and liquidity context."
                .to_string(),
        );
    }
    if input.stress_test.is_none() {
        warnings.push("Stress test missing; packet may understate downside scenarios.".to_string());
    }

    let client_questions = vec![
        "Have your income/liquidity needs changed since the last review?".to_string(),
        "Any restrictions or tax considerations to update before rebalancing?".to_string(),
        "Do current goals and time horizon remain accurate?".to_string(),
    ];

    if risk_alerts.is_empty() {
        risk_alerts.push("No new critical risk alerts from current monitoring inputs.".to_string());
    }
    if recommended_actions.is_empty() {
        recommended_actions
            .push("Continue monitoring with no immediate rebalance trigger.".to_string());
    }

    let client_name = input
        .client_label
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .unwrap_or("Client");

    let packet = ReviewPacket {
        headline: format!(
            "{} review packet: {} risk alert(s), {} action item(s).",
            client_name,
            risk_alerts.len(),
            recommended_actions.len()
        ),
        key_updates,
        risk_alerts,
        recommended_actions,
        client_questions,
        disclaimer: DISCLAIMER.to_string(),
    };

    Computed::from_warnings(packet, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coverage, StressScenarioResult};

    fn stress_with_worst(name: &str, change_pct: f64) -> StressTestResult {
        StressTestResult {
            scenario_results: vec![],
            worst_scenario: StressScenarioResult {
                name: name.to_string(),
                estimated_portfolio_change_pct: change_pct,
                estimated_pnl: 0.0,
                top_loss_contributors: vec![],
            },
            key_vulnerabilities: vec![],
        }
    }

    fn review_with_actions(actions: &[&str]) -> PortfolioReview {
        PortfolioReview {
            summary: "Portfolio review completed for 1 account(s), 3 position(s), total value 100000.00 USD.".into(),
            concentration_findings: vec![],
            diversification_findings: vec![],
            liquidity_findings: vec![],
            restriction_violations: vec![],
            tax_warnings: vec![],
            priority_actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn empty_inputs_fall_back_to_standing_lines() {
        let computed = build_review_packet(ReviewPacketInput::default());
        assert_eq!(computed.coverage, Coverage::Partial);
        assert_eq!(computed.warnings.len(), 2);
        let packet = &computed.value;
        assert_eq!(packet.risk_alerts.len(), 1);
        assert!(packet.risk_alerts[0].contains("No new critical risk alerts"));
        assert!(packet.recommended_actions[0].contains("Continue monitoring"));
        assert_eq!(packet.client_questions.len(), 3);
        assert!(packet.headline.starts_with("Client review packet:"));
    }

    #[test]
    fn review_and_stress_inputs_drive_full_coverage() {
        let review = review_with_actions(&["Reduce single-name concentration."]);
        let stress = stress_with_worst("tech_drawdown_25", -18.4);
        let computed = build_review_packet(ReviewPacketInput {
            client_label: Some("Jordan"),
            portfolio_review: Some(&review),
            stress_test: Some(&stress),
            ..Default::default()
        });
        assert_eq!(computed.coverage, Coverage::Full);
        assert!(computed.value.headline.starts_with("Jordan review packet:"));
        assert!(computed
            .value
            .risk_alerts
            .iter()
            .any(|a| a.contains("tech_drawdown_25") && a.contains("-18.4%")));
    }

    #[test]
    fn review_actions_cap_at_three() {
        let review = review_with_actions(&["a1", "a2", "a3", "a4"]);
        let stress = stress_with_worst("market_down_10", -10.0);
        let computed = build_review_packet(ReviewPacketInput {
            portfolio_review: Some(&review),
            stress_test: Some(&stress),
            ..Default::default()
        });
        assert_eq!(computed.value.recommended_actions.len(), 3);
    }
}
