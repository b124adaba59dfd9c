//! Compliance decision logging. Blank inputs degrade coverage instead of
//! failing the call.

use chrono::Utc;

use crate::models::{Computed, DecisionLog, DISCLAIMER};

pub struct DecisionLogInput {
    pub decision_summary: String,
    pub recommendation: String,
    pub evidence: Vec<String>,
    pub constraints: Option<Vec<String>>,
    pub related_artifact_ids: Option<Vec<String>>,
}

fn trimmed_non_empty(items: Option<Vec<String>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

pub fn build_decision_log(input: DecisionLogInput) -> Computed<DecisionLog> {
    let mut warnings = Vec::new();
    let decision_summary = input.decision_summary.trim().to_string();
    let recommendation = input.recommendation.trim().to_string();

    if decision_summary.is_empty() {
        warnings.push("Decision summary is empty.".to_string());
    }
    if recommendation.is_empty() {
        warnings.push("Recommendation is empty.".to_string());
    }

    let evidence = trimmed_non_empty(Some(input.evidence));
    if evidence.is_empty() {
        warnings.push("No supporting evidence entries were provided.".to_string());
    }

    let log = DecisionLog {
        decision_summary,
        recommendation,
        evidence,
        constraints: trimmed_non_empty(input.constraints),
        related_artifact_ids: trimmed_non_empty(input.related_artifact_ids),
        disclaimer: DISCLAIMER.to_string(),
        logged_at: Utc::now(),
    };

    Computed::from_warnings(log, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coverage;

    #[test]
    fn complete_log_has_full_coverage() {
        let computed = build_decision_log(DecisionLogInput {
            decision_summary: "Trim AAPL to policy range".into(),
            recommendation: "Stage two trims over the next month".into(),
            evidence: vec!["Weight 28% exceeds max 20%".into()],
            constraints: Some(vec!["no margin".into()]),
            related_artifact_ids: None,
        });
        assert_eq!(computed.coverage, Coverage::Full);
        assert!(computed.warnings.is_empty());
        assert_eq!(computed.value.disclaimer, DISCLAIMER);
    }

    #[test]
    fn blank_fields_each_produce_a_warning() {
        let computed = build_decision_log(DecisionLogInput {
            decision_summary: "   ".into(),
            recommendation: String::new(),
            evidence: vec!["  ".into()],
            constraints: None,
            related_artifact_ids: None,
        });
        assert_eq!(computed.coverage, Coverage::Partial);
        assert_eq!(computed.warnings.len(), 3);
        assert!(computed.value.evidence.is_empty());
    }

    #[test]
    fn list_entries_are_trimmed_and_filtered() {
        let computed = build_decision_log(DecisionLogInput {
            decision_summary: "Hold".into(),
            recommendation: "No action".into(),
            evidence: vec![" RSI 55 ".into(), String::new()],
            constraints: Some(vec!["  ".into(), "taxable account".into()]),
            related_artifact_ids: Some(vec![" id-1 ".into()]),
        });
        assert_eq!(computed.value.evidence, vec!["RSI 55".to_string()]);
        assert_eq!(computed.value.constraints, vec!["taxable account".to_string()]);
        assert_eq!(computed.value.related_artifact_ids, vec!["id-1".to_string()]);
    }
}
