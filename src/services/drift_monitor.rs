//! Drift detection against target policy ranges. Breaches trigger only when
//! a weight lands strictly outside its range.

use crate::models::{
    Computed, DriftAction, DriftBreach, DriftKind, DriftPriorityItem, DriftReport, DriftSeverity,
    InvestmentPolicyStatement, PortfolioSnapshot, RangePct, TargetPolicy,
};
use crate::services::normalize::{
    flatten_positions, portfolio_cash_value, portfolio_total_value,
};

pub const DEFAULT_SINGLE_POSITION_MAX_PCT: f64 = 20.0;
const TARGET_WEIGHT_BAND_PCT: f64 = 2.5;

fn target_range(symbol: &str, policy: Option<&TargetPolicy>, fallback_max: f64) -> RangePct {
    let explicit = policy.and_then(|p| p.find_target(symbol));
    if let Some(target) = explicit {
        if let Some(target_weight) = target.target_weight_pct {
            return RangePct::new(
                (target_weight - TARGET_WEIGHT_BAND_PCT).max(0.0),
                target_weight + TARGET_WEIGHT_BAND_PCT,
            );
        }
        if target.min_weight_pct.is_some() || target.max_weight_pct.is_some() {
            return RangePct::new(
                target.min_weight_pct.unwrap_or(0.0),
                target.max_weight_pct.unwrap_or(fallback_max),
            );
        }
    }
    RangePct::new(0.0, fallback_max)
}

pub fn build_drift_report(
    portfolio: &PortfolioSnapshot,
    target_policy: Option<&TargetPolicy>,
    ips: Option<&InvestmentPolicyStatement>,
) -> Computed<DriftReport> {
    let mut warnings = Vec::new();
    let mut breaches = Vec::new();
    let mut priority_queue = Vec::new();
    let mut coverage_notes = Vec::new();

    let total_value = portfolio_total_value(portfolio);
    let positions = flatten_positions(portfolio);
    let fallback_max = target_policy
        .and_then(|p| p.single_position_max_pct)
        .or_else(|| ips.map(|i| i.single_position_max_pct))
        .unwrap_or(DEFAULT_SINGLE_POSITION_MAX_PCT);

    for flat in &positions {
        let position = flat.position;
        let current_weight_pct = if total_value > 0.0 {
            position.market_value / total_value * 100.0
        } else {
            0.0
        };
        let range = target_range(&position.symbol, target_policy, fallback_max);

        if current_weight_pct > range.max || current_weight_pct < range.min {
            let is_trim = current_weight_pct > range.max;
            let drift_pct = if is_trim {
                current_weight_pct - range.max
            } else {
                range.min - current_weight_pct
            };
            let severity = DriftSeverity::from_drift(drift_pct.abs());
            breaches.push(DriftBreach {
                kind: DriftKind::Position,
                symbol: Some(position.symbol.clone()),
                current_weight_pct,
                target_min_pct: range.min,
                target_max_pct: range.max,
                drift_pct,
                severity,
                reason: if is_trim {
                    format!(
                        "Weight {:.1}% exceeds max {:.1}%",
                        current_weight_pct, range.max
                    )
                } else {
                    format!(
                        "Weight {:.1}% below min {:.1}%",
                        current_weight_pct, range.min
                    )
                },
            });
            priority_queue.push(DriftPriorityItem {
                kind: DriftKind::Position,
                symbol: Some(position.symbol.clone()),
                severity,
                action: if is_trim { DriftAction::Trim } else { DriftAction::Add },
                estimated_drift_pct: drift_pct.abs(),
                reason: if is_trim {
                    "Position above policy range".to_string()
                } else {
                    "Position below policy range".to_string()
                },
            });
        }
    }

    let cash_target = target_policy
        .and_then(|p| p.cash_target_range_pct)
        .or_else(|| ips.map(|i| i.cash_target_range_pct));
    match cash_target {
        Some(range) => {
            let cash_pct = if total_value > 0.0 {
                portfolio_cash_value(portfolio) / total_value * 100.0
            } else {
                0.0
            };
            if cash_pct < range.min || cash_pct > range.max {
                let drift_pct = if cash_pct < range.min {
                    range.min - cash_pct
                } else {
                    cash_pct - range.max
                };
                let severity = DriftSeverity::from_drift(drift_pct.abs());
                breaches.push(DriftBreach {
                    kind: DriftKind::Cash,
                    symbol: None,
                    current_weight_pct: cash_pct,
                    target_min_pct: range.min,
                    target_max_pct: range.max,
                    drift_pct,
                    severity,
                    reason: format!(
                        "Cash {:.1}% outside {:.1}-{:.1}%",
                        cash_pct, range.min, range.max
                    ),
                });
                priority_queue.push(DriftPriorityItem {
                    kind: DriftKind::Cash,
                    symbol: None,
                    severity,
                    action: DriftAction::AdjustCash,
                    estimated_drift_pct: drift_pct.abs(),
                    reason: "Cash allocation outside policy range".to_string(),
                });
            }
        }
        None => {
            warnings.push("Cash target range not provided; cash drift checks were skipped.".to_string());
        }
    }

    if target_policy.is_none() && ips.is_none() {
        warnings.push("No target policy or IPS supplied; drift thresholds used defaults.".to_string());
        coverage_notes.push("Default single-position max of 20% was used.".to_string());
    }

    priority_queue.sort_by(|a, b| {
        b.estimated_drift_pct
            .partial_cmp(&a.estimated_drift_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let report = DriftReport {
        summary: format!(
            "Detected {} drift breach(es) across {} position(s).",
            breaches.len(),
            positions.len()
        ),
        breaches,
        priority_queue,
        coverage_notes,
    };

    Computed::from_warnings(report, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AccountType, Coverage, PortfolioAccount, PortfolioPosition, PositionTarget,
    };
    use chrono::Utc;

    fn position(symbol: &str, market_value: f64) -> PortfolioPosition {
        PortfolioPosition {
            symbol: symbol.to_string(),
            quantity: 1.0,
            last_price: None,
            market_value,
            avg_cost: None,
            sector: None,
            target_weight: None,
            max_weight: None,
            tax_lots: None,
        }
    }

    fn snapshot(positions: Vec<PortfolioPosition>, cash: f64) -> PortfolioSnapshot {
        PortfolioSnapshot {
            as_of: Utc::now(),
            base_currency: "USD".into(),
            accounts: vec![PortfolioAccount {
                account_id: "acct-1".into(),
                account_type: AccountType::Taxable,
                cash_balance: cash,
                fees: None,
                restrictions: None,
                positions,
            }],
        }
    }

    fn policy_with_target(symbol: &str, target_weight_pct: f64) -> TargetPolicy {
        TargetPolicy {
            cash_target_range_pct: Some(RangePct::new(2.0, 20.0)),
            single_position_max_pct: Some(20.0),
            sector_max_pct: None,
            position_targets: Some(vec![PositionTarget {
                symbol: symbol.to_string(),
                target_weight_pct: Some(target_weight_pct),
                min_weight_pct: None,
                max_weight_pct: None,
            }]),
        }
    }

    #[test]
    fn weight_inside_band_is_not_a_breach() {
        // AAPL at 12% with target 10% (band 7.5-12.5) stays inside
        let portfolio = snapshot(vec![position("AAPL", 12_000.0)], 88_000.0);
        let policy = policy_with_target("AAPL", 10.0);
        let computed = build_drift_report(&portfolio, Some(&policy), None);
        assert!(computed.value.breaches.iter().all(|b| b.kind != DriftKind::Position));
    }

    #[test]
    fn six_point_drift_is_medium_severity() {
        // AAPL at 18.5% with target 10% -> 6 points past the 12.5% band edge
        let portfolio = snapshot(vec![position("AAPL", 18_500.0)], 81_500.0);
        let policy = policy_with_target("AAPL", 10.0);
        let computed = build_drift_report(&portfolio, Some(&policy), None);

        let breach = computed
            .value
            .breaches
            .iter()
            .find(|b| b.symbol.as_deref() == Some("AAPL"))
            .unwrap();
        assert!((breach.drift_pct - 6.0).abs() < 1e-9);
        assert_eq!(breach.severity, DriftSeverity::Medium);
    }

    #[test]
    fn missing_cash_target_skips_check_with_warning() {
        let portfolio = snapshot(vec![position("AAPL", 10_000.0)], 90_000.0);
        let computed = build_drift_report(&portfolio, None, None);
        assert_eq!(computed.coverage, Coverage::Partial);
        assert!(computed
            .warnings
            .iter()
            .any(|w| w.contains("Cash target range not provided")));
        assert!(computed
            .value
            .coverage_notes
            .iter()
            .any(|n| n.contains("Default single-position max")));
    }

    #[test]
    fn queue_sorted_by_descending_drift() {
        let portfolio = snapshot(
            vec![position("AAPL", 40_000.0), position("MSFT", 25_000.0)],
            35_000.0,
        );
        let policy = TargetPolicy {
            cash_target_range_pct: Some(RangePct::new(2.0, 20.0)),
            single_position_max_pct: Some(20.0),
            sector_max_pct: None,
            position_targets: None,
        };
        let computed = build_drift_report(&portfolio, Some(&policy), None);
        let queue = &computed.value.priority_queue;
        assert!(queue.len() >= 2);
        for pair in queue.windows(2) {
            assert!(pair[0].estimated_drift_pct >= pair[1].estimated_drift_pct);
        }
        assert_eq!(queue[0].symbol.as_deref(), Some("AAPL"));
    }
}
