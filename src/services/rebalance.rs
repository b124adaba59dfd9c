//! Constraint-aware rebalance planning over resolved target ranges.

use std::collections::HashSet;

use crate::models::{
    AccountType, Computed, InvestorProfile, PortfolioReview, PortfolioSnapshot,
    RebalanceConstraints, RebalancePlan, RebalanceTargetRange, RebalanceTradeItem, RiskTolerance,
    StressTestResult, TargetPolicy, TradeAction, TradePriority,
};
use crate::services::normalize::{flatten_positions, portfolio_total_value};
use crate::services::portfolio_review::build_portfolio_review;
use crate::services::stress_test::build_stress_test;

pub const DEFAULT_MIN_TRADE_VALUE: f64 = 250.0;
const TARGET_WEIGHT_BAND_PCT: f64 = 2.5;
const HIGH_PRIORITY_DELTA_PCT: f64 = 5.0;

struct ResolvedRange {
    symbol: String,
    account_id: String,
    current_weight_pct: f64,
    target_min_pct: f64,
    target_max_pct: f64,
}

fn explicit_target(symbol: &str, policy: Option<&TargetPolicy>) -> Option<(f64, f64)> {
    let rule = policy.and_then(|p| p.find_target(symbol))?;
    if let Some(target_weight) = rule.target_weight_pct {
        return Some((
            (target_weight - TARGET_WEIGHT_BAND_PCT).max(0.0),
            target_weight + TARGET_WEIGHT_BAND_PCT,
        ));
    }
    if rule.min_weight_pct.is_some() || rule.max_weight_pct.is_some() {
        return Some((
            rule.min_weight_pct.unwrap_or(0.0),
            rule.max_weight_pct.unwrap_or(100.0),
        ));
    }
    None
}

#[derive(Default)]
pub struct RebalanceInput<'a> {
    pub profile: Option<&'a InvestorProfile>,
    pub portfolio_review: Option<&'a PortfolioReview>,
    pub stress_test: Option<&'a StressTestResult>,
    pub target_policy: Option<&'a TargetPolicy>,
    pub constraints: Option<&'a RebalanceConstraints>,
}

pub fn build_rebalance_plan(
    portfolio: &PortfolioSnapshot,
    input: RebalanceInput<'_>,
) -> Computed<RebalancePlan> {
    let mut warnings = Vec::new();
    let mut deferred_actions = Vec::new();
    let mut tax_impact_notes = Vec::new();
    let mut execution_conditions = Vec::new();
    let mut trade_priority_queue: Vec<RebalanceTradeItem> = Vec::new();

    let total_value = portfolio_total_value(portfolio);
    let positions = flatten_positions(portfolio);
    let default_single_position_max_pct = input
        .target_policy
        .and_then(|p| p.single_position_max_pct)
        .unwrap_or_else(|| {
            if input.profile.map(|p| p.risk_tolerance) == Some(RiskTolerance::Conservative) {
                12.0
            } else {
                20.0
            }
        });
    let min_trade_value = input
        .constraints
        .and_then(|c| c.min_trade_value)
        .unwrap_or(DEFAULT_MIN_TRADE_VALUE);
    let blacklisted: HashSet<String> = input
        .constraints
        .and_then(|c| c.blacklist_symbols.as_ref())
        .map(|list| list.iter().map(|s| s.to_uppercase()).collect())
        .unwrap_or_default();
    let no_sell: HashSet<String> = input
        .constraints
        .and_then(|c| c.no_sell_symbols.as_ref())
        .map(|list| list.iter().map(|s| s.to_uppercase()).collect())
        .unwrap_or_default();

    let mut ranges: Vec<ResolvedRange> = positions
        .iter()
        .map(|flat| {
            let position = flat.position;
            let current_weight_pct = if total_value > 0.0 {
                position.market_value / total_value * 100.0
            } else {
                0.0
            };
            let explicit = explicit_target(&position.symbol, input.target_policy);
            let max_from_position = position.max_weight.map(|w| w * 100.0);
            let target_min_pct = explicit.map(|(min, _)| min).unwrap_or(0.0);
            let target_max_pct = explicit
                .map(|(_, max)| max)
                .or(max_from_position)
                .unwrap_or(default_single_position_max_pct);

            ResolvedRange {
                symbol: position.symbol.clone(),
                account_id: flat.account_id.to_string(),
                current_weight_pct,
                target_min_pct: target_min_pct.clamp(0.0, 100.0),
                target_max_pct: target_max_pct.clamp(0.0, 100.0),
            }
        })
        .collect();
    ranges.sort_by(|a, b| {
        b.current_weight_pct
            .partial_cmp(&a.current_weight_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for range in &ranges {
        let symbol_upper = range.symbol.to_uppercase();
        if range.current_weight_pct > range.target_max_pct {
            if no_sell.contains(&symbol_upper) {
                deferred_actions
                    .push(format!("{} exceeds target max but is marked no-sell.", range.symbol));
                continue;
            }

            let pct_delta = range.current_weight_pct - range.target_max_pct;
            let estimated_trade_value = total_value * (pct_delta / 100.0);
            if estimated_trade_value < min_trade_value {
                deferred_actions.push(format!(
                    "{} trim signal below min trade value {:.2}.",
                    range.symbol, min_trade_value
                ));
                continue;
            }

            trade_priority_queue.push(RebalanceTradeItem {
                symbol: range.symbol.clone(),
                account_id: range.account_id.clone(),
                action: TradeAction::Trim,
                priority: if pct_delta > HIGH_PRIORITY_DELTA_PCT {
                    TradePriority::High
                } else {
                    TradePriority::Medium
                },
                estimated_trade_value,
                reason: format!(
                    "Current weight {:.1}% exceeds max {:.1}%.",
                    range.current_weight_pct, range.target_max_pct
                ),
            });
        }

        if range.current_weight_pct < range.target_min_pct {
            if blacklisted.contains(&symbol_upper) {
                deferred_actions.push(format!(
                    "{} is below target but symbol is blacklisted for adds.",
                    range.symbol
                ));
                continue;
            }

            let pct_delta = range.target_min_pct - range.current_weight_pct;
            let estimated_trade_value = total_value * (pct_delta / 100.0);
            if estimated_trade_value < min_trade_value {
                deferred_actions.push(format!(
                    "{} add signal below min trade value {:.2}.",
                    range.symbol, min_trade_value
                ));
                continue;
            }

            trade_priority_queue.push(RebalanceTradeItem {
                symbol: range.symbol.clone(),
                account_id: range.account_id.clone(),
                action: TradeAction::Add,
                priority: if pct_delta > HIGH_PRIORITY_DELTA_PCT {
                    TradePriority::High
                } else {
                    TradePriority::Medium
                },
                estimated_trade_value,
                reason: format!(
                    "Current weight {:.1}% is below min {:.1}%.",
                    range.current_weight_pct, range.target_min_pct
                ),
            });
        }
    }

    trade_priority_queue.sort_by(|a, b| {
        b.estimated_trade_value
            .partial_cmp(&a.estimated_trade_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for flat in &positions {
        if flat.account_type != AccountType::Taxable {
            continue;
        }
        if flat.position.tax_lots.as_deref().is_some_and(|lots| !lots.is_empty()) {
            tax_impact_notes.push(format!(
                "{}: review tax lots before taxable sales (placeholder tax optimization).",
                flat.position.symbol
            ));
        }
    }

    if input.constraints.and_then(|c| c.allow_taxable_sales) == Some(false) {
        execution_conditions.push("Avoid taxable sales unless risk limits are breached.".to_string());
    }
    execution_conditions.push(format!(
        "Ignore recommendations below minimum trade value {:.2}.",
        min_trade_value
    ));
    execution_conditions.push(
        "Validate spreads/liquidity before execution; this plan uses a simplified placeholder model."
            .to_string(),
    );

    // Omitted review/stress inputs fall back to an inline computation over
    // the same portfolio; the plan stays Full-coverage with a warning.
    let inline_review;
    let review = match input.portfolio_review {
        Some(review) => review,
        None => {
            warnings.push(
                "Portfolio review not provided; portfolio review was computed inline.".to_string(),
            );
            inline_review = build_portfolio_review(portfolio, input.profile, None).value;
            &inline_review
        }
    };
    let inline_stress;
    let stress = match input.stress_test {
        Some(stress) => stress,
        None => {
            warnings.push("Stress test not provided; stress test was computed inline.".to_string());
            inline_stress = build_stress_test(portfolio, None).value;
            &inline_stress
        }
    };

    for action in review.priority_actions.iter().take(3) {
        execution_conditions.push(format!("Review priority: {action}"));
    }
    execution_conditions.push(format!(
        "Stress focus: worst scenario {} ({:.1}%).",
        stress.worst_scenario.name, stress.worst_scenario.estimated_portfolio_change_pct
    ));

    let plan = RebalancePlan {
        target_ranges: ranges
            .into_iter()
            .map(|range| RebalanceTargetRange {
                symbol: range.symbol,
                current_weight_pct: range.current_weight_pct,
                target_min_pct: range.target_min_pct,
                target_max_pct: range.target_max_pct,
            })
            .collect(),
        trade_priority_queue,
        deferred_actions,
        tax_impact_notes,
        execution_conditions,
    };

    Computed::full(plan, warnings)
}
