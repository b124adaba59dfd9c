//! Portfolio health review: concentration, diversification, liquidity,
//! restriction and tax-lot findings against a benchmark policy.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};

use crate::models::{
    AccountType, BenchmarkPolicy, Computed, InvestorProfile, PortfolioReview, PortfolioSnapshot,
};
use crate::services::normalize::{
    flatten_positions, portfolio_cash_value, portfolio_market_value, portfolio_total_value,
};

pub const DEFAULT_SINGLE_POSITION_MAX_PCT: f64 = 20.0;
pub const DEFAULT_SECTOR_MAX_PCT: f64 = 35.0;
pub const DEFAULT_MIN_CASH_PCT: f64 = 2.0;
pub const DEFAULT_MAX_CASH_PCT: f64 = 30.0;

fn fmt_pct(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn build_portfolio_review(
    portfolio: &PortfolioSnapshot,
    profile: Option<&InvestorProfile>,
    benchmark: Option<&BenchmarkPolicy>,
) -> Computed<PortfolioReview> {
    let mut warnings = Vec::new();
    let mut concentration_findings = Vec::new();
    let mut diversification_findings = Vec::new();
    let mut liquidity_findings = Vec::new();
    let mut restriction_violations = Vec::new();
    let mut tax_warnings = Vec::new();
    let mut priority_actions = Vec::new();

    let positions = flatten_positions(portfolio);
    let total_value = portfolio_total_value(portfolio);
    let market_value = portfolio_market_value(portfolio);
    let cash_pct = if total_value > 0.0 {
        portfolio_cash_value(portfolio) / total_value * 100.0
    } else {
        0.0
    };

    let single_position_max_pct = benchmark
        .and_then(|b| b.single_position_max_pct)
        .unwrap_or(DEFAULT_SINGLE_POSITION_MAX_PCT);
    let sector_max_pct = benchmark
        .and_then(|b| b.sector_max_pct)
        .unwrap_or(DEFAULT_SECTOR_MAX_PCT);
    let min_cash_pct = benchmark
        .and_then(|b| b.min_cash_pct)
        .unwrap_or(DEFAULT_MIN_CASH_PCT);
    let max_cash_pct = benchmark
        .and_then(|b| b.max_cash_pct)
        .unwrap_or(DEFAULT_MAX_CASH_PCT);

    let mut symbol_weights: BTreeMap<String, f64> = BTreeMap::new();
    let mut sector_weights: BTreeMap<String, f64> = BTreeMap::new();
    let short_term_cutoff = Utc::now() - Duration::days(365);

    for flat in &positions {
        let position = flat.position;
        let weight_pct = if total_value > 0.0 {
            position.market_value / total_value * 100.0
        } else {
            0.0
        };
        *symbol_weights.entry(position.symbol.clone()).or_insert(0.0) += weight_pct;
        let sector_key = position
            .sector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown")
            .to_string();
        *sector_weights.entry(sector_key).or_insert(0.0) += weight_pct;

        if weight_pct > single_position_max_pct {
            concentration_findings.push(format!(
                "{} in account {} is {} of portfolio (limit {}).",
                position.symbol,
                flat.account_id,
                fmt_pct(weight_pct),
                fmt_pct(single_position_max_pct)
            ));
        }

        if flat.account_type == AccountType::Taxable {
            let has_short_term_lots = position
                .tax_lots
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .any(|lot| lot.acquired_at > short_term_cutoff);
            if has_short_term_lots {
                tax_warnings.push(format!(
                    "{} has short-term tax lots in taxable account {}.",
                    position.symbol, flat.account_id
                ));
            }
        }
    }

    for (sector, weight_pct) in &sector_weights {
        if *weight_pct > sector_max_pct {
            diversification_findings.push(format!(
                "Sector concentration in {} is {} (policy max {}).",
                sector,
                fmt_pct(*weight_pct),
                fmt_pct(sector_max_pct)
            ));
        }
    }

    if symbol_weights.len() < 5 {
        diversification_findings.push(format!(
            "Portfolio has {} symbols; diversification may be limited.",
            symbol_weights.len()
        ));
    }

    if cash_pct < min_cash_pct {
        liquidity_findings.push(format!(
            "Cash allocation {} is below minimum {}.",
            fmt_pct(cash_pct),
            fmt_pct(min_cash_pct)
        ));
    }
    if cash_pct > max_cash_pct {
        liquidity_findings.push(format!(
            "Cash allocation {} is above maximum {} and may drag returns.",
            fmt_pct(cash_pct),
            fmt_pct(max_cash_pct)
        ));
    }

    for account in &portfolio.accounts {
        for restriction in account.restrictions.as_deref().unwrap_or(&[]) {
            let has_value = restriction
                .value
                .as_deref()
                .is_some_and(|v| !v.trim().is_empty());
            if restriction.kind == "no-buy" && has_value {
                restriction_violations.push(format!(
                    "Account {} has no-buy restriction for {}; ensure rebalance suggestions exclude it.",
                    account.account_id,
                    restriction.value.as_deref().unwrap_or_default()
                ));
            }
        }
    }

    if let Some(profile) = profile {
        for restriction in profile.restrictions.as_deref().unwrap_or(&[]) {
            if restriction.kind == "sector-ban" {
                if let Some(banned) = restriction.value.as_deref().map(str::trim) {
                    let sector_weight = sector_weights.get(banned).copied().unwrap_or(0.0);
                    if sector_weight > 0.0 {
                        restriction_violations.push(format!(
                            "Profile restricts sector {}, but current allocation is {}.",
                            banned,
                            fmt_pct(sector_weight)
                        ));
                    }
                }
            }
        }
    }

    // Fixed category order: concentration, diversification, liquidity,
    // restrictions, tax.
    if !concentration_findings.is_empty() {
        priority_actions.push("Reduce single-name concentration that exceeds policy limits.".to_string());
    }
    if !diversification_findings.is_empty() {
        priority_actions.push("Broaden diversification across sectors and symbols.".to_string());
    }
    if !liquidity_findings.is_empty() {
        priority_actions.push("Adjust cash allocation toward target range.".to_string());
    }
    if !restriction_violations.is_empty() {
        priority_actions.push("Resolve restriction conflicts before executing new trades.".to_string());
    }
    if !tax_warnings.is_empty() {
        priority_actions.push("Review tax-lot timing before trims in taxable accounts.".to_string());
    }

    if market_value <= 0.0 {
        warnings.push(
            "Portfolio market value is zero or missing; review is based on cash and provided values only."
                .to_string(),
        );
    }

    let review = PortfolioReview {
        summary: format!(
            "Portfolio review completed for {} account(s), {} position(s), total value {:.2} {}.",
            portfolio.accounts.len(),
            positions.len(),
            total_value,
            portfolio.base_currency
        ),
        concentration_findings,
        diversification_findings,
        liquidity_findings,
        restriction_violations,
        tax_warnings,
        priority_actions,
    };

    // Review coverage stays full; data gaps surface as warnings instead.
    Computed::full(review, warnings)
}
