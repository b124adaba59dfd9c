//! Investment Policy Statement builder. Goals override risk-tier defaults
//! where present; gaps surface as warnings.

use crate::models::{
    Cadence, ClientGoals, Computed, InvestmentPolicyStatement, InvestorProfile, PortfolioSnapshot,
    RangePct, Restriction, RiskTolerance, DISCLAIMER,
};
use crate::services::normalize::{portfolio_cash_value, portfolio_total_value};

struct TierDefaults {
    max_drawdown_pct: f64,
    cash_range: RangePct,
    single_position_max_pct: f64,
    sector_max_pct: f64,
    rebalance_frequency: Cadence,
}

fn default_target_return_range(profile: &InvestorProfile) -> RangePct {
    match profile.risk_tolerance {
        RiskTolerance::Conservative => RangePct::new(4.0, 8.0),
        RiskTolerance::Moderate => RangePct::new(6.0, 12.0),
        RiskTolerance::Aggressive => RangePct::new(9.0, 18.0),
    }
}

fn default_policy_by_risk(profile: &InvestorProfile) -> TierDefaults {
    match profile.risk_tolerance {
        RiskTolerance::Conservative => TierDefaults {
            max_drawdown_pct: 12.0,
            cash_range: RangePct::new(8.0, 25.0),
            single_position_max_pct: 12.0,
            sector_max_pct: 25.0,
            rebalance_frequency: Cadence::Monthly,
        },
        RiskTolerance::Moderate => TierDefaults {
            max_drawdown_pct: 20.0,
            cash_range: RangePct::new(4.0, 18.0),
            single_position_max_pct: 18.0,
            sector_max_pct: 35.0,
            rebalance_frequency: Cadence::Quarterly,
        },
        RiskTolerance::Aggressive => TierDefaults {
            max_drawdown_pct: 30.0,
            cash_range: RangePct::new(2.0, 12.0),
            single_position_max_pct: 25.0,
            sector_max_pct: 45.0,
            rebalance_frequency: Cadence::Quarterly,
        },
    }
}

fn restriction_line(restriction: &Restriction) -> String {
    match restriction.value.as_deref() {
        Some(value) if !value.is_empty() => format!("{}: {}", restriction.kind, value),
        _ => restriction.kind.clone(),
    }
}

pub fn build_investment_policy_statement(
    profile: &InvestorProfile,
    goals: &ClientGoals,
    portfolio: Option<&PortfolioSnapshot>,
) -> Computed<InvestmentPolicyStatement> {
    let mut warnings = Vec::new();
    let defaults = default_policy_by_risk(profile);

    let target_return_range_pct = goals
        .target_return_range_pct
        .unwrap_or_else(|| default_target_return_range(profile));
    let max_acceptable_drawdown_pct = goals
        .max_loss_tolerance_pct
        .unwrap_or(defaults.max_drawdown_pct);
    let cash_target_range_pct = match goals.liquidity_buffer_pct {
        Some(buffer) if buffer > 0.0 => {
            RangePct::new(buffer, (buffer + 6.0).max(defaults.cash_range.max))
        }
        _ => defaults.cash_range,
    };

    if goals.target_return_range_pct.is_none() {
        warnings.push("Target return range not provided; IPS applied risk-tier defaults.".to_string());
    }

    if let Some(portfolio) = portfolio {
        let total_value = portfolio_total_value(portfolio);
        let cash_pct = if total_value > 0.0 {
            portfolio_cash_value(portfolio) / total_value * 100.0
        } else {
            0.0
        };
        if !cash_target_range_pct.contains(cash_pct) {
            warnings.push("Current cash allocation is outside IPS target cash range.".to_string());
        }
    }

    let mut constraints = Vec::new();
    for restriction in profile.restrictions.as_deref().unwrap_or(&[]) {
        constraints.push(restriction_line(restriction));
    }
    for restriction in goals.restrictions.as_deref().unwrap_or(&[]) {
        constraints.push(restriction_line(restriction));
    }

    let ips = InvestmentPolicyStatement {
        risk_profile_tier: profile.risk_tolerance,
        investment_horizon: profile.investment_horizon,
        objectives: profile.objectives.clone(),
        target_return_range_pct,
        max_acceptable_drawdown_pct,
        cash_target_range_pct,
        single_position_max_pct: defaults.single_position_max_pct,
        sector_max_pct: defaults.sector_max_pct,
        rebalance_frequency: defaults.rebalance_frequency,
        review_cadence: Cadence::Quarterly,
        trading_rules: vec![
            "Use range-and-conditions execution, not deterministic all-in/all-out calls."
                .to_string(),
            "If a position breaches policy max weight, stage trims instead of one-shot liquidation."
                .to_string(),
            "Escalate review after stress-loss breaches or major regime shifts.".to_string(),
        ],
        constraints,
        assumptions: vec![
            "Inputs are based on available profile/goals data and may be incomplete.".to_string(),
            "Market liquidity and transaction costs must be validated at execution time."
                .to_string(),
        ],
        disclaimer: DISCLAIMER.to_string(),
    };

    Computed::from_warnings(ips, warnings)
}
