//! Input normalization for captured artifacts: trimmed strings, deduped
//! enums, derived market values and stable goal ids.

use crate::models::{
    ClientGoals, Computed, FlatPosition, GoalPriority, InvestorProfile, PortfolioPosition,
    PortfolioSnapshot, RangePct, Restriction,
};

fn trim_opt(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn normalize_restrictions(restrictions: Option<Vec<Restriction>>) -> Option<Vec<Restriction>> {
    restrictions.map(|list| {
        list.into_iter()
            .map(|restriction| Restriction {
                kind: restriction.kind.trim().to_string(),
                value: trim_opt(restriction.value),
                note: trim_opt(restriction.note),
            })
            .collect()
    })
}

pub fn normalize_profile(mut profile: InvestorProfile) -> InvestorProfile {
    profile.client_label = trim_opt(profile.client_label);
    let mut seen = Vec::new();
    profile.objectives.retain(|objective| {
        if seen.contains(objective) {
            false
        } else {
            seen.push(*objective);
            true
        }
    });
    if let Some(account_types) = profile.account_types.as_mut() {
        let mut seen = Vec::new();
        account_types.retain(|account_type| {
            if seen.contains(account_type) {
                false
            } else {
                seen.push(*account_type);
                true
            }
        });
    }
    profile.restrictions = normalize_restrictions(profile.restrictions);
    profile.notes = trim_opt(profile.notes);
    profile
}

fn normalize_position(mut position: PortfolioPosition) -> PortfolioPosition {
    position.symbol = position.symbol.trim().to_uppercase();
    position.sector = trim_opt(position.sector);
    if position.market_value == 0.0 {
        if let Some(last_price) = position.last_price {
            position.market_value = position.quantity * last_price;
        }
    }
    position
}

/// Uppercase symbols, trim sectors, derive missing market values from
/// quantity * last price, default the base currency to USD.
pub fn normalize_portfolio(mut portfolio: PortfolioSnapshot) -> PortfolioSnapshot {
    let currency = portfolio.base_currency.trim();
    portfolio.base_currency = if currency.is_empty() {
        "USD".to_string()
    } else {
        currency.to_uppercase()
    };
    for account in portfolio.accounts.iter_mut() {
        account.restrictions = normalize_restrictions(account.restrictions.take());
        account.positions = account
            .positions
            .drain(..)
            .map(normalize_position)
            .collect();
    }
    portfolio
}

/// Assign stable goal ids, default priorities to medium, order the target
/// return range, and warn on weak inputs.
pub fn normalize_goals(mut goals: ClientGoals) -> Computed<ClientGoals> {
    let mut warnings = Vec::new();

    for (index, goal) in goals.goals.iter_mut().enumerate() {
        if goal.goal_id.is_none() {
            goal.goal_id = Some(format!("goal-{}", index + 1));
        }
        goal.label = goal.label.trim().to_string();
        goal.notes = trim_opt(goal.notes.take());
        if goal.priority.is_none() {
            goal.priority = Some(GoalPriority::Medium);
        }
    }

    goals.target_return_range_pct = goals.target_return_range_pct.map(|range| {
        RangePct::new(
            range.min.min(range.max).clamp(0.0, 100.0),
            range.min.max(range.max).clamp(0.0, 100.0),
        )
    });

    if goals.goals.iter().any(|goal| goal.label.is_empty()) {
        warnings.push("Some financial goals had empty labels after trimming.".to_string());
    }
    if !goals.goals.iter().any(|goal| goal.target_date.is_some()) {
        warnings.push(
            "No target date provided in goals; planning horizon confidence is reduced."
                .to_string(),
        );
    }

    goals.restrictions = normalize_restrictions(goals.restrictions.take());
    goals.notes = trim_opt(goals.notes.take());

    Computed::from_warnings(goals, warnings)
}

pub fn flatten_positions(portfolio: &PortfolioSnapshot) -> Vec<FlatPosition<'_>> {
    let mut flattened = Vec::new();
    for account in &portfolio.accounts {
        for position in &account.positions {
            flattened.push(FlatPosition {
                position,
                account_id: &account.account_id,
                account_type: account.account_type,
            });
        }
    }
    flattened
}

pub fn portfolio_market_value(portfolio: &PortfolioSnapshot) -> f64 {
    portfolio
        .accounts
        .iter()
        .flat_map(|account| &account.positions)
        .map(|position| position.market_value)
        .sum()
}

pub fn portfolio_cash_value(portfolio: &PortfolioSnapshot) -> f64 {
    portfolio.accounts.iter().map(|account| account.cash_balance).sum()
}

pub fn portfolio_total_value(portfolio: &PortfolioSnapshot) -> f64 {
    portfolio_market_value(portfolio) + portfolio_cash_value(portfolio)
}
