//! Hypothetical shock scenarios over the current portfolio. Shocks stack
//! per position and are clamped at -95%.

use crate::models::{
    Computed, PortfolioSnapshot, ShockTarget, StressContributor, StressScenario,
    StressScenarioResult, StressShock, StressTestResult,
};
use crate::services::normalize::{flatten_positions, portfolio_total_value};

const SHOCK_FLOOR_PCT: f64 = -95.0;

fn default_scenarios(portfolio: &PortfolioSnapshot) -> Vec<StressScenario> {
    let positions = flatten_positions(portfolio);
    let largest = positions
        .iter()
        .max_by(|a, b| {
            a.position
                .market_value
                .partial_cmp(&b.position.market_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|flat| flat.position.symbol.clone());

    let market = |pct: f64| StressShock {
        target: ShockTarget::MarketBucket("all".to_string()),
        pct_change: pct,
    };
    let sector = |name: &str, pct: f64| StressShock {
        target: ShockTarget::Sector(name.to_string()),
        pct_change: pct,
    };

    vec![
        StressScenario { name: "market_down_10".to_string(), shocks: vec![market(-10.0)] },
        StressScenario { name: "market_down_20".to_string(), shocks: vec![market(-20.0)] },
        StressScenario {
            name: "tech_drawdown_25".to_string(),
            shocks: vec![sector("Technology", -25.0), market(-8.0)],
        },
        StressScenario {
            name: "rates_up_rotation".to_string(),
            shocks: vec![
                sector("Technology", -12.0),
                sector("Utilities", 4.0),
                market(-5.0),
            ],
        },
        StressScenario {
            name: "single_position_gap_down_15".to_string(),
            shocks: match largest {
                Some(symbol) => vec![StressShock {
                    target: ShockTarget::Symbol(symbol),
                    pct_change: -15.0,
                }],
                None => vec![market(-5.0)],
            },
        },
    ]
}

fn aggregate_shock_pct(symbol: &str, sector: Option<&str>, shocks: &[StressShock]) -> f64 {
    let mut pct = 0.0;
    for shock in shocks {
        let applies = match &shock.target {
            ShockTarget::MarketBucket(bucket) => bucket.eq_ignore_ascii_case("all"),
            ShockTarget::Symbol(target) => target.eq_ignore_ascii_case(symbol),
            ShockTarget::Sector(target) => {
                sector.is_some_and(|s| target.eq_ignore_ascii_case(s))
            }
        };
        if applies {
            pct += shock.pct_change;
        }
    }
    pct.max(SHOCK_FLOOR_PCT)
}

fn run_scenario(portfolio: &PortfolioSnapshot, scenario: &StressScenario) -> StressScenarioResult {
    let total_value = portfolio_total_value(portfolio);
    let mut contributors: Vec<StressContributor> = Vec::new();
    let mut estimated_pnl = 0.0;

    for flat in flatten_positions(portfolio) {
        let shock_pct = aggregate_shock_pct(
            &flat.position.symbol,
            flat.position.sector.as_deref(),
            &scenario.shocks,
        );
        if shock_pct == 0.0 {
            continue;
        }

        let pnl = flat.position.market_value * (shock_pct / 100.0);
        estimated_pnl += pnl;
        contributors.push(StressContributor {
            symbol: flat.position.symbol.clone(),
            account_id: flat.account_id.to_string(),
            estimated_pnl: pnl,
        });
    }

    contributors.sort_by(|a, b| {
        a.estimated_pnl
            .partial_cmp(&b.estimated_pnl)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    contributors.truncate(3);

    StressScenarioResult {
        name: scenario.name.clone(),
        estimated_portfolio_change_pct: if total_value > 0.0 {
            estimated_pnl / total_value * 100.0
        } else {
            0.0
        },
        estimated_pnl,
        top_loss_contributors: contributors,
    }
}

pub fn build_stress_test(
    portfolio: &PortfolioSnapshot,
    scenarios: Option<Vec<StressScenario>>,
) -> Computed<StressTestResult> {
    let scenarios = match scenarios {
        Some(list) if !list.is_empty() => list,
        _ => default_scenarios(portfolio),
    };
    let mut warnings = Vec::new();

    if scenarios.iter().any(|s| s.name == "rates_up_rotation") {
        warnings.push(
            "rates_up_rotation uses simplified sector shocks (placeholder methodology).".to_string(),
        );
    }

    let scenario_results: Vec<StressScenarioResult> = scenarios
        .iter()
        .map(|scenario| run_scenario(portfolio, scenario))
        .collect();

    // Worst is the most negative aggregate change; first wins on ties.
    let mut worst_scenario = StressScenarioResult {
        name: "none".to_string(),
        estimated_portfolio_change_pct: 0.0,
        estimated_pnl: 0.0,
        top_loss_contributors: vec![],
    };
    let mut found = false;
    for result in &scenario_results {
        if !found
            || result.estimated_portfolio_change_pct < worst_scenario.estimated_portfolio_change_pct
        {
            worst_scenario = result.clone();
            found = true;
        }
    }

    let mut seen = Vec::new();
    let key_vulnerabilities: Vec<String> = worst_scenario
        .top_loss_contributors
        .iter()
        .filter(|contributor| {
            if seen.contains(&contributor.symbol) {
                false
            } else {
                seen.push(contributor.symbol.clone());
                true
            }
        })
        .map(|contributor| {
            format!(
                "{} is a major contributor in the worst stress scenario ({}).",
                contributor.symbol, worst_scenario.name
            )
        })
        .collect();

    // Stress coverage stays full; methodology caveats ride as warnings.
    Computed::full(
        StressTestResult {
            scenario_results,
            worst_scenario,
            key_vulnerabilities,
        },
        warnings,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, PortfolioAccount, PortfolioPosition};
    use chrono::Utc;

    fn position(symbol: &str, market_value: f64, sector: &str) -> PortfolioPosition {
        PortfolioPosition {
            symbol: symbol.to_string(),
            quantity: 1.0,
            last_price: None,
            market_value,
            avg_cost: None,
            sector: Some(sector.to_string()),
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

    #[test]
    fn default_pack_runs_five_scenarios() {
        let portfolio = snapshot(
            vec![position("AAPL", 60_000.0, "Technology"), position("KO", 20_000.0, "Staples")],
            20_000.0,
        );
        let computed = build_stress_test(&portfolio, None);
        assert_eq!(computed.value.scenario_results.len(), 5);
        assert!(computed
            .warnings
            .iter()
            .any(|w| w.contains("rates_up_rotation")));
    }

    #[test]
    fn sector_and_market_shocks_stack() {
        // tech_drawdown_25: Technology takes -25 + -8 = -33, Staples -8
        let portfolio = snapshot(
            vec![position("AAPL", 50_000.0, "Technology"), position("KO", 30_000.0, "Staples")],
            20_000.0,
        );
        let computed = build_stress_test(&portfolio, None);
        let tech = computed
            .value
            .scenario_results
            .iter()
            .find(|r| r.name == "tech_drawdown_25")
            .unwrap();
        let expected_pnl = 50_000.0 * -0.33 + 30_000.0 * -0.08;
        assert!((tech.estimated_pnl - expected_pnl).abs() < 1e-6);
    }

    #[test]
    fn worst_scenario_is_most_negative() {
        let portfolio = snapshot(
            vec![position("AAPL", 70_000.0, "Technology"), position("KO", 20_000.0, "Staples")],
            10_000.0,
        );
        let computed = build_stress_test(&portfolio, None);
        let worst = &computed.value.worst_scenario;
        // Technology-heavy book: tech_drawdown_25 dominates market_down_20
        assert_eq!(worst.name, "tech_drawdown_25");
        assert!(!computed.value.key_vulnerabilities.is_empty());
        assert!(computed.value.key_vulnerabilities[0].contains("AAPL"));
    }

    #[test]
    fn stacked_shocks_clamp_at_floor() {
        let portfolio = snapshot(vec![position("AAPL", 10_000.0, "Technology")], 0.0);
        let scenarios = vec![StressScenario {
            name: "meltdown".to_string(),
            shocks: vec![
                StressShock {
                    target: ShockTarget::Sector("Technology".to_string()),
                    pct_change: -80.0,
                },
                StressShock {
                    target: ShockTarget::MarketBucket("all".to_string()),
                    pct_change: -40.0,
                },
            ],
        }];
        let computed = build_stress_test(&portfolio, Some(scenarios));
        let result = &computed.value.scenario_results[0];
        assert!((result.estimated_pnl - (10_000.0 * -0.95)).abs() < 1e-6);
    }

    #[test]
    fn largest_position_gap_scenario_targets_biggest_holding() {
        let portfolio = snapshot(
            vec![position("AAPL", 60_000.0, "Technology"), position("KO", 20_000.0, "Staples")],
            20_000.0,
        );
        let computed = build_stress_test(&portfolio, None);
        let gap = computed
            .value
            .scenario_results
            .iter()
            .find(|r| r.name == "single_position_gap_down_15")
            .unwrap();
        assert_eq!(gap.top_loss_contributors.len(), 1);
        assert_eq!(gap.top_loss_contributors[0].symbol, "AAPL");
        assert!((gap.estimated_pnl - 60_000.0 * -0.15).abs() < 1e-6);
    }
}
