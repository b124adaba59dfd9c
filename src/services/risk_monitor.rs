//! Risk-budget monitoring against registry thresholds. Escalation margins
//! live on `SeverityMargins` so policy owners can tune them.

use std::collections::BTreeMap;

use crate::models::{
    AnalysisContext, Computed, PortfolioSnapshot, RiskBudgetMonitor, RiskFlag, RiskSeverity,
    RiskThresholdTemplate, RiskTolerance, SeverityMargins, StressTestResult, TargetPolicy,
};
use crate::services::normalize::{
    flatten_positions, portfolio_cash_value, portfolio_total_value,
};
use crate::services::risk_templates::resolve_thresholds;

#[derive(Default)]
pub struct RiskMonitorInput<'a> {
    pub analysis: Option<&'a AnalysisContext>,
    pub stress_test: Option<&'a StressTestResult>,
    pub target_policy: Option<&'a TargetPolicy>,
    pub risk_template: Option<RiskThresholdTemplate>,
    pub margins: Option<SeverityMargins>,
}

fn escalate(excess: f64, margin: f64) -> RiskSeverity {
    if excess >= margin {
        RiskSeverity::Critical
    } else {
        RiskSeverity::Warning
    }
}

pub fn build_risk_monitor(
    risk_tier: RiskTolerance,
    portfolio: &PortfolioSnapshot,
    input: RiskMonitorInput<'_>,
) -> Computed<RiskBudgetMonitor> {
    let mut warnings = Vec::new();
    let mut flags: Vec<RiskFlag> = Vec::new();
    let margins = input.margins.unwrap_or_default();
    let (template, thresholds) = resolve_thresholds(
        risk_tier,
        input.risk_template,
        input.target_policy.and_then(|p| p.single_position_max_pct),
    );

    let total_value = portfolio_total_value(portfolio);
    let cash_pct = if total_value > 0.0 {
        portfolio_cash_value(portfolio) / total_value * 100.0
    } else {
        0.0
    };

    let mut symbol_weights: BTreeMap<String, f64> = BTreeMap::new();
    let mut sector_weights: BTreeMap<String, f64> = BTreeMap::new();
    for flat in flatten_positions(portfolio) {
        let weight_pct = if total_value > 0.0 {
            flat.position.market_value / total_value * 100.0
        } else {
            0.0
        };
        *symbol_weights.entry(flat.position.symbol.clone()).or_insert(0.0) += weight_pct;
        let sector = flat
            .position
            .sector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown")
            .to_string();
        *sector_weights.entry(sector).or_insert(0.0) += weight_pct;
    }

    let largest_position_pct = symbol_weights.values().copied().fold(0.0, f64::max);
    if largest_position_pct > thresholds.max_single_position_pct {
        flags.push(RiskFlag {
            code: "SINGLE_POSITION_LIMIT".to_string(),
            severity: escalate(
                largest_position_pct - thresholds.max_single_position_pct,
                margins.single_position_pct,
            ),
            message: format!(
                "Largest position {:.1}% exceeds limit {:.1}%.",
                largest_position_pct, thresholds.max_single_position_pct
            ),
            metric: Some(largest_position_pct),
            threshold: Some(thresholds.max_single_position_pct),
        });
    }

    let largest_sector_pct = sector_weights.values().copied().fold(0.0, f64::max);
    if largest_sector_pct > thresholds.max_sector_pct {
        flags.push(RiskFlag {
            code: "SECTOR_CONCENTRATION".to_string(),
            severity: escalate(largest_sector_pct - thresholds.max_sector_pct, margins.sector_pct),
            message: format!(
                "Largest sector {:.1}% exceeds limit {:.1}%.",
                largest_sector_pct, thresholds.max_sector_pct
            ),
            metric: Some(largest_sector_pct),
            threshold: Some(thresholds.max_sector_pct),
        });
    }

    if cash_pct < thresholds.min_cash_pct || cash_pct > thresholds.max_cash_pct {
        // Cash breaches never escalate past warning.
        flags.push(RiskFlag {
            code: "CASH_RANGE".to_string(),
            severity: RiskSeverity::Warning,
            message: format!(
                "Cash {:.1}% outside target {:.1}-{:.1}%.",
                cash_pct, thresholds.min_cash_pct, thresholds.max_cash_pct
            ),
            metric: Some(cash_pct),
            threshold: None,
        });
    }

    match input.analysis {
        Some(analysis) => {
            let volatility = analysis.indicators.volatility_annualized;
            if volatility > thresholds.max_volatility_annualized {
                flags.push(RiskFlag {
                    code: "VOLATILITY_LIMIT".to_string(),
                    severity: escalate(
                        volatility - thresholds.max_volatility_annualized,
                        margins.volatility,
                    ),
                    message: format!(
                        "Volatility {:.2} exceeds threshold {:.2}.",
                        volatility, thresholds.max_volatility_annualized
                    ),
                    metric: Some(volatility),
                    threshold: Some(thresholds.max_volatility_annualized),
                });
            }

            let drawdown_pct = (analysis.indicators.max_drawdown * 100.0).abs();
            if drawdown_pct > thresholds.max_drawdown_pct {
                flags.push(RiskFlag {
                    code: "DRAWDOWN_LIMIT".to_string(),
                    severity: escalate(drawdown_pct - thresholds.max_drawdown_pct, margins.drawdown_pct),
                    message: format!(
                        "Drawdown {:.1}% exceeds threshold {:.1}%.",
                        drawdown_pct, thresholds.max_drawdown_pct
                    ),
                    metric: Some(drawdown_pct),
                    threshold: Some(thresholds.max_drawdown_pct),
                });
            }
        }
        None => {
            warnings.push(
                "No analysis context provided; volatility and drawdown checks were skipped."
                    .to_string(),
            );
        }
    }

    match input.stress_test {
        Some(stress_test) => {
            let worst_loss_pct = stress_test.worst_scenario.estimated_portfolio_change_pct.abs();
            if worst_loss_pct > thresholds.max_stress_loss_pct {
                flags.push(RiskFlag {
                    code: "STRESS_LOSS_LIMIT".to_string(),
                    severity: escalate(
                        worst_loss_pct - thresholds.max_stress_loss_pct,
                        margins.stress_loss_pct,
                    ),
                    message: format!(
                        "Worst stress loss {:.1}% exceeds threshold {:.1}%.",
                        worst_loss_pct, thresholds.max_stress_loss_pct
                    ),
                    metric: Some(worst_loss_pct),
                    threshold: Some(thresholds.max_stress_loss_pct),
                });
            }
        }
        None => {
            warnings.push("No stress test provided; stress-loss checks were skipped.".to_string());
        }
    }

    if flags.is_empty() {
        flags.push(RiskFlag {
            code: "RISK_WITHIN_BUDGET".to_string(),
            severity: RiskSeverity::Info,
            message: "No risk-budget breaches detected.".to_string(),
            metric: None,
            threshold: None,
        });
    }

    let overall_severity = flags
        .iter()
        .map(|flag| flag.severity)
        .max()
        .unwrap_or(RiskSeverity::Info);

    let monitor = RiskBudgetMonitor {
        risk_tier,
        thresholds,
        template_id: template.template_id,
        template_version: template.version,
        summary: format!(
            "Risk monitor completed with {} flag(s), severity={}.",
            flags.len(),
            match overall_severity {
                RiskSeverity::Info => "info",
                RiskSeverity::Warning => "warning",
                RiskSeverity::Critical => "critical",
            }
        ),
        flags,
        overall_severity,
    };

    Computed::from_warnings(monitor, warnings)
}
