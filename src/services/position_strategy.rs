//! Position sizing and entry/exit framing for one symbol. The exposure
//! ceiling shrinks with weaker fit and higher volatility.

use crate::models::{
    AccountType, AnalysisContext, Computed, Coverage, Envelope, ExecutionConstraints, FitLevel,
    InvestorProfile, PositionStrategyPlan, RiskTolerance, SuitabilityAssessment,
};
use crate::services::suitability::{build_suitability_assessment, PositionContext};

pub const HIGH_VOLATILITY_THRESHOLD: f64 = 0.5;

#[derive(Default)]
pub struct PositionStrategyInput<'a> {
    pub assessment: Option<&'a Envelope<SuitabilityAssessment>>,
    pub position_context: Option<&'a PositionContext>,
    pub risk_budget_pct: Option<f64>,
    pub execution_constraints: Option<&'a ExecutionConstraints>,
}

fn base_range_by_risk(profile: &InvestorProfile) -> (f64, f64) {
    match profile.risk_tolerance {
        RiskTolerance::Conservative => (0.0, 8.0),
        RiskTolerance::Moderate => (3.0, 15.0),
        RiskTolerance::Aggressive => (5.0, 25.0),
    }
}

pub fn build_position_strategy(
    analysis: &AnalysisContext,
    profile: &InvestorProfile,
    input: PositionStrategyInput<'_>,
) -> Computed<PositionStrategyPlan> {
    let mut constraint_notes = Vec::new();

    let (fit, coverage, mut warnings) = match input.assessment {
        Some(envelope) => (
            envelope.payload.summary.fit,
            envelope.coverage,
            envelope.warnings.clone(),
        ),
        None => {
            let derived =
                build_suitability_assessment(analysis, profile, None, input.position_context);
            (
                derived.value.summary.fit,
                Coverage::Partial,
                vec!["Assessment was derived without fundamentals data.".to_string()],
            )
        }
    };

    let (base_min, base_max) = base_range_by_risk(profile);
    let mut min = base_min;
    let mut max = base_max;

    match fit {
        FitLevel::PoorFit => max *= 0.5,
        FitLevel::ConditionalFit => max *= 0.75,
        FitLevel::GoodFit => {}
    }

    let volatility = analysis.indicators.volatility_annualized;
    if volatility > HIGH_VOLATILITY_THRESHOLD {
        max *= 0.7;
        warnings.push(format!(
            "High volatility ({volatility:.2}) reduced suggested exposure range."
        ));
    }

    if let Some(budget) = input.risk_budget_pct {
        if budget < max {
            max = budget;
            constraint_notes.push(format!("Risk budget capped exposure ceiling at {budget:.1}%."));
        }
    }

    if let Some(exposure) = input.position_context.and_then(|ctx| ctx.current_exposure_pct) {
        if exposure > max {
            min = 0.0;
            constraint_notes.push(format!(
                "Current exposure {exposure:.1}% already exceeds the suggested ceiling; floor relaxed to 0."
            ));
        }
    }

    min = min.clamp(0.0, 100.0);
    max = max.max(min).clamp(min, 100.0);

    let ema20 = analysis.indicators.ema20;
    let sma20 = analysis.indicators.sma20;
    let rsi14 = analysis.indicators.rsi14;
    let macd_histogram = analysis.indicators.macd_histogram;

    let entry_conditions = vec![
        format!("Prefer entries while price holds above EMA20 ({ema20:.2})."),
        format!(
            "Seek improving momentum confirmation (MACD histogram > {:.3}).",
            macd_histogram.max(0.0)
        ),
        format!(
            "Add only if exposure remains within {min:.1}-{max:.1}% range and trend remains intact."
        ),
        format!("Stagger adds when RSI14 normalizes toward 45-60 (current {rsi14:.1})."),
    ];

    let exit_conditions = vec![
        format!(
            "Trim if exposure exceeds range ceiling ({max:.1}%) or position outgrows portfolio risk budget."
        ),
        "Trim on momentum deterioration after failed highs (MACD histogram rolls negative)."
            .to_string(),
        format!("Risk exit if price closes below EMA20 ({ema20:.2}) and fails reclaim attempts."),
        format!("Escalate risk controls if price breaks below SMA20 ({sma20:.2})."),
    ];

    let rationale = vec![
        "Sudden change in investor liquidity needs or account constraints.".to_string(),
        "Material negative fundamental event not reflected in current analysis.".to_string(),
        format!("Volatility regime shift materially above current {volatility:.2} baseline."),
    ];

    let mut tax_notes = Vec::new();
    let in_taxable_account =
        input.position_context.and_then(|ctx| ctx.account_type) == Some(AccountType::Taxable);
    if in_taxable_account {
        tax_notes.push("Consider tax impact before trims or full exits in taxable accounts.".to_string());
        if input
            .position_context
            .and_then(|ctx| ctx.unrealized_gain_pct)
            .unwrap_or(0.0)
            > 0.0
        {
            tax_notes.push(
                "Prefer staged trims if unrealized gains are significant and timing is flexible."
                    .to_string(),
            );
        }
    }

    if let Some(constraints) = input.execution_constraints {
        if constraints.avoid_selling == Some(true) {
            tax_notes.push(
                "Execution constraints indicate avoiding sells; use tighter add criteria instead."
                    .to_string(),
            );
        }
        if constraints
            .blacklist_symbols
            .as_deref()
            .is_some_and(|list| !list.is_empty())
        {
            warnings.push(
                "Blacklist constraints were provided; ensure the analyzed symbol is not restricted before execution."
                    .to_string(),
            );
        }
        if constraints.no_margin == Some(true) {
            warnings.push("No-margin constraint assumed; range excludes leveraged sizing.".to_string());
        }
    }

    let plan = PositionStrategyPlan {
        symbol: analysis.market.symbol.clone(),
        analysis_id: analysis.analysis_id,
        fit,
        min_position_pct: min,
        max_position_pct: max,
        entry_conditions,
        exit_conditions,
        tax_notes,
        constraint_notes,
        rationale,
    };

    Computed { value: plan, coverage, warnings }
}
