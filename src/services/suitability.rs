//! Symbol suitability relative to one investor profile. Fit degrades with
//! misalignments and stacked assumptions.

use crate::models::{
    AccountType, AnalysisContext, Computed, Coverage, Envelope, FitLevel, FundamentalsArtifact,
    InvestorProfile, LiquidityNeeds, RiskTolerance, SuitabilityAssessment, SuitabilitySummary,
    Timeframe,
};

pub const CONSERVATIVE_VOLATILITY_CEILING: f64 = 0.35;
pub const MODERATE_VOLATILITY_CEILING: f64 = 0.55;

/// Existing-position context supplied by the caller. All fields optional;
/// defaults mean "new position, no known exposure".
#[derive(Debug, Clone, Default)]
pub struct PositionContext {
    pub is_existing_position: bool,
    pub current_exposure_pct: Option<f64>,
    pub account_type: Option<AccountType>,
    pub unrealized_gain_pct: Option<f64>,
}

pub fn build_suitability_assessment(
    analysis: &AnalysisContext,
    profile: &InvestorProfile,
    fundamentals: Option<&Envelope<FundamentalsArtifact>>,
    position_context: Option<&PositionContext>,
) -> Computed<SuitabilityAssessment> {
    let mut fit_reasons = Vec::new();
    let mut misalignments = Vec::new();
    let mut assumptions = Vec::new();
    let mut warnings = Vec::new();

    let indicators = &analysis.indicators;
    let volatility = indicators.volatility_annualized;
    let drawdown_pct = (indicators.max_drawdown * 100.0).abs();
    let trend_up = indicators.last_close >= indicators.ema20;

    if trend_up {
        fit_reasons
            .push("Price is above EMA20, which supports trend-following entries.".to_string());
    } else {
        misalignments.push(
            "Price is below EMA20, which weakens short-term trend confirmation.".to_string(),
        );
    }

    match profile.risk_tolerance {
        RiskTolerance::Conservative => {
            if volatility > CONSERVATIVE_VOLATILITY_CEILING {
                misalignments.push(format!(
                    "Annualized volatility {volatility:.2} exceeds conservative comfort levels."
                ));
            } else {
                fit_reasons.push(
                    "Observed volatility is within a conservative screening range.".to_string(),
                );
            }
        }
        RiskTolerance::Moderate => {
            if volatility > MODERATE_VOLATILITY_CEILING {
                misalignments.push(format!(
                    "Annualized volatility {volatility:.2} is elevated for a moderate profile."
                ));
            } else {
                fit_reasons.push(
                    "Volatility is generally compatible with a moderate risk profile.".to_string(),
                );
            }
        }
        RiskTolerance::Aggressive => {
            fit_reasons.push(
                "Aggressive risk tolerance can absorb higher short-term variance.".to_string(),
            );
        }
    }

    if let Some(tolerance) = profile.max_drawdown_tolerance_pct {
        if drawdown_pct > tolerance {
            misalignments.push(format!(
                "Observed max drawdown {drawdown_pct:.1}% exceeds stated tolerance {tolerance:.1}%."
            ));
        }
    }

    if profile.liquidity_needs == LiquidityNeeds::High && analysis.market.timeframe != Timeframe::Day
    {
        assumptions.push(
            "High liquidity need should be checked against trading volume and spread at execution time."
                .to_string(),
        );
    }

    let is_existing = position_context.is_some_and(|ctx| ctx.is_existing_position);
    if indicators.rsi14 >= 70.0 && !is_existing {
        assumptions.push("Entry assumes momentum continuation despite elevated RSI.".to_string());
    }

    if is_existing {
        if let Some(exposure) = position_context.and_then(|ctx| ctx.current_exposure_pct) {
            fit_reasons.push(format!(
                "Existing exposure ({exposure:.1}%) can be managed with staged decisions instead of full re-entry."
            ));
        }
    }

    let coverage = match fundamentals {
        None => {
            warnings.push(
                "Fundamentals data not provided; suitability is based on technicals and profile only."
                    .to_string(),
            );
            assumptions.push(
                "Issuer fundamentals do not materially conflict with the technical setup."
                    .to_string(),
            );
            Coverage::Partial
        }
        Some(envelope) => {
            warnings.extend(envelope.warnings.iter().cloned());
            if envelope.coverage != Coverage::Full {
                assumptions.push(
                    "Missing fundamentals sections could change the suitability assessment."
                        .to_string(),
                );
            }
            envelope.coverage
        }
    };

    let fit = if misalignments.len() >= 2 {
        FitLevel::PoorFit
    } else if misalignments.len() == 1 || assumptions.len() >= 2 {
        FitLevel::ConditionalFit
    } else {
        FitLevel::GoodFit
    };

    let assessment = SuitabilityAssessment {
        symbol: analysis.market.symbol.clone(),
        analysis_id: analysis.analysis_id,
        profile: profile.clone(),
        fundamentals_id: fundamentals.map(|envelope| envelope.id),
        summary: SuitabilitySummary { fit, fit_reasons, misalignments, assumptions },
    };

    Computed { value: assessment, coverage, warnings }
}
