use crate::models::{AnalysisReport, IndicatorSet, ReportConfidence, Timeframe, DISCLAIMER};

fn confidence(indicators: &IndicatorSet) -> ReportConfidence {
    if !indicators.volatility_annualized.is_finite() || indicators.volatility_annualized > 0.45 {
        return ReportConfidence::Low;
    }
    if (45.0..=70.0).contains(&indicators.rsi14) && indicators.macd_histogram > 0.0 {
        return ReportConfidence::High;
    }
    ReportConfidence::Medium
}

/// Turn an indicator set into the narrative analysis report. Pure; the
/// provider warnings ride along unchanged.
pub fn generate_report(
    symbol: &str,
    timeframe: Timeframe,
    source_used: &str,
    indicators: &IndicatorSet,
    warnings: Vec<String>,
) -> AnalysisReport {
    let trend_up =
        indicators.last_close >= indicators.sma20 && indicators.last_close >= indicators.ema20;
    let momentum_up = indicators.macd_histogram >= 0.0;
    let state = if trend_up && momentum_up {
        "bullish"
    } else if trend_up {
        "neutral-to-bullish"
    } else {
        "neutral-to-bearish"
    };

    AnalysisReport {
        symbol: symbol.to_string(),
        timeframe,
        source_used: source_used.to_string(),
        conclusion: format!(
            "{} on {} appears {} with close {:.2}.",
            symbol,
            timeframe.as_str(),
            state,
            indicators.last_close
        ),
        key_evidence: vec![
            format!(
                "Price {:.2} vs SMA20 {:.2} and EMA20 {:.2}.",
                indicators.last_close, indicators.sma20, indicators.ema20
            ),
            format!("RSI14 at {:.2}.", indicators.rsi14),
            format!(
                "MACD line {:.3} vs signal {:.3} (hist {:.3}).",
                indicators.macd_line, indicators.macd_signal, indicators.macd_histogram
            ),
        ],
        risk_points: vec![
            format!(
                "Annualized volatility {:.3} may increase swings.",
                indicators.volatility_annualized
            ),
            format!(
                "Observed max drawdown {:.2}%.",
                (indicators.max_drawdown * 100.0).abs()
            ),
        ],
        watch_levels: vec![
            format!("Support watch: EMA20 {:.2}.", indicators.ema20),
            format!("Trend watch: SMA20 {:.2}.", indicators.sma20),
        ],
        confidence: confidence(indicators),
        disclaimer: DISCLAIMER.to_string(),
        warnings,
    }
}
