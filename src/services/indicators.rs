//! Scalar indicator math over close-price series.
//!
//! Every function returns `f64::NAN` when the input is too short instead of
//! erroring; `compute_indicator_set` is the fail-fast boundary that turns a
//! non-finite output into `InsufficientData`.

use crate::errors::AdvisoryError;
use crate::models::{Candle, IndicatorSet};

pub const MIN_REQUIRED_CANDLES: usize = 30;

/// Simple moving average of the trailing `period` values.
pub fn sma(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() < period {
        return f64::NAN;
    }
    let window = &values[values.len() - period..];
    window.iter().sum::<f64>() / period as f64
}

/// Exponential moving average over the whole series, seeded with the first
/// value, k = 2 / (period + 1).
pub fn ema(values: &[f64], period: usize) -> f64 {
    if values.is_empty() || period == 0 {
        return f64::NAN;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = values[0];
    for value in &values[1..] {
        ema = value * k + ema * (1.0 - k);
    }
    ema
}

/// RSI over the trailing `period` deltas. 100 when there are no losses.
pub fn rsi(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() <= period {
        return f64::NAN;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in values.len() - period..values.len() {
        let change = values[i] - values[i - 1];
        if change >= 0.0 {
            gains += change;
        } else {
            losses += change.abs();
        }
    }

    if losses == 0.0 {
        return 100.0;
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[derive(Debug, Clone, Copy)]
pub struct Macd {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD line = EMA(fast) - EMA(slow) over the full series. The signal is an
/// EMA(signal_period) over the seed series recomputed at every prefix,
/// keeping only finite seeds.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal_period: usize) -> Macd {
    if values.len() < slow {
        return Macd { line: f64::NAN, signal: f64::NAN, histogram: f64::NAN };
    }

    let line = ema(values, fast) - ema(values, slow);
    let seeds: Vec<f64> = (0..values.len())
        .map(|i| {
            let prefix = &values[..=i];
            ema(prefix, fast) - ema(prefix, slow)
        })
        .filter(|seed| seed.is_finite())
        .collect();
    let signal = ema(&seeds, signal_period);

    Macd { line, signal, histogram: line - signal }
}

/// Population standard deviation of the trailing `period` log returns,
/// annualized by sqrt(252).
pub fn annualized_volatility(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() <= period {
        return f64::NAN;
    }

    let returns: Vec<f64> = (values.len() - period..values.len())
        .map(|i| (values[i] / values[i - 1]).ln())
        .collect();

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    variance.sqrt() * 252f64.sqrt()
}

/// Most negative peak-to-trough decline as a fraction, always <= 0.
pub fn max_drawdown(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut peak = values[0];
    let mut worst = 0.0;
    for &value in values {
        if value > peak {
            peak = value;
            continue;
        }
        let drawdown = (value - peak) / peak;
        if drawdown < worst {
            worst = drawdown;
        }
    }
    worst
}

/// Derive the full indicator bundle from a candle series. Requires at least
/// 30 candles and finite outputs across the board.
pub fn compute_indicator_set(candles: &[Candle]) -> Result<IndicatorSet, AdvisoryError> {
    if candles.len() < MIN_REQUIRED_CANDLES {
        return Err(AdvisoryError::InsufficientData(format!(
            "At least {} candles are required, got {}",
            MIN_REQUIRED_CANDLES,
            candles.len()
        )));
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let last_close = closes[closes.len() - 1];
    let sma20 = sma(&closes, 20);
    let ema20 = ema(&closes, 20);
    let rsi14 = rsi(&closes, 14);
    let macd = macd(&closes, 12, 26, 9);
    let volatility_annualized = annualized_volatility(&closes, 20);
    let max_drawdown = max_drawdown(&closes);

    let outputs = [
        last_close,
        sma20,
        ema20,
        rsi14,
        macd.line,
        macd.signal,
        macd.histogram,
        volatility_annualized,
        max_drawdown,
    ];
    if outputs.iter().any(|v| !v.is_finite()) {
        return Err(AdvisoryError::InsufficientData(
            "Cannot compute indicators from the current candle set".to_string(),
        ));
    }

    Ok(IndicatorSet {
        last_close,
        sma20,
        ema20,
        rsi14,
        macd_line: macd.line,
        macd_signal: macd.signal,
        macd_histogram: macd.histogram,
        volatility_annualized,
        max_drawdown,
    })
}
