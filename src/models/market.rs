use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Candle timeframes accepted by quote providers. Unknown inputs fall back
/// to daily.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Timeframe {
    #[serde(rename = "1H")]
    Hour,
    #[serde(rename = "1D")]
    Day,
    #[serde(rename = "1W")]
    Week,
    #[serde(rename = "1M")]
    Month,
}

impl Timeframe {
    pub fn parse(value: Option<&str>) -> Timeframe {
        match value.map(|v| v.trim().to_uppercase()).as_deref() {
            Some("1H") => Timeframe::Hour,
            Some("1W") => Timeframe::Week,
            Some("1M") => Timeframe::Month,
            _ => Timeframe::Day,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Hour => "1H",
            Timeframe::Day => "1D",
            Timeframe::Week => "1W",
            Timeframe::Month => "1M",
        }
    }
}

/// One OHLCV candle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Candle series for one symbol/timeframe, annotated with the provider that
/// served it and any fallback warnings collected along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketData {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub limit: usize,
    pub source_used: String,
    pub warnings: Vec<String>,
    pub candles: Vec<Candle>,
    pub fetched_at: DateTime<Utc>,
}

/// Derived indicator bundle over a close-price series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub last_close: f64,
    pub sma20: f64,
    pub ema20: f64,
    pub rsi14: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
    /// Standard deviation of trailing log returns, annualized by sqrt(252).
    pub volatility_annualized: f64,
    /// Most negative peak-to-trough decline as a fraction (<= 0).
    pub max_drawdown: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportConfidence {
    Low,
    Medium,
    High,
}

/// Narrative analysis report derived from one indicator set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub source_used: String,
    pub conclusion: String,
    pub key_evidence: Vec<String>,
    pub risk_points: Vec<String>,
    pub watch_levels: Vec<String>,
    pub confidence: ReportConfidence,
    pub disclaimer: String,
    pub warnings: Vec<String>,
}

/// Fully resolved analysis session: market data, indicators and narrative
/// report under one analysis id. Engines that need indicator context take
/// this as input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub analysis_id: Uuid,
    pub market: MarketData,
    pub indicators: IndicatorSet,
    pub report: AnalysisReport,
}
