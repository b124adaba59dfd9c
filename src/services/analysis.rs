use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::AdvisoryError;
use crate::external::{route_quote, DataProvider, QuoteRequest};
use crate::models::{AnalysisContext, MarketData, Timeframe};
use crate::services::indicators::compute_indicator_set;
use crate::services::report::generate_report;

pub const DEFAULT_CANDLE_LIMIT: usize = 200;

#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub timeframe: Option<Timeframe>,
    pub limit: Option<usize>,
}

/// End-to-end market analysis: route the quote, derive indicators, generate
/// the narrative report. Fails before touching the network when no
/// providers are configured.
pub async fn run_market_analysis(
    request: AnalysisRequest,
    providers: &[Box<dyn DataProvider>],
) -> Result<AnalysisContext, AdvisoryError> {
    if providers.is_empty() {
        return Err(AdvisoryError::NoProvidersConfigured);
    }

    let symbol = request.symbol.trim().to_uppercase();
    let timeframe = request.timeframe.unwrap_or(Timeframe::Day);
    let limit = request.limit.unwrap_or(DEFAULT_CANDLE_LIMIT);

    let routed = route_quote(
        &QuoteRequest {
            symbol: symbol.clone(),
            timeframe,
            limit,
        },
        providers,
    )
    .await?;

    let market = MarketData {
        symbol: symbol.clone(),
        timeframe,
        limit,
        source_used: routed.source_used,
        warnings: routed.warnings,
        candles: routed.candles,
        fetched_at: Utc::now(),
    };

    let indicators = compute_indicator_set(&market.candles)?;
    let report = generate_report(
        &symbol,
        timeframe,
        &market.source_used,
        &indicators,
        market.warnings.clone(),
    );

    let analysis_id = Uuid::new_v4();
    info!(
        %analysis_id,
        symbol = %symbol,
        timeframe = timeframe.as_str(),
        source = %market.source_used,
        candles = market.candles.len(),
        "market analysis complete"
    );

    Ok(AnalysisContext {
        analysis_id,
        market,
        indicators,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::ProviderError;
    use crate::models::Candle;
    use async_trait::async_trait;

    struct SeriesProvider {
        closes: Vec<f64>,
    }

    #[async_trait]
    impl DataProvider for SeriesProvider {
        fn name(&self) -> &str {
            "series"
        }

        async fn get_candles(&self, _request: &QuoteRequest) -> Result<Vec<Candle>, ProviderError> {
            Ok(self
                .closes
                .iter()
                .map(|&close| Candle {
                    timestamp: Utc::now(),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 10_000.0,
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn empty_provider_list_is_a_config_error() {
        let err = run_market_analysis(
            AnalysisRequest { symbol: "aapl".into(), ..Default::default() },
            &[],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), "PROVIDERS_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn uppercases_symbol_and_fills_defaults() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.3).collect();
        let providers: Vec<Box<dyn DataProvider>> = vec![Box::new(SeriesProvider { closes })];

        let context = run_market_analysis(
            AnalysisRequest { symbol: " aapl ".into(), ..Default::default() },
            &providers,
        )
        .await
        .unwrap();

        assert_eq!(context.market.symbol, "AAPL");
        assert_eq!(context.market.timeframe, Timeframe::Day);
        assert_eq!(context.market.limit, DEFAULT_CANDLE_LIMIT);
        assert_eq!(context.report.symbol, "AAPL");
        assert!(context.indicators.last_close > 100.0);
    }

    #[tokio::test]
    async fn short_series_surfaces_insufficient_data() {
        let providers: Vec<Box<dyn DataProvider>> =
            vec![Box::new(SeriesProvider { closes: vec![100.0; 5] })];

        let err = run_market_analysis(
            AnalysisRequest { symbol: "MSFT".into(), ..Default::default() },
            &providers,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), "INSUFFICIENT_DATA");
    }
}
