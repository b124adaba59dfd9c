use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Candle, FundamentalsSection, FundamentalsSnapshot, Timeframe};

#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct FundamentalsRequest {
    pub symbol: String,
    pub requested_sections: Vec<FundamentalsSection>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("fundamentals not supported")]
    Unsupported,
}

/// A market data source. Candle quotes are mandatory; fundamentals are an
/// optional capability the router probes before calling.
#[async_trait]
pub trait DataProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn get_candles(&self, request: &QuoteRequest) -> Result<Vec<Candle>, ProviderError>;

    fn supports_fundamentals(&self) -> bool {
        false
    }

    async fn get_fundamentals(
        &self,
        _request: &FundamentalsRequest,
    ) -> Result<FundamentalsSnapshot, ProviderError> {
        Err(ProviderError::Unsupported)
    }
}
