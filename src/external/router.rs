use tracing::{info, warn};

use crate::errors::AdvisoryError;
use crate::external::provider::{DataProvider, FundamentalsRequest, ProviderError, QuoteRequest};
use crate::models::{Candle, Coverage, FundamentalsSection, FundamentalsSnapshot};

#[derive(Debug, Clone)]
pub struct RoutedQuote {
    pub candles: Vec<Candle>,
    pub source_used: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RoutedFundamentals {
    pub snapshot: FundamentalsSnapshot,
    pub source_used: String,
    pub warnings: Vec<String>,
    pub missing_sections: Vec<FundamentalsSection>,
    pub coverage: Coverage,
}

/// Try each provider in configured order; the first non-empty candle set
/// wins. Every prior failure or empty result becomes a warning naming the
/// provider. No retries, no racing.
pub async fn route_quote(
    request: &QuoteRequest,
    providers: &[Box<dyn DataProvider>],
) -> Result<RoutedQuote, AdvisoryError> {
    let mut warnings: Vec<String> = Vec::new();

    for provider in providers {
        match provider.get_candles(request).await {
            Ok(candles) if candles.is_empty() => {
                warn!(provider = provider.name(), symbol = %request.symbol, "empty candle set");
                warnings.push(format!("{} returned empty candle set", provider.name()));
            }
            Ok(candles) => {
                info!(
                    provider = provider.name(),
                    symbol = %request.symbol,
                    candles = candles.len(),
                    "quote routed"
                );
                return Ok(RoutedQuote {
                    candles,
                    source_used: provider.name().to_string(),
                    warnings,
                });
            }
            Err(err) => {
                warn!(provider = provider.name(), symbol = %request.symbol, error = %err, "quote provider failed");
                warnings.push(format!("{} failed: {}", provider.name(), err));
            }
        }
    }

    Err(AdvisoryError::ProvidersFailed(format!(
        "All quote providers failed ({})",
        warnings.join("; ")
    )))
}

/// Same fan-out for fundamentals. Providers without the capability are
/// skipped with a warning. Coverage is full only when every requested
/// section came back.
pub async fn route_fundamentals(
    request: &FundamentalsRequest,
    providers: &[Box<dyn DataProvider>],
) -> Result<RoutedFundamentals, AdvisoryError> {
    let mut warnings: Vec<String> = Vec::new();

    for provider in providers {
        if !provider.supports_fundamentals() {
            warnings.push(format!("{} fundamentals not supported", provider.name()));
            continue;
        }

        match provider.get_fundamentals(request).await {
            Ok(snapshot) => {
                let missing_sections: Vec<FundamentalsSection> = request
                    .requested_sections
                    .iter()
                    .copied()
                    .filter(|section| !snapshot.sections.contains_key(section))
                    .collect();
                let coverage = if missing_sections.is_empty() {
                    Coverage::Full
                } else {
                    Coverage::Partial
                };
                info!(
                    provider = provider.name(),
                    symbol = %request.symbol,
                    missing = missing_sections.len(),
                    "fundamentals routed"
                );
                return Ok(RoutedFundamentals {
                    snapshot,
                    source_used: provider.name().to_string(),
                    warnings,
                    missing_sections,
                    coverage,
                });
            }
            Err(ProviderError::Unsupported) => {
                warnings.push(format!("{} fundamentals not supported", provider.name()));
            }
            Err(err) => {
                warn!(provider = provider.name(), symbol = %request.symbol, error = %err, "fundamentals provider failed");
                warnings.push(format!("{} fundamentals failed: {}", provider.name(), err));
            }
        }
    }

    Err(AdvisoryError::FundamentalsProvidersFailed(format!(
        "All fundamentals providers failed ({})",
        warnings.join("; ")
    )))
}

/// Reorder providers so those named in `preference` come first (matched
/// case-insensitively, duplicates in the preference ignored); the rest keep
/// their configured order.
pub fn select_providers(
    providers: Vec<Box<dyn DataProvider>>,
    preference: &[String],
) -> Vec<Box<dyn DataProvider>> {
    if preference.is_empty() {
        return providers;
    }

    let mut remaining: Vec<Option<Box<dyn DataProvider>>> =
        providers.into_iter().map(Some).collect();
    let mut selected: Vec<Box<dyn DataProvider>> = Vec::with_capacity(remaining.len());

    for preferred in preference {
        for slot in remaining.iter_mut() {
            let matches = slot
                .as_ref()
                .is_some_and(|provider| provider.name().eq_ignore_ascii_case(preferred));
            if matches {
                if let Some(provider) = slot.take() {
                    selected.push(provider);
                }
                break;
            }
        }
    }

    selected.extend(remaining.into_iter().flatten());
    selected
}
