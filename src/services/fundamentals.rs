//! Canonical fundamentals normalization plus the routed fetch with the
//! placeholder fallback.

use std::collections::BTreeMap;

use tracing::warn;

use crate::errors::AdvisoryError;
use crate::external::{route_fundamentals, select_providers, DataProvider, FundamentalsRequest};
use crate::models::{
    Coverage, Envelope, FieldKind, FieldMetadata, FieldMetadataMap, FundamentalsArtifact,
    FundamentalsSection, FundamentalsSnapshot, NormalizedFundamentals, NormalizedUnit,
};
use crate::store::AdvisoryStore;

struct NormalizationRule {
    canonical_field: &'static str,
    source_fields: &'static [&'static str],
    kind: FieldKind,
    normalized_unit: NormalizedUnit,
    percent_like_to_fraction: bool,
}

const fn raw_rule(
    canonical_field: &'static str,
    source_fields: &'static [&'static str],
    kind: FieldKind,
) -> NormalizationRule {
    NormalizationRule {
        canonical_field,
        source_fields,
        kind,
        normalized_unit: NormalizedUnit::Raw,
        percent_like_to_fraction: false,
    }
}

const fn fraction_rule(
    canonical_field: &'static str,
    source_fields: &'static [&'static str],
) -> NormalizationRule {
    NormalizationRule {
        canonical_field,
        source_fields,
        kind: FieldKind::Fraction,
        normalized_unit: NormalizedUnit::Fraction,
        percent_like_to_fraction: true,
    }
}

const VALUATION_RULES: &[NormalizationRule] = &[
    raw_rule("peRatio", &["peRatio", "peTTM", "trailingPE"], FieldKind::Multiple),
    raw_rule("forwardPeRatio", &["forwardPE"], FieldKind::Multiple),
    raw_rule(
        "priceToSales",
        &["priceToSalesRatioTTM", "psTTM", "priceToSalesTrailing12Months"],
        FieldKind::Multiple,
    ),
    raw_rule(
        "priceToBook",
        &["priceToBookRatio", "pbQuarterly", "priceToBook"],
        FieldKind::Multiple,
    ),
    raw_rule("marketCap", &["marketCapitalization", "marketCap"], FieldKind::Currency),
];

const PROFITABILITY_RULES: &[NormalizationRule] = &[
    fraction_rule("grossMargin", &["grossMarginTTM", "grossMargins"]),
    fraction_rule("profitMargin", &["netMargin", "profitMargin", "profitMargins"]),
    fraction_rule("operatingMargin", &["operatingMarginTTM", "operatingMargins"]),
    fraction_rule("returnOnAssets", &["roaTTM", "returnOnAssets", "returnOnAssetsTTM"]),
    fraction_rule("returnOnEquity", &["roeTTM", "returnOnEquity", "returnOnEquityTTM"]),
];

const GROWTH_RULES: &[NormalizationRule] = &[
    fraction_rule(
        "revenueGrowth",
        &["revenueGrowth", "revenueGrowth3Y", "quarterlyRevenueGrowthYOY"],
    ),
    fraction_rule(
        "earningsGrowth",
        &["earningsGrowth", "epsGrowth5Y", "epsGrowthQuarterlyYoy", "quarterlyEarningsGrowthYOY"],
    ),
];

const BALANCE_SHEET_RULES: &[NormalizationRule] = &[
    raw_rule(
        "debtToEquity",
        &["debtToEquity", "totalDebtToEquityAnnual", "totalDebtToEquityQuarterly"],
        FieldKind::Ratio,
    ),
    raw_rule("currentRatio", &["currentRatioQuarterly", "currentRatio"], FieldKind::Ratio),
    raw_rule("bookValuePerShare", &["bookValuePerShareAnnual", "bookValue"], FieldKind::Currency),
    raw_rule("totalDebt", &["totalDebt"], FieldKind::Currency),
    raw_rule("totalCash", &["totalCash"], FieldKind::Currency),
    raw_rule("eps", &["eps", "EPS"], FieldKind::Currency),
];

fn rules_for(section: FundamentalsSection) -> &'static [NormalizationRule] {
    match section {
        FundamentalsSection::Valuation => VALUATION_RULES,
        FundamentalsSection::Profitability => PROFITABILITY_RULES,
        FundamentalsSection::Growth => GROWTH_RULES,
        FundamentalsSection::BalanceSheet => BALANCE_SHEET_RULES,
    }
}

/// Percent-like magnitudes (1 < |v| <= 100) on fraction fields are rescaled
/// to the 0-1 range; anything else passes through.
fn percent_like_to_fraction(value: f64) -> f64 {
    if value.is_finite() && value.abs() > 1.0 && value.abs() <= 100.0 {
        value / 100.0
    } else {
        value
    }
}

/// Map provider-specific field names onto canonical ones. First matching
/// source field wins; sections that yield nothing are omitted entirely.
pub fn normalize_fundamentals(
    snapshot: &FundamentalsSnapshot,
    source_provider: &str,
) -> (NormalizedFundamentals, FieldMetadataMap) {
    let source_provider = source_provider.trim().to_lowercase();
    let mut sections = BTreeMap::new();
    let mut metadata_map: FieldMetadataMap = BTreeMap::new();

    for (&section, record) in &snapshot.sections {
        let mut normalized = BTreeMap::new();
        let mut metadata = BTreeMap::new();

        for rule in rules_for(section) {
            let matched = rule
                .source_fields
                .iter()
                .find_map(|&field| {
                    record
                        .get(field)
                        .copied()
                        .filter(|v| v.is_finite())
                        .map(|value| (field, value))
                });
            let Some((source_field, raw)) = matched else {
                continue;
            };

            let value = if rule.percent_like_to_fraction {
                percent_like_to_fraction(raw)
            } else {
                raw
            };
            normalized.insert(rule.canonical_field.to_string(), value);
            metadata.insert(
                rule.canonical_field.to_string(),
                FieldMetadata {
                    canonical_field: rule.canonical_field.to_string(),
                    source_field: source_field.to_string(),
                    source_provider: source_provider.clone(),
                    kind: rule.kind,
                    normalized_unit: rule.normalized_unit,
                    note: None,
                },
            );
        }

        if !normalized.is_empty() {
            sections.insert(section, normalized);
            metadata_map.insert(section, metadata);
        }
    }

    (
        NormalizedFundamentals {
            symbol: snapshot.symbol.clone(),
            as_of: snapshot.as_of,
            sections,
        },
        metadata_map,
    )
}

/// Fetch, normalize and store fundamentals for a symbol. When every provider
/// fails and `allow_placeholder` is set, a placeholder envelope is stored
/// instead of propagating the error. This is the only place a provider
/// failure is converted into degraded coverage.
pub async fn fetch_fundamentals(
    store: &AdvisoryStore,
    providers: Vec<Box<dyn DataProvider>>,
    symbol: &str,
    requested_sections: Option<Vec<FundamentalsSection>>,
    provider_preference: &[String],
    allow_placeholder: bool,
) -> Result<Envelope<FundamentalsArtifact>, AdvisoryError> {
    let symbol = symbol.trim().to_uppercase();
    let requested_sections =
        requested_sections.unwrap_or_else(|| FundamentalsSection::ALL.to_vec());
    let providers = select_providers(providers, provider_preference);

    let request = FundamentalsRequest {
        symbol: symbol.clone(),
        requested_sections: requested_sections.clone(),
    };

    match route_fundamentals(&request, &providers).await {
        Ok(routed) => {
            let (normalized, field_metadata) =
                normalize_fundamentals(&routed.snapshot, &routed.source_used);
            Ok(store.save_fundamentals(
                FundamentalsArtifact {
                    symbol,
                    snapshot: Some(routed.snapshot),
                    normalized: Some(normalized),
                    field_metadata,
                    source_used: Some(routed.source_used),
                    missing_sections: routed.missing_sections,
                },
                routed.coverage,
                routed.warnings,
            ))
        }
        Err(err) if allow_placeholder => {
            warn!(symbol = %symbol, error = %err, "storing placeholder fundamentals");
            Ok(store.save_fundamentals(
                FundamentalsArtifact {
                    symbol,
                    snapshot: None,
                    normalized: None,
                    field_metadata: BTreeMap::new(),
                    source_used: None,
                    missing_sections: requested_sections,
                },
                Coverage::Placeholder,
                vec![err.to_string()],
            ))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(sections: BTreeMap<FundamentalsSection, BTreeMap<String, f64>>) -> FundamentalsSnapshot {
        FundamentalsSnapshot {
            symbol: "AAPL".into(),
            as_of: Utc::now(),
            sections,
        }
    }

    #[test]
    fn first_matching_source_field_wins() {
        let mut valuation = BTreeMap::new();
        valuation.insert("trailingPE".to_string(), 28.0);
        valuation.insert("peTTM".to_string(), 27.0);
        let mut sections = BTreeMap::new();
        sections.insert(FundamentalsSection::Valuation, valuation);

        let (normalized, metadata) = normalize_fundamentals(&snapshot(sections), "Finnhub");
        let valuation = &normalized.sections[&FundamentalsSection::Valuation];
        assert_eq!(valuation["peRatio"], 27.0);
        let meta = &metadata[&FundamentalsSection::Valuation]["peRatio"];
        assert_eq!(meta.source_field, "peTTM");
        assert_eq!(meta.source_provider, "finnhub");
    }

    #[test]
    fn percent_like_margins_become_fractions() {
        let mut profitability = BTreeMap::new();
        profitability.insert("grossMarginTTM".to_string(), 43.5);
        profitability.insert("profitMargins".to_string(), 0.25);
        let mut sections = BTreeMap::new();
        sections.insert(FundamentalsSection::Profitability, profitability);

        let (normalized, _) = normalize_fundamentals(&snapshot(sections), "finnhub");
        let section = &normalized.sections[&FundamentalsSection::Profitability];
        assert!((section["grossMargin"] - 0.435).abs() < 1e-12);
        assert_eq!(section["profitMargin"], 0.25);
    }

    #[test]
    fn empty_sections_are_omitted() {
        let mut growth = BTreeMap::new();
        growth.insert("unknownField".to_string(), 1.0);
        let mut sections = BTreeMap::new();
        sections.insert(FundamentalsSection::Growth, growth);

        let (normalized, metadata) = normalize_fundamentals(&snapshot(sections), "finnhub");
        assert!(normalized.sections.is_empty());
        assert!(metadata.is_empty());
    }

    #[tokio::test]
    async fn placeholder_fallback_stores_degraded_envelope() {
        let store = AdvisoryStore::new(0);
        let envelope = fetch_fundamentals(&store, vec![], "aapl", None, &[], true)
            .await
            .unwrap();
        assert_eq!(envelope.coverage, Coverage::Placeholder);
        assert!(envelope.payload.snapshot.is_none());
        assert_eq!(envelope.payload.missing_sections.len(), 4);
        assert_eq!(envelope.warnings.len(), 1);
        assert!(store.get_fundamentals(envelope.id).is_some());
    }

    #[tokio::test]
    async fn without_placeholder_errors_propagate() {
        let store = AdvisoryStore::new(0);
        let err = fetch_fundamentals(&store, vec![], "aapl", None, &[], false)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FUNDAMENTALS_PROVIDERS_FAILED");
    }
}
