use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four fundamentals sections a provider may serve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FundamentalsSection {
    Valuation,
    Profitability,
    Growth,
    BalanceSheet,
}

impl FundamentalsSection {
    pub const ALL: [FundamentalsSection; 4] = [
        FundamentalsSection::Valuation,
        FundamentalsSection::Profitability,
        FundamentalsSection::Growth,
        FundamentalsSection::BalanceSheet,
    ];
}

impl std::fmt::Display for FundamentalsSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FundamentalsSection::Valuation => "valuation",
            FundamentalsSection::Profitability => "profitability",
            FundamentalsSection::Growth => "growth",
            FundamentalsSection::BalanceSheet => "balance-sheet",
        };
        f.write_str(label)
    }
}

/// Raw provider fundamentals: flat field -> number maps keyed by the
/// provider's own field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalsSnapshot {
    pub symbol: String,
    pub as_of: DateTime<Utc>,
    pub sections: BTreeMap<FundamentalsSection, BTreeMap<String, f64>>,
}

/// Shape of a fundamentals field before normalization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Fraction,
    Ratio,
    Multiple,
    Currency,
    Count,
    Unknown,
}

/// Unit the normalized value is expressed in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NormalizedUnit {
    Fraction,
    Raw,
}

/// Provenance and unit metadata for one normalized field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub canonical_field: String,
    pub source_field: String,
    pub source_provider: String,
    pub kind: FieldKind,
    pub normalized_unit: NormalizedUnit,
    pub note: Option<String>,
}

pub type FieldMetadataMap = BTreeMap<FundamentalsSection, BTreeMap<String, FieldMetadata>>;

/// Fundamentals with heterogeneous provider field names mapped onto
/// canonical names, percent-like fraction fields rescaled to 0-1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedFundamentals {
    pub symbol: String,
    pub as_of: DateTime<Utc>,
    pub sections: BTreeMap<FundamentalsSection, BTreeMap<String, f64>>,
}

/// Stored fundamentals artifact. A placeholder artifact (all providers
/// failed, caller opted into the fallback) has no snapshot, no source and
/// every requested section listed as missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalsArtifact {
    pub symbol: String,
    pub snapshot: Option<FundamentalsSnapshot>,
    pub normalized: Option<NormalizedFundamentals>,
    pub field_metadata: FieldMetadataMap,
    pub source_used: Option<String>,
    pub missing_sections: Vec<FundamentalsSection>,
}
