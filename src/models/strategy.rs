use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::InvestorProfile;

/// Fit verdict: two or more misalignments is a poor fit, one misalignment
/// or two-plus assumptions is conditional, otherwise good.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FitLevel {
    GoodFit,
    ConditionalFit,
    PoorFit,
}

impl std::fmt::Display for FitLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FitLevel::GoodFit => "good-fit",
            FitLevel::ConditionalFit => "conditional-fit",
            FitLevel::PoorFit => "poor-fit",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuitabilitySummary {
    pub fit: FitLevel,
    pub fit_reasons: Vec<String>,
    pub misalignments: Vec<String>,
    pub assumptions: Vec<String>,
}

/// Symbol suitability relative to one investor profile and one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuitabilityAssessment {
    pub symbol: String,
    pub analysis_id: Uuid,
    pub profile: InvestorProfile,
    pub fundamentals_id: Option<Uuid>,
    pub summary: SuitabilitySummary,
}

/// Sizing and entry/exit framing for one symbol under a risk budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionStrategyPlan {
    pub symbol: String,
    pub analysis_id: Uuid,
    pub fit: FitLevel,
    pub min_position_pct: f64,
    pub max_position_pct: f64,
    pub entry_conditions: Vec<String>,
    pub exit_conditions: Vec<String>,
    pub tax_notes: Vec<String>,
    pub constraint_notes: Vec<String>,
    pub rationale: Vec<String>,
}
