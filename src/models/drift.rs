use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DriftKind {
    Position,
    Cash,
}

/// Severity by absolute drift magnitude: >= 7 points high, >= 3 medium,
/// else low.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DriftSeverity {
    Low,
    Medium,
    High,
}

impl DriftSeverity {
    pub fn from_drift(abs_drift_pct: f64) -> DriftSeverity {
        if abs_drift_pct >= 7.0 {
            DriftSeverity::High
        } else if abs_drift_pct >= 3.0 {
            DriftSeverity::Medium
        } else {
            DriftSeverity::Low
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DriftAction {
    Trim,
    Add,
    AdjustCash,
}

impl std::fmt::Display for DriftAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DriftAction::Trim => "trim",
            DriftAction::Add => "add",
            DriftAction::AdjustCash => "adjust-cash",
        };
        f.write_str(label)
    }
}

/// A weight strictly outside its target range. `drift_pct` is the distance
/// past the violated bound, always positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftBreach {
    pub kind: DriftKind,
    pub symbol: Option<String>,
    pub current_weight_pct: f64,
    pub target_min_pct: f64,
    pub target_max_pct: f64,
    pub drift_pct: f64,
    pub severity: DriftSeverity,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftPriorityItem {
    pub kind: DriftKind,
    pub symbol: Option<String>,
    pub severity: DriftSeverity,
    pub action: DriftAction,
    pub estimated_drift_pct: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    pub summary: String,
    pub breaches: Vec<DriftBreach>,
    /// Sorted by descending drift magnitude.
    pub priority_queue: Vec<DriftPriorityItem>,
    pub coverage_notes: Vec<String>,
}
