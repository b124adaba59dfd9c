use serde::{Deserialize, Serialize};

/// Portfolio health review: findings per category plus a prioritized
/// action list in fixed category order (concentration, diversification,
/// liquidity, restrictions, tax).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioReview {
    pub summary: String,
    pub concentration_findings: Vec<String>,
    pub diversification_findings: Vec<String>,
    pub liquidity_findings: Vec<String>,
    pub restriction_violations: Vec<String>,
    pub tax_warnings: Vec<String>,
    pub priority_actions: Vec<String>,
}
