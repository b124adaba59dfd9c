//! Resolve inline-or-by-id engine inputs against the artifact store.

use uuid::Uuid;

use crate::errors::AdvisoryError;
use crate::models::{
    ArtifactRef, Envelope, FundamentalsArtifact, InvestorProfile, PortfolioSnapshot,
};
use crate::store::AdvisoryStore;

pub fn resolve_profile(
    store: &AdvisoryStore,
    input: ArtifactRef<InvestorProfile>,
) -> Result<InvestorProfile, AdvisoryError> {
    match input {
        ArtifactRef::Inline(profile) => Ok(profile),
        ArtifactRef::ById(id) => Ok(store.get_profile_or_err(id)?.payload),
    }
}

pub fn resolve_portfolio(
    store: &AdvisoryStore,
    input: ArtifactRef<PortfolioSnapshot>,
) -> Result<PortfolioSnapshot, AdvisoryError> {
    match input {
        ArtifactRef::Inline(portfolio) => Ok(portfolio),
        ArtifactRef::ById(id) => Ok(store.get_portfolio_or_err(id)?.payload),
    }
}

/// Fundamentals are optional for the engines that consume them; a missing
/// id is still an error, absence is not.
pub fn resolve_fundamentals(
    store: &AdvisoryStore,
    id: Option<Uuid>,
) -> Result<Option<Envelope<FundamentalsArtifact>>, AdvisoryError> {
    match id {
        Some(id) => Ok(Some(store.get_fundamentals_or_err(id)?)),
        None => Ok(None),
    }
}
