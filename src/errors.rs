use crate::models::ArtifactKind;
use thiserror::Error;
use uuid::Uuid;

/// Crate-wide error type. Every variant carries a stable machine-readable
/// code via [`AdvisoryError::code`] so callers can branch without parsing
/// messages.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("no data providers configured")]
    NoProvidersConfigured,

    /// Every quote provider failed; the message aggregates each provider's
    /// failure reason in routing order.
    #[error("all quote providers failed ({0})")]
    ProvidersFailed(String),

    #[error("all fundamentals providers failed ({0})")]
    FundamentalsProvidersFailed(String),

    /// Too few candles, or an indicator computed to a non-finite value.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("{kind} not found: {id}")]
    ArtifactNotFound { kind: ArtifactKind, id: Uuid },

    #[error("workflow state not found: {0}")]
    WorkflowStateNotFound(Uuid),

    #[error("invalid advisory input: {0}")]
    InvalidInput(String),
}

impl AdvisoryError {
    pub fn code(&self) -> &'static str {
        match self {
            AdvisoryError::NoProvidersConfigured => "PROVIDERS_NOT_CONFIGURED",
            AdvisoryError::ProvidersFailed(_) => "PROVIDERS_FAILED",
            AdvisoryError::FundamentalsProvidersFailed(_) => "FUNDAMENTALS_PROVIDERS_FAILED",
            AdvisoryError::InsufficientData(_) => "INSUFFICIENT_DATA",
            AdvisoryError::ArtifactNotFound { kind, .. } => kind.not_found_code(),
            AdvisoryError::WorkflowStateNotFound(_) => "WORKFLOW_STATE_NOT_FOUND",
            AdvisoryError::InvalidInput(_) => "INVALID_ADVISORY_INPUT",
        }
    }
}
