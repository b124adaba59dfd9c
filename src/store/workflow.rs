use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AdvisoryError;
use crate::models::{AnalysisReport, IndicatorSet, MarketData};
use crate::store::bounded::BoundedCache;

pub const DEFAULT_WORKFLOW_CAPACITY: usize = 50;

/// Per-analysis workflow state: market data first, indicators and report
/// filled in by later steps under the same analysis id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    pub analysis_id: Uuid,
    pub market: MarketData,
    pub indicators: Option<IndicatorSet>,
    pub report: Option<AnalysisReport>,
}

/// Bounded in-memory workflow state store. Cloning shares the underlying
/// cache.
#[derive(Clone)]
pub struct WorkflowStore {
    inner: Arc<Mutex<BoundedCache<Uuid, WorkflowState>>>,
}

impl WorkflowStore {
    /// `capacity` of 0 falls back to the default of 50 entries.
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 { DEFAULT_WORKFLOW_CAPACITY } else { capacity };
        Self {
            inner: Arc::new(Mutex::new(BoundedCache::new(capacity))),
        }
    }

    pub fn create_from_market(&self, market: MarketData) -> WorkflowState {
        let state = WorkflowState {
            analysis_id: Uuid::new_v4(),
            market,
            indicators: None,
            report: None,
        };
        debug!(analysis_id = %state.analysis_id, symbol = %state.market.symbol, "workflow state created");
        self.inner.lock().save(state.analysis_id, state.clone());
        state
    }

    pub fn get(&self, analysis_id: Uuid) -> Option<WorkflowState> {
        self.inner.lock().get(&analysis_id).cloned()
    }

    pub fn get_or_err(&self, analysis_id: Uuid) -> Result<WorkflowState, AdvisoryError> {
        self.get(analysis_id)
            .ok_or(AdvisoryError::WorkflowStateNotFound(analysis_id))
    }

    /// Replaces the stored state under the same analysis id.
    pub fn set_indicators(
        &self,
        analysis_id: Uuid,
        indicators: IndicatorSet,
    ) -> Result<WorkflowState, AdvisoryError> {
        let mut state = self.get_or_err(analysis_id)?;
        state.indicators = Some(indicators);
        self.inner.lock().save(analysis_id, state.clone());
        Ok(state)
    }

    /// Replaces the stored state under the same analysis id.
    pub fn set_report(
        &self,
        analysis_id: Uuid,
        report: AnalysisReport,
    ) -> Result<WorkflowState, AdvisoryError> {
        let mut state = self.get_or_err(analysis_id)?;
        state.report = Some(report);
        self.inner.lock().save(analysis_id, state.clone());
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timeframe;
    use chrono::Utc;

    fn market(symbol: &str) -> MarketData {
        MarketData {
            symbol: symbol.to_string(),
            timeframe: Timeframe::Day,
            limit: 200,
            source_used: "test".into(),
            warnings: vec![],
            candles: vec![],
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_get_round_trip() {
        let store = WorkflowStore::new(0);
        let state = store.create_from_market(market("AAPL"));
        let loaded = store.get(state.analysis_id).unwrap();
        assert_eq!(loaded.market.symbol, "AAPL");
        assert!(loaded.indicators.is_none());
    }

    #[test]
    fn updates_keep_the_analysis_id() {
        let store = WorkflowStore::new(0);
        let state = store.create_from_market(market("MSFT"));

        let report = AnalysisReport {
            symbol: "MSFT".into(),
            timeframe: Timeframe::Day,
            source_used: "test".into(),
            conclusion: "neutral".into(),
            key_evidence: vec![],
            risk_points: vec![],
            watch_levels: vec![],
            confidence: crate::models::ReportConfidence::Medium,
            disclaimer: crate::models::DISCLAIMER.to_string(),
            warnings: vec![],
        };
        let updated = store.set_report(state.analysis_id, report).unwrap();
        assert_eq!(updated.analysis_id, state.analysis_id);
        assert!(updated.report.is_some());
    }

    #[test]
    fn capacity_evicts_oldest_state() {
        let store = WorkflowStore::new(2);
        let first = store.create_from_market(market("A"));
        let second = store.create_from_market(market("B"));
        let third = store.create_from_market(market("C"));

        assert!(store.get(first.analysis_id).is_none());
        assert!(store.get(second.analysis_id).is_some());
        assert!(store.get(third.analysis_id).is_some());
    }

    #[test]
    fn missing_state_maps_to_typed_error() {
        let store = WorkflowStore::new(0);
        let err = store.get_or_err(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.code(), "WORKFLOW_STATE_NOT_FOUND");
    }
}
