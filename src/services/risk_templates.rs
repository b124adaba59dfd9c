//! Versioned risk threshold templates keyed by risk tier.

use std::collections::BTreeMap;

use crate::models::{RiskThresholdTemplate, RiskThresholds, RiskTolerance};

pub const DEFAULT_TEMPLATE_ID: &str = "default-core";
pub const DEFAULT_TEMPLATE_VERSION: &str = "2026-02-23";

/// Built-in baseline thresholds for conservative/moderate/aggressive
/// monitoring.
pub fn default_template() -> RiskThresholdTemplate {
    let mut tiers = BTreeMap::new();
    tiers.insert(
        RiskTolerance::Conservative,
        RiskThresholds {
            max_single_position_pct: 12.0,
            max_sector_pct: 25.0,
            max_volatility_annualized: 0.28,
            max_drawdown_pct: 15.0,
            min_cash_pct: 8.0,
            max_cash_pct: 30.0,
            max_stress_loss_pct: 12.0,
        },
    );
    tiers.insert(
        RiskTolerance::Moderate,
        RiskThresholds {
            max_single_position_pct: 18.0,
            max_sector_pct: 35.0,
            max_volatility_annualized: 0.45,
            max_drawdown_pct: 22.0,
            min_cash_pct: 4.0,
            max_cash_pct: 20.0,
            max_stress_loss_pct: 20.0,
        },
    );
    tiers.insert(
        RiskTolerance::Aggressive,
        RiskThresholds {
            max_single_position_pct: 25.0,
            max_sector_pct: 45.0,
            max_volatility_annualized: 0.65,
            max_drawdown_pct: 32.0,
            min_cash_pct: 2.0,
            max_cash_pct: 15.0,
            max_stress_loss_pct: 30.0,
        },
    );

    RiskThresholdTemplate {
        template_id: DEFAULT_TEMPLATE_ID.to_string(),
        version: DEFAULT_TEMPLATE_VERSION.to_string(),
        tiers,
        notes: Some(
            "Built-in baseline thresholds for conservative/moderate/aggressive monitoring."
                .to_string(),
        ),
    }
}

fn sanitize(input: RiskThresholds) -> RiskThresholds {
    let min_cash = input.min_cash_pct.clamp(0.0, 100.0);
    let max_cash = input.max_cash_pct.min(100.0).max(min_cash);

    RiskThresholds {
        max_single_position_pct: input.max_single_position_pct.clamp(0.0, 100.0),
        max_sector_pct: input.max_sector_pct.clamp(0.0, 100.0),
        max_volatility_annualized: input.max_volatility_annualized.max(0.0),
        max_drawdown_pct: input.max_drawdown_pct.clamp(0.0, 100.0),
        min_cash_pct: min_cash,
        max_cash_pct: max_cash,
        max_stress_loss_pct: input.max_stress_loss_pct.clamp(0.0, 100.0),
    }
}

fn tier_thresholds(template: &RiskThresholdTemplate, tier: RiskTolerance) -> RiskThresholds {
    template
        .tiers
        .get(&tier)
        .copied()
        .unwrap_or_else(|| default_template().tiers[&tier])
}

/// Full-replacement template resolution: a supplied template is used as-is
/// with blank id/version falling back to the default's, and every tier
/// sanitized into range.
pub fn resolve_template(template: Option<RiskThresholdTemplate>) -> RiskThresholdTemplate {
    let Some(template) = template else {
        return default_template();
    };

    let template_id = template.template_id.trim();
    let version = template.version.trim();
    let mut tiers = BTreeMap::new();
    for tier in [RiskTolerance::Conservative, RiskTolerance::Moderate, RiskTolerance::Aggressive] {
        tiers.insert(tier, sanitize(tier_thresholds(&template, tier)));
    }

    RiskThresholdTemplate {
        template_id: if template_id.is_empty() {
            DEFAULT_TEMPLATE_ID.to_string()
        } else {
            template_id.to_string()
        },
        version: if version.is_empty() {
            DEFAULT_TEMPLATE_VERSION.to_string()
        } else {
            version.to_string()
        },
        tiers,
        notes: template.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
    }
}

/// Resolve the effective thresholds for a tier, with an optional
/// single-position ceiling override applied before sanitization.
pub fn resolve_thresholds(
    tier: RiskTolerance,
    template: Option<RiskThresholdTemplate>,
    single_position_max_override: Option<f64>,
) -> (RiskThresholdTemplate, RiskThresholds) {
    let template = resolve_template(template);
    let mut thresholds = tier_thresholds(&template, tier);
    if let Some(single_position_max) = single_position_max_override {
        thresholds.max_single_position_pct = single_position_max;
    }
    (template, sanitize(thresholds))
}
