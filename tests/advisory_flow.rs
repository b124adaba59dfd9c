//! End-to-end advisory workflow: market analysis, client state
//! normalization, monitoring engines and the cross-artifact summary, all
//! persisted through the bounded artifact store.

use async_trait::async_trait;
use chrono::{Duration, Utc};

use advisory_core::external::{DataProvider, ProviderError, QuoteRequest};
use advisory_core::models::{
    AccountType, ArtifactRef, AuditRequest, Candle, ClientGoals, Coverage, FinancialGoal,
    InvestmentHorizon, InvestmentObjective, InvestorProfile, LiquidityNeeds, PortfolioAccount,
    PortfolioPosition, PortfolioSnapshot, RiskSeverity, RiskTolerance, SummaryPart, TaxLot,
};
use advisory_core::services::{
    build_advisory_summary, build_decision_log, build_drift_report,
    build_investment_policy_statement, build_portfolio_review, build_position_strategy,
    build_rebalance_plan, build_review_packet, build_risk_monitor, build_stress_test,
    build_suitability_assessment, normalize_goals, normalize_portfolio, normalize_profile,
    resolve_portfolio, resolve_profile, run_market_analysis, AnalysisRequest, DecisionLogInput,
    PositionStrategyInput, RebalanceInput, ReviewPacketInput, RiskMonitorInput, SummaryInput,
};
use advisory_core::store::AdvisoryStore;

struct TrendingProvider;

#[async_trait]
impl DataProvider for TrendingProvider {
    fn name(&self) -> &str {
        "trending"
    }

    async fn get_candles(&self, request: &QuoteRequest) -> Result<Vec<Candle>, ProviderError> {
        let start = Utc::now() - Duration::days(request.limit as i64);
        Ok((0..request.limit.min(120))
            .map(|i| {
                let close = 100.0 + i as f64 * 0.4;
                Candle {
                    timestamp: start + Duration::days(i as i64),
                    open: close - 0.2,
                    high: close + 0.5,
                    low: close - 0.5,
                    close,
                    volume: 50_000.0,
                }
            })
            .collect())
    }
}

fn sample_profile() -> InvestorProfile {
    normalize_profile(InvestorProfile {
        client_label: Some("  Jordan Park  ".into()),
        risk_tolerance: RiskTolerance::Moderate,
        investment_horizon: InvestmentHorizon::Long,
        objectives: vec![InvestmentObjective::Growth, InvestmentObjective::Growth],
        liquidity_needs: LiquidityNeeds::Medium,
        max_drawdown_tolerance_pct: Some(25.0),
        account_types: Some(vec![AccountType::Taxable]),
        restrictions: None,
        tax_profile: None,
        notes: None,
    })
}

fn sample_portfolio() -> PortfolioSnapshot {
    normalize_portfolio(PortfolioSnapshot {
        as_of: Utc::now(),
        base_currency: "usd".into(),
        accounts: vec![PortfolioAccount {
            account_id: "brokerage-1".into(),
            account_type: AccountType::Taxable,
            cash_balance: 8_000.0,
            fees: None,
            restrictions: None,
            positions: vec![
                PortfolioPosition {
                    symbol: "aapl".into(),
                    quantity: 100.0,
                    last_price: Some(280.0),
                    market_value: 28_000.0,
                    avg_cost: Some(180.0),
                    sector: Some("Technology".into()),
                    target_weight: None,
                    max_weight: None,
                    tax_lots: Some(vec![TaxLot {
                        lot_id: "lot-1".into(),
                        quantity: 100.0,
                        cost_basis_per_share: 180.0,
                        acquired_at: Utc::now() - Duration::days(120),
                    }]),
                },
                PortfolioPosition {
                    symbol: "jnj".into(),
                    quantity: 200.0,
                    last_price: Some(160.0),
                    market_value: 32_000.0,
                    avg_cost: Some(150.0),
                    sector: Some("Healthcare".into()),
                    target_weight: None,
                    max_weight: None,
                    tax_lots: None,
                },
                PortfolioPosition {
                    symbol: "xom".into(),
                    quantity: 300.0,
                    last_price: Some(110.0),
                    market_value: 33_000.0,
                    avg_cost: Some(90.0),
                    sector: Some("Energy".into()),
                    target_weight: None,
                    max_weight: None,
                    tax_lots: None,
                },
            ],
        }],
    })
}

fn sample_goals() -> ClientGoals {
    normalize_goals(ClientGoals {
        planning_horizon_years: Some(15.0),
        target_return_range_pct: None,
        max_loss_tolerance_pct: None,
        liquidity_buffer_pct: None,
        goals: vec![FinancialGoal {
            goal_id: None,
            label: "Retirement income".into(),
            target_amount: Some(1_500_000.0),
            target_date: Some(Utc::now() + Duration::days(15 * 365)),
            priority: None,
            notes: None,
        }],
        cash_flow_plan: None,
        restrictions: None,
        notes: None,
    })
    .value
}

#[tokio::test]
async fn full_advisory_workflow_produces_consistent_summary() {
    let store = AdvisoryStore::new(0);
    let providers: Vec<Box<dyn DataProvider>> = vec![Box::new(TrendingProvider)];

    let analysis = run_market_analysis(
        AnalysisRequest { symbol: " aapl ".into(), ..Default::default() },
        &providers,
    )
    .await
    .unwrap();
    assert_eq!(analysis.market.symbol, "AAPL");
    assert_eq!(analysis.market.source_used, "trending");

    let profile = sample_profile();
    assert_eq!(profile.client_label.as_deref(), Some("Jordan Park"));
    assert_eq!(profile.objectives.len(), 1);
    let portfolio = sample_portfolio();
    assert_eq!(portfolio.base_currency, "USD");
    assert!(portfolio.accounts[0].positions.iter().all(|p| p.symbol.chars().all(char::is_uppercase)));
    let goals = sample_goals();

    let profile_envelope = store.save_profile(profile.clone(), Coverage::Full, vec![]);
    let portfolio_envelope = store.save_portfolio(portfolio.clone(), Coverage::Full, vec![]);

    // Engines can resolve inputs back out of the store by id.
    let resolved = resolve_profile(&store, ArtifactRef::ById(profile_envelope.id)).unwrap();
    assert_eq!(resolved.risk_tolerance, RiskTolerance::Moderate);
    let portfolio = resolve_portfolio(&store, ArtifactRef::ById(portfolio_envelope.id)).unwrap();

    let ips = build_investment_policy_statement(&profile, &goals, Some(&portfolio));
    let ips_envelope = store.save_ips(ips.value.clone(), ips.coverage, ips.warnings.clone());

    let review = build_portfolio_review(&portfolio, Some(&profile), None);
    // AAPL short-term tax lot in a taxable account
    assert!(!review.value.tax_warnings.is_empty());
    let review_envelope =
        store.save_portfolio_review(review.value.clone(), review.coverage, review.warnings.clone());

    let stress = build_stress_test(&portfolio, None);
    assert_eq!(stress.value.scenario_results.len(), 5);
    let stress_envelope =
        store.save_stress_test(stress.value.clone(), stress.coverage, stress.warnings.clone());

    let drift = build_drift_report(&portfolio, None, Some(&ips_envelope.payload));
    let risk_monitor = build_risk_monitor(
        profile.risk_tolerance,
        &portfolio,
        RiskMonitorInput {
            analysis: Some(&analysis),
            stress_test: Some(&stress_envelope.payload),
            ..Default::default()
        },
    );
    // Moderate single-position limit is 18%; every holding here exceeds it.
    assert!(risk_monitor
        .value
        .flags
        .iter()
        .any(|flag| flag.code == "SINGLE_POSITION_LIMIT"));
    assert!(risk_monitor.value.overall_severity >= RiskSeverity::Warning);

    let rebalance = build_rebalance_plan(
        &portfolio,
        RebalanceInput {
            profile: Some(&profile),
            portfolio_review: Some(&review_envelope.payload),
            stress_test: Some(&stress_envelope.payload),
            ..Default::default()
        },
    );
    assert_eq!(rebalance.coverage, Coverage::Full);
    assert!(!rebalance.value.trade_priority_queue.is_empty());

    let assessment =
        build_suitability_assessment(&analysis, &profile, None, None);
    assert_eq!(assessment.coverage, Coverage::Partial);
    let assessment_envelope = store.save_assessment(
        assessment.value.clone(),
        assessment.coverage,
        assessment.warnings.clone(),
    );

    let plan = build_position_strategy(
        &analysis,
        &profile,
        PositionStrategyInput {
            assessment: Some(&assessment_envelope),
            ..Default::default()
        },
    );
    assert!(plan.value.max_position_pct <= 15.0);

    let decision_log = build_decision_log(DecisionLogInput {
        decision_summary: "Trim concentrated positions toward policy ranges".into(),
        recommendation: "Stage trims over two review cycles".into(),
        evidence: risk_monitor
            .value
            .flags
            .iter()
            .map(|flag| flag.message.clone())
            .collect(),
        constraints: None,
        related_artifact_ids: Some(vec![portfolio_envelope.id.to_string()]),
    });
    let decision_log_envelope = store.save_decision_log(
        decision_log.value.clone(),
        decision_log.coverage,
        decision_log.warnings.clone(),
    );

    let packet = build_review_packet(ReviewPacketInput {
        client_label: profile.client_label.as_deref(),
        goals: Some(&goals),
        portfolio_review: Some(&review_envelope.payload),
        stress_test: Some(&stress_envelope.payload),
        rebalance_plan: Some(&rebalance.value),
        drift_report: Some(&drift.value),
        risk_monitor: Some(&risk_monitor.value),
    });
    assert!(packet.value.headline.starts_with("Jordan Park review packet:"));

    let summary = build_advisory_summary(SummaryInput {
        profile: Some(SummaryPart::Enveloped(profile_envelope)),
        goals: Some(SummaryPart::Value(goals)),
        ips: Some(SummaryPart::Enveloped(ips_envelope.clone())),
        portfolio_review: Some(SummaryPart::Enveloped(review_envelope)),
        stress_test: Some(SummaryPart::Enveloped(stress_envelope)),
        rebalance_plan: Some(SummaryPart::Value(rebalance.value)),
        drift_report: Some(SummaryPart::Value(drift.value)),
        risk_monitor: Some(SummaryPart::Value(risk_monitor.value)),
        review_packet: Some(SummaryPart::Value(packet.value)),
        decision_log: Some(SummaryPart::Enveloped(decision_log_envelope.clone())),
        audit: Some(AuditRequest {
            run_id: None,
            workflow: Some("quarterly-review".into()),
            artifact_ids: vec![ips_envelope.id.to_string(), ips_envelope.id.to_string()],
        }),
    });

    assert_eq!(summary.client.client_label.as_deref(), Some("Jordan Park"));
    assert_eq!(summary.client.risk_tier, Some(RiskTolerance::Moderate));
    assert!(summary.policy.is_some());
    assert_eq!(summary.compliance.decision_log_id, Some(decision_log_envelope.id));
    assert_eq!(
        summary.monitoring.worst_stress_scenario.as_deref(),
        Some("market_down_20")
    );
    assert!(!summary.actions.priority_actions.is_empty());

    let audit = summary.audit.as_ref().unwrap();
    assert_eq!(audit.workflow, "quarterly-review");
    assert_eq!(audit.artifact_ids.len(), 1);

    let summary_envelope =
        store.save_summary(summary.clone(), summary.coverage, summary.warnings.clone());
    let loaded = store.get_summary_or_err(summary_envelope.id).unwrap();
    assert_eq!(loaded.payload.monitoring.risk_flag_count, summary.monitoring.risk_flag_count);
}

#[tokio::test]
async fn summary_coverage_degrades_with_partial_inputs() {
    let store = AdvisoryStore::new(0);
    let profile = sample_profile();
    let goals = sample_goals();

    // No portfolio cash check, no target return range: IPS is partial.
    let ips = build_investment_policy_statement(&profile, &goals, None);
    assert_eq!(ips.coverage, Coverage::Partial);
    let ips_envelope = store.save_ips(ips.value, ips.coverage, ips.warnings);

    let summary = build_advisory_summary(SummaryInput {
        profile: Some(SummaryPart::Value(profile)),
        ips: Some(SummaryPart::Enveloped(ips_envelope)),
        ..Default::default()
    });
    assert_eq!(summary.coverage, Coverage::Partial);
    assert!(summary
        .warnings
        .iter()
        .any(|w| w.contains("risk-tier defaults")));
}
