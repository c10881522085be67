// ═══════════════════════════════════════════════════════════════════
// Service Tests: classifier, normalizer, currency, metrics, insights, prompts
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use foliolens_core::errors::CoreError;
use foliolens_core::models::analytics::RiskLevel;
use foliolens_core::models::classification::{Classification, FundCategory, Sector};
use foliolens_core::models::fx::{FxRate, RateSource};
use foliolens_core::models::holding::{Holding, InstrumentKind};
use foliolens_core::models::insight::{Impact, InsightKind, MetricValue};
use foliolens_core::models::raw::{BrokerEquityRecord, BrokerFundRecord, ForeignRow, RawRecord};
use foliolens_core::models::settings::Thresholds;
use foliolens_core::models::snapshot::Snapshot;
use foliolens_core::providers::traits::RateProvider;
use foliolens_core::services::classifier_service::{Classifier, SectorTable};
use foliolens_core::services::currency_service::CurrencyService;
use foliolens_core::services::insight_service::{format_amount, InsightService};
use foliolens_core::services::metrics_service::{self, MetricsService};
use foliolens_core::services::normalizer_service::NormalizerService;
use foliolens_core::services::prompt_service::{allocation_bar, PromptService};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn stock(symbol: &str, qty: f64, avg: f64, last: f64, pnl: f64, sector: Sector) -> Holding {
    Holding {
        symbol: symbol.into(),
        quantity: qty,
        average_price: avg,
        last_price: last,
        pnl,
        day_change: 0.0,
        day_change_pct: None,
        classification: Classification::Sector(sector),
        kind: InstrumentKind::Equity,
        source_currency: "INR".into(),
        exchange: Some("NSE".into()),
    }
}

fn fund(name: &str, qty: f64, avg: f64, last: f64, category: FundCategory) -> Holding {
    Holding {
        symbol: name.into(),
        quantity: qty,
        average_price: avg,
        last_price: last,
        pnl: (last - avg) * qty,
        day_change: 0.0,
        day_change_pct: None,
        classification: Classification::Fund(category),
        kind: InstrumentKind::Fund,
        source_currency: "INR".into(),
        exchange: None,
    }
}

/// A: 10 @ 100 → 200 (P&L 1000), B: 10 @ 100 → 100 (P&L 0), both IT.
fn two_holdings() -> Vec<Holding> {
    vec![
        stock("A", 10.0, 100.0, 200.0, 1000.0, Sector::It),
        stock("B", 10.0, 100.0, 100.0, 0.0, Sector::It),
    ]
}

fn insight_ids(holdings: &[Holding]) -> Vec<String> {
    let metrics = MetricsService::default().compute(holdings, "INR");
    InsightService::default()
        .generate(&metrics)
        .into_iter()
        .map(|i| i.id)
        .collect()
}

fn snapshot(holdings: Vec<Holding>) -> Snapshot {
    let metrics = MetricsService::default().compute(&holdings, "INR");
    let insights = InsightService::default().generate(&metrics);
    Snapshot {
        generated_at: Utc::now(),
        fx: FxRate::fallback("USD", "INR", 87.5),
        holdings,
        metrics,
        insights,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ═══════════════════════════════════════════════════════════════════
// Classifier
// ═══════════════════════════════════════════════════════════════════

mod classifier {
    use super::*;

    #[test]
    fn known_symbols() {
        let c = Classifier::default();
        assert_eq!(c.classify_equity("TCS"), Sector::It);
        assert_eq!(c.classify_equity("HDFCBANK"), Sector::Banking);
        assert_eq!(c.classify_equity("SUNPHARMA"), Sector::Pharma);
        assert_eq!(c.classify_equity("RELIANCE"), Sector::Energy);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let c = Classifier::default();
        assert_eq!(c.classify_equity(" infy "), Sector::It);
    }

    #[test]
    fn aliases_resolve() {
        let c = Classifier::default();
        assert_eq!(c.classify_equity("M&M"), Sector::Auto);
        assert_eq!(c.classify_equity("BAJAJ-AUTO"), Sector::Auto);
    }

    #[test]
    fn unknown_symbols_are_others() {
        let c = Classifier::default();
        assert_eq!(c.classify_equity("NOSUCHCO"), Sector::Others);
        assert_eq!(c.classify_equity(""), Sector::Others);
        assert_eq!(c.classify_equity("   "), Sector::Others);
    }

    #[test]
    fn fund_keyword_precedence() {
        let c = Classifier::default();
        // Index terms win over cap-size words
        assert_eq!(c.classify_fund("XYZ Nifty Smallcap 250 Index Fund"), FundCategory::Index);
        assert_eq!(c.classify_fund("ABC Flexicap Fund – Regular Growth"), FundCategory::FlexiCap);
        assert_eq!(c.classify_fund("XYZ Liquid Fund"), FundCategory::Liquid);
        assert_eq!(c.classify_fund("Some Tax Saver Fund"), FundCategory::Elss);
        assert_eq!(c.classify_fund("Parag Parikh Flexi Cap Fund"), FundCategory::FlexiCap);
        assert_eq!(c.classify_fund("Motilal Oswal Nasdaq 100 FOF"), FundCategory::International);
    }

    #[test]
    fn large_and_mid_without_cap_word() {
        let c = Classifier::default();
        assert_eq!(c.classify_fund("Mirae Asset Large & Midcap Fund"), FundCategory::MidCap);
        assert_eq!(c.classify_fund("Canara Large and Mid Fund"), FundCategory::LargeCap);
    }

    #[test]
    fn unmatched_fund_is_other() {
        let c = Classifier::default();
        assert_eq!(c.classify_fund("Mystery Scheme"), FundCategory::OtherMf);
        assert_eq!(c.classify_fund(""), FundCategory::OtherMf);
    }

    #[test]
    fn fund_isin_on_equity_feed() {
        let c = Classifier::default();
        assert_eq!(
            c.classify_listed("INF209K01YN0"),
            Classification::Fund(FundCategory::OtherMf)
        );
        assert_eq!(c.classify_listed("INFY"), Classification::Sector(Sector::It));
        assert!(Classifier::is_fund_isin("inf740k01dp8"));
        assert!(!Classifier::is_fund_isin("INFRATEL"));
        assert_eq!(c.classify_listed("TCS"), Classification::Sector(Sector::It));
    }

    #[test]
    fn overrides_replace_builtin_entries() {
        let mut overrides = HashMap::new();
        overrides.insert("tcs".to_string(), Sector::Financials);
        overrides.insert("NEWCO".to_string(), Sector::Media);
        let table = SectorTable::builtin().with_overrides(&overrides);
        assert_eq!(table.lookup("TCS"), Some(Sector::Financials));
        assert_eq!(table.lookup("newco"), Some(Sector::Media));
        assert_eq!(table.lookup("INFY"), Some(Sector::It));
    }

    #[test]
    fn empty_table_knows_nothing() {
        let table = SectorTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.lookup("TCS"), None);
        assert!(!SectorTable::builtin().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Normalizer
// ═══════════════════════════════════════════════════════════════════

mod normalizer {
    use super::*;

    fn normalizer() -> NormalizerService {
        NormalizerService::new(Classifier::default(), "INR")
    }

    #[test]
    fn equity_record() {
        let record = RawRecord::BrokerEquity(BrokerEquityRecord {
            tradingsymbol: "TCS".into(),
            exchange: Some("NSE".into()),
            quantity: 5.0,
            average_price: 3000.0,
            last_price: 3500.0,
            pnl: 2500.0,
            day_change: 10.0,
            day_change_percentage: Some(0.29),
            ..Default::default()
        });
        let fx = FxRate::live("USD", "INR", 83.0, "Mock");
        let h = normalizer().normalize_record(&record, &fx);
        assert_eq!(h.symbol, "TCS");
        assert_eq!(h.kind, InstrumentKind::Equity);
        assert_eq!(h.classification, Classification::Sector(Sector::It));
        assert_eq!(h.source_currency, "INR");
        // Home-currency records are not converted
        assert_eq!(h.last_price, 3500.0);
        assert_eq!(h.day_change_pct, Some(0.29));
    }

    #[test]
    fn negative_quantities_and_prices_read_as_zero() {
        let fx = FxRate::live("USD", "INR", 80.0, "Mock");
        let records = vec![
            RawRecord::BrokerEquity(BrokerEquityRecord {
                tradingsymbol: "INFY".into(),
                quantity: -5.0,
                average_price: 100.0,
                last_price: -1.0,
                pnl: -50.0,
                ..Default::default()
            }),
            RawRecord::BrokerFund(BrokerFundRecord {
                tradingsymbol: "INF000K01AB1".into(),
                fund: Some("Axis Bluechip Fund".into()),
                quantity: 10.0,
                average_price: -20.0,
                last_price: 25.0,
                ..Default::default()
            }),
            RawRecord::ForeignRow(ForeignRow {
                ticker: Some("AAPL".into()),
                quantity: -2.0,
                average_cost: -100.0,
                current_price: 150.0,
                ..Default::default()
            }),
        ];
        let holdings = normalizer().normalize(&records, &fx);

        assert_eq!(holdings[0].quantity, 0.0);
        assert_eq!(holdings[0].last_price, 0.0);
        assert_eq!(holdings[0].pnl, -50.0);

        assert_eq!(holdings[1].average_price, 0.0);
        // P&L recomputed from the cleaned prices
        assert_eq!(holdings[1].pnl, 250.0);

        assert_eq!(holdings[2].quantity, 0.0);
        assert_eq!(holdings[2].average_price, 0.0);
        assert_eq!(holdings[2].last_price, 12_000.0);

        for h in &holdings {
            assert!(h.quantity >= 0.0 && h.average_price >= 0.0 && h.last_price >= 0.0);
        }
    }

    #[test]
    fn foreign_row_is_converted() {
        let record = RawRecord::ForeignRow(ForeignRow {
            ticker: Some("AAPL".into()),
            quantity: 2.0,
            average_cost: 100.0,
            current_price: 150.0,
            returns: 100.0,
            daily_change: 1.5,
            daily_change_pct: Some(1.0),
        });
        let fx = FxRate::live("USD", "INR", 80.0, "Mock");
        let h = normalizer().normalize_record(&record, &fx);
        assert_eq!(h.symbol, "AAPL");
        assert_eq!(h.quantity, 2.0);
        assert_eq!(h.average_price, 8000.0);
        assert_eq!(h.last_price, 12000.0);
        assert_eq!(h.pnl, 8000.0);
        assert_eq!(h.day_change, 120.0);
        assert_eq!(h.day_change_pct, Some(1.0));
        assert_eq!(h.classification, Classification::Sector(Sector::International));
        assert_eq!(h.source_currency, "USD");
        assert_eq!(h.exchange.as_deref(), Some("US"));
    }

    #[test]
    fn foreign_row_without_ticker() {
        let record = RawRecord::ForeignRow(ForeignRow {
            ticker: Some("  ".into()),
            ..Default::default()
        });
        let fx = FxRate::fallback("USD", "INR", 87.5);
        let h = normalizer().normalize_record(&record, &fx);
        assert_eq!(h.symbol, "UNKNOWN");
        assert_eq!(h.current_value(), 0.0);
    }

    #[test]
    fn fund_uses_name_and_recomputes_pnl() {
        let record = RawRecord::BrokerFund(BrokerFundRecord {
            tradingsymbol: "INF740K01DP8".into(),
            fund: Some("DSP Nifty 50 Index Fund".into()),
            quantity: 100.0,
            average_price: 10.0,
            last_price: 12.5,
            pnl: 0.0,
            ..Default::default()
        });
        let fx = FxRate::fallback("USD", "INR", 87.5);
        let h = normalizer().normalize_record(&record, &fx);
        assert_eq!(h.symbol, "DSP Nifty 50 Index Fund");
        assert_eq!(h.kind, InstrumentKind::Fund);
        assert_eq!(h.classification, Classification::Fund(FundCategory::Index));
        assert_eq!(h.pnl, 250.0);
    }

    #[test]
    fn fund_keeps_reported_pnl() {
        let record = RawRecord::BrokerFund(BrokerFundRecord {
            tradingsymbol: "INF000".into(),
            fund: None,
            quantity: 10.0,
            average_price: 10.0,
            last_price: 11.0,
            pnl: 42.0,
            ..Default::default()
        });
        let fx = FxRate::fallback("USD", "INR", 87.5);
        let h = normalizer().normalize_record(&record, &fx);
        assert_eq!(h.symbol, "INF000");
        assert_eq!(h.pnl, 42.0);
    }

    #[test]
    fn batch_is_deterministic_and_ordered() {
        let records = vec![
            RawRecord::BrokerEquity(BrokerEquityRecord {
                tradingsymbol: "INFY".into(),
                quantity: 1.0,
                last_price: 10.0,
                ..Default::default()
            }),
            RawRecord::ForeignRow(ForeignRow {
                ticker: Some("MSFT".into()),
                quantity: 1.0,
                current_price: 1.0,
                ..Default::default()
            }),
            RawRecord::BrokerFund(BrokerFundRecord {
                fund: Some("XYZ Liquid Fund".into()),
                ..Default::default()
            }),
        ];
        let fx = FxRate::live("USD", "INR", 83.0, "Mock");
        let n = normalizer();
        let first = n.normalize(&records, &fx);
        let second = n.normalize(&records, &fx);
        assert_eq!(first, second);
        let symbols: Vec<&str> = first.iter().map(|h| h.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["INFY", "MSFT", "XYZ Liquid Fund"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Currency
// ═══════════════════════════════════════════════════════════════════

mod currency {
    use super::*;

    enum Reply {
        Rate(f64),
        Fail,
    }

    struct MockRates(Reply);

    #[async_trait]
    impl RateProvider for MockRates {
        fn name(&self) -> &str {
            "MockRates"
        }

        async fn get_rate(&self, _base: &str, _quote: &str) -> Result<f64, CoreError> {
            match self.0 {
                Reply::Rate(r) => Ok(r),
                Reply::Fail => Err(CoreError::Network("connection refused".into())),
            }
        }
    }

    #[tokio::test]
    async fn live_rate() {
        let provider = MockRates(Reply::Rate(83.2));
        let fx = CurrencyService::new()
            .resolve_rate(Some(&provider), "usd", "inr", 87.5)
            .await;
        assert_eq!(fx.rate, 83.2);
        assert_eq!(fx.from, "USD");
        assert_eq!(fx.source, RateSource::Live { provider: "MockRates".into() });
    }

    #[tokio::test]
    async fn provider_error_falls_back() {
        let provider = MockRates(Reply::Fail);
        let fx = CurrencyService::new()
            .resolve_rate(Some(&provider), "USD", "INR", 87.5)
            .await;
        assert_eq!(fx.rate, 87.5);
        assert!(fx.is_fallback());
    }

    #[tokio::test]
    async fn implausible_rate_falls_back() {
        for bad in [0.0, -1.0, f64::NAN] {
            let provider = MockRates(Reply::Rate(bad));
            let fx = CurrencyService::new()
                .resolve_rate(Some(&provider), "USD", "INR", 87.5)
                .await;
            assert!(fx.is_fallback());
            assert_eq!(fx.rate, 87.5);
        }
    }

    #[tokio::test]
    async fn no_provider_falls_back() {
        let fx = CurrencyService::new()
            .resolve_rate(None, "USD", "INR", 90.0)
            .await;
        assert!(fx.is_fallback());
        assert_eq!(fx.rate, 90.0);
    }

    #[tokio::test]
    async fn same_currency_is_identity() {
        let provider = MockRates(Reply::Fail);
        let fx = CurrencyService::new()
            .resolve_rate(Some(&provider), "INR", "inr", 87.5)
            .await;
        assert_eq!(fx.rate, 1.0);
        assert!(!fx.is_fallback());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Metrics
// ═══════════════════════════════════════════════════════════════════

mod metrics {
    use super::*;

    #[test]
    fn totals_and_weights() {
        let m = MetricsService::default().compute(&two_holdings(), "inr");
        assert_eq!(m.currency, "INR");
        assert_eq!(m.total_investment, 2000.0);
        assert_eq!(m.current_value, 3000.0);
        assert_eq!(m.total_pnl, 1000.0);
        assert!(approx(m.total_pnl_pct, 50.0));
        assert!(approx(m.holdings[0].weight, 200.0 / 3.0));
        assert!(approx(m.holdings[1].weight, 100.0 / 3.0));
        let sum: f64 = m.holdings.iter().map(|h| h.weight).sum();
        assert!(approx(sum, 100.0));
    }

    #[test]
    fn equal_weights_hhi() {
        let holdings: Vec<Holding> = ["A", "B", "C", "D"]
            .iter()
            .map(|s| stock(s, 1.0, 100.0, 100.0, 0.0, Sector::It))
            .collect();
        let m = MetricsService::default().compute(&holdings, "INR");
        assert!(approx(m.hhi, 25.0));
        assert!(approx(m.effective_holdings, 4.0));
        for h in &m.holdings {
            assert!(approx(h.hhi_contribution, 25.0));
        }
    }

    #[test]
    fn herfindahl_building_blocks() {
        assert!(approx(metrics_service::herfindahl(&[50.0, 50.0]), 50.0));
        assert!(approx(metrics_service::herfindahl(&[100.0]), 100.0));
        assert_eq!(metrics_service::herfindahl(&[]), 0.0);
        assert!(approx(
            metrics_service::top_k_concentration(&[10.0, 40.0, 20.0, 30.0], 2),
            70.0
        ));
        assert_eq!(metrics_service::percent_of(5.0, 0.0), 0.0);
        assert_eq!(metrics_service::percent_of(5.0, -1.0), 0.0);
    }

    #[test]
    fn empty_portfolio() {
        let m = MetricsService::default().compute(&[], "INR");
        assert_eq!(m.number_of_holdings, 0);
        assert_eq!(m.current_value, 0.0);
        assert_eq!(m.total_pnl_pct, 0.0);
        assert_eq!(m.hhi, 0.0);
        assert_eq!(m.diversification_score, 0.0);
        assert!(m.sectors.is_empty());
        assert!(m.largest_holding.is_none());
        assert!(m.top_gainer.is_none());
        assert!(m.top_loser.is_none());
    }

    #[test]
    fn zero_value_portfolio_has_zero_weights() {
        let holdings = vec![
            stock("A", 0.0, 100.0, 100.0, 0.0, Sector::It),
            stock("B", 5.0, 100.0, 0.0, -500.0, Sector::Banking),
        ];
        let m = MetricsService::default().compute(&holdings, "INR");
        assert_eq!(m.current_value, 0.0);
        for h in &m.holdings {
            assert_eq!(h.weight, 0.0);
            assert!(h.weight.is_finite());
        }
        assert_eq!(m.hhi, 0.0);
        assert_eq!(m.effective_holdings, 0.0);
        assert_eq!(m.day_change_pct, 0.0);
        assert!(m.diversification_score.is_finite());
    }

    #[test]
    fn zero_average_price_keeps_rollups_finite() {
        let holdings = vec![
            stock("BONUS", 5.0, 0.0, 100.0, 500.0, Sector::Pharma),
            stock("TCS", 10.0, 100.0, 120.0, 200.0, Sector::It),
        ];
        let m = MetricsService::default().compute(&holdings, "INR");

        let pharma = m.sector("Pharma").unwrap();
        assert_eq!(pharma.investment, 0.0);
        assert_eq!(pharma.pnl, 500.0);
        assert_eq!(pharma.pnl_pct, 0.0);
        assert!(pharma.pnl_pct.is_finite());

        let bonus = &m.holdings[0];
        assert_eq!(bonus.return_pct, 0.0);
        assert_eq!(bonus.price_return_pct, 0.0);
        assert!(m.total_pnl_pct.is_finite());
        assert!(m.sectors.iter().all(|s| s.pnl_pct.is_finite() && s.weight.is_finite()));
    }

    #[test]
    fn single_holding() {
        let m = MetricsService::default()
            .compute(&[stock("A", 1.0, 10.0, 12.0, 2.0, Sector::It)], "INR");
        assert!(approx(m.hhi, 100.0));
        assert!(approx(m.effective_holdings, 1.0));
        assert_eq!(m.diversification_score, 0.0);
        assert_eq!(m.concentration_risk, RiskLevel::High);
        assert_eq!(m.overall_risk_score, 100.0);
    }

    #[test]
    fn diversification_penalty() {
        let t = Thresholds::default();
        assert!(approx(metrics_service::diversification_score(10.0, 25.0, &t), 90.0));
        assert!(approx(metrics_service::diversification_score(10.0, 35.0, &t), 70.0));
        assert_eq!(metrics_service::diversification_score(95.0, 100.0, &t), 0.0);
    }

    #[test]
    fn sector_rollups() {
        let holdings = vec![
            stock("TCS", 1.0, 100.0, 100.0, 0.0, Sector::It),
            stock("HDFCBANK", 1.0, 100.0, 300.0, 200.0, Sector::Banking),
            stock("INFY", 1.0, 100.0, 100.0, 0.0, Sector::It),
        ];
        let m = MetricsService::default().compute(&holdings, "INR");
        assert_eq!(m.number_of_sectors, 2);
        let names: Vec<&str> = m.sectors.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Banking", "IT"]);

        let it = m.sector("IT").unwrap();
        assert_eq!(it.count, 2);
        assert!(approx(it.weight, 40.0));
        assert!(approx(it.avg_holding_weight, 20.0));
        assert!(approx(it.max_holding_weight, 20.0));
        assert_eq!(it.risk_level, RiskLevel::High);
        assert_eq!(it.symbols, vec!["TCS", "INFY"]);

        let banking = m.sector("Banking").unwrap();
        assert!(approx(banking.pnl_pct, 200.0));
        assert!(approx(m.max_sector_weight, 60.0));
    }

    #[test]
    fn international_labels_merge() {
        let holdings = vec![
            stock("AAPL", 1.0, 100.0, 100.0, 0.0, Sector::International),
            fund("Global Fund", 1.0, 100.0, 100.0, FundCategory::International),
        ];
        let m = MetricsService::default().compute(&holdings, "INR");
        assert_eq!(m.number_of_sectors, 1);
        assert_eq!(m.sectors[0].count, 2);
        assert_eq!(m.equity.count, 1);
        assert_eq!(m.funds.count, 1);
        assert!(approx(m.funds.weight, 50.0));
    }

    #[test]
    fn top5_with_six_holdings() {
        let holdings: Vec<Holding> = (1..=6)
            .map(|i| stock(&format!("S{i}"), i as f64, 1.0, 1.0, 0.0, Sector::Others))
            .collect();
        // values 1..=6, total 21; top five exclude the value-1 holding
        let m = MetricsService::default().compute(&holdings, "INR");
        assert!(approx(m.top5_concentration, 2000.0 / 21.0));
        assert!(approx(m.top10_concentration, 100.0));
    }

    #[test]
    fn risk_levels_per_holding() {
        let holdings = vec![
            stock("BIG", 20.0, 1.0, 1.0, 0.0, Sector::It),
            stock("MID", 10.0, 1.0, 1.0, 0.0, Sector::Banking),
            stock("SMALL", 70.0, 1.0, 1.0, 0.0, Sector::Pharma),
        ];
        let m = MetricsService::default().compute(&holdings, "INR");
        let by_symbol = |s: &str| m.holdings.iter().find(|h| h.symbol() == s).unwrap();
        assert_eq!(by_symbol("BIG").risk_level, RiskLevel::High);
        assert!(by_symbol("BIG").is_overweight);
        assert_eq!(by_symbol("MID").risk_level, RiskLevel::Medium);
        assert!(!by_symbol("MID").is_overweight);
        assert_eq!(metrics_service::concentration_risk(10.0), RiskLevel::Low);
        assert_eq!(metrics_service::concentration_risk(20.0), RiskLevel::Medium);
    }

    #[test]
    fn largest_gainer_loser() {
        let holdings = vec![
            stock("A", 1.0, 100.0, 150.0, 50.0, Sector::It),
            stock("B", 10.0, 100.0, 90.0, -100.0, Sector::It),
            stock("C", 1.0, 100.0, 150.0, 50.0, Sector::It),
            stock("D", 1.0, 100.0, 90.0, -10.0, Sector::It),
        ];
        let m = MetricsService::default().compute(&holdings, "INR");
        assert_eq!(m.largest_holding.as_ref().unwrap().symbol(), "B");
        // ties: first best, last worst
        assert_eq!(m.top_gainer.as_ref().unwrap().symbol(), "A");
        assert_eq!(m.top_loser.as_ref().unwrap().symbol(), "D");
    }

    #[test]
    fn holdings_keep_input_order() {
        let holdings = vec![
            stock("SMALL", 1.0, 1.0, 1.0, 0.0, Sector::It),
            stock("LARGE", 9.0, 1.0, 1.0, 0.0, Sector::It),
        ];
        let m = MetricsService::default().compute(&holdings, "INR");
        assert_eq!(m.holdings[0].symbol(), "SMALL");
        let ranked: Vec<&str> = m.ranked_by_weight().iter().map(|h| h.symbol()).collect();
        assert_eq!(ranked, vec!["LARGE", "SMALL"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Insights
// ═══════════════════════════════════════════════════════════════════

mod insights {
    use super::*;

    #[test]
    fn empty_portfolio_has_no_insights() {
        assert!(insight_ids(&[]).is_empty());
    }

    #[test]
    fn two_holding_scenario() {
        assert_eq!(
            insight_ids(&two_holdings()),
            vec!["overweight-positions", "sector-concentration", "rebalancing", "best-sector"]
        );
    }

    #[test]
    fn overweight_details() {
        let metrics = MetricsService::default().compute(&two_holdings(), "INR");
        let insights = InsightService::default().generate(&metrics);
        let overweight = insights.iter().find(|i| i.id == "overweight-positions").unwrap();
        assert_eq!(overweight.kind, InsightKind::Warning);
        assert_eq!(overweight.impact, Impact::High);
        assert_eq!(overweight.title, "2 Overweight Positions");
        assert_eq!(overweight.symbols(), vec!["A", "B"]);
        match overweight.metric("Max Weight") {
            Some(MetricValue::Percent(w)) => assert!(approx(*w, 200.0 / 3.0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn custom_overweight_threshold() {
        let thresholds = Thresholds {
            overweight_weight_pct: 70.0,
            ..Thresholds::default()
        };
        let metrics = MetricsService::new(thresholds.clone()).compute(&two_holdings(), "INR");
        let insights = InsightService::new(thresholds).generate(&metrics);
        assert!(insights.iter().all(|i| i.id != "overweight-positions"));
    }

    #[test]
    fn profit_booking_needs_value() {
        let holdings = vec![
            stock("A", 100.0, 100.0, 200.0, 10_000.0, Sector::It),
            stock("B", 100.0, 100.0, 100.0, 0.0, Sector::It),
        ];
        let ids = insight_ids(&holdings);
        assert!(ids.contains(&"profit-booking".to_string()));
        assert!(!insight_ids(&two_holdings()).contains(&"profit-booking".to_string()));
    }

    #[test]
    fn portfolio_health_bands() {
        let build = |winners: usize| -> Vec<Holding> {
            (0..10)
                .map(|i| {
                    let pnl = if i < winners { 10.0 } else { -10.0 };
                    stock(&format!("S{i}"), 1.0, 100.0, 100.0, pnl, Sector::Others)
                })
                .collect()
        };
        let seven = insight_ids(&build(7));
        assert!(seven.contains(&"portfolio-health".to_string()));
        assert!(!seven.contains(&"portfolio-concern".to_string()));

        let three = insight_ids(&build(3));
        assert!(three.contains(&"portfolio-concern".to_string()));

        let five = insight_ids(&build(5));
        assert!(!five.contains(&"portfolio-health".to_string()));
        assert!(!five.contains(&"portfolio-concern".to_string()));
    }

    #[test]
    fn tax_loss_harvesting() {
        let holdings = vec![
            stock("L1", 100.0, 200.0, 140.0, -6000.0, Sector::It),
            stock("L2", 100.0, 200.0, 120.0, -8000.0, Sector::Banking),
            stock("L3", 100.0, 200.0, 160.0, -4000.0, Sector::Pharma),
        ];
        let metrics = MetricsService::default().compute(&holdings, "INR");
        let insights = InsightService::default().generate(&metrics);
        let tax = insights.iter().find(|i| i.id == "tax-loss").unwrap();
        assert_eq!(tax.symbols(), vec!["L2", "L1"]);
        assert_eq!(tax.metric("Stocks Eligible"), Some(&MetricValue::Count(2)));
        match tax.metric("Potential Tax Offset") {
            Some(MetricValue::Amount(v)) => assert!(approx(*v, 2100.0)),
            other => panic!("unexpected {other:?}"),
        }
        assert!(tax.description.contains("₹14,000"));
    }

    #[test]
    fn small_positions_need_more_than_five() {
        let build = |n: usize| -> Vec<Holding> {
            let mut holdings = vec![stock("CORE", 1000.0, 1000.0, 1000.0, 0.0, Sector::It)];
            holdings.extend(
                (0..n).map(|i| stock(&format!("TINY{i}"), 1.0, 1000.0, 1000.0, 0.0, Sector::Others)),
            );
            holdings
        };
        let metrics = MetricsService::default().compute(&build(6), "INR");
        let insights = InsightService::default().generate(&metrics);
        let small = insights.iter().find(|i| i.id == "small-positions").unwrap();
        assert_eq!(small.holdings.len(), 5);
        assert!(small.description.starts_with("You have 6 positions"));

        assert!(!insight_ids(&build(5)).contains(&"small-positions".to_string()));
    }

    #[test]
    fn momentum_band_is_exclusive() {
        let firing = vec![
            stock("M1", 10.0, 100.0, 140.0, 400.0, Sector::It),
            stock("M2", 10.0, 100.0, 150.0, 500.0, Sector::Banking),
            stock("M3", 10.0, 100.0, 160.0, 600.0, Sector::Pharma),
            stock("EDGE", 10.0, 100.0, 130.0, 300.0, Sector::Auto),
        ];
        let metrics = MetricsService::default().compute(&firing, "INR");
        let insights = InsightService::default().generate(&metrics);
        let momentum = insights.iter().find(|i| i.id == "momentum").unwrap();
        assert_eq!(momentum.kind, InsightKind::Info);
        assert!(!momentum.actionable);
        assert_eq!(momentum.symbols(), vec!["M3", "M2", "M1"]);

        let short = vec![
            stock("M1", 10.0, 100.0, 140.0, 400.0, Sector::It),
            stock("M2", 10.0, 100.0, 150.0, 500.0, Sector::Banking),
            stock("EDGE", 10.0, 100.0, 130.0, 300.0, Sector::Auto),
        ];
        assert!(!insight_ids(&short).contains(&"momentum".to_string()));
    }

    #[test]
    fn momentum_counts_before_listing_top_k() {
        let holdings = vec![
            stock("M1", 10.0, 100.0, 140.0, 400.0, Sector::It),
            stock("M2", 10.0, 100.0, 150.0, 500.0, Sector::Banking),
            stock("M3", 10.0, 100.0, 160.0, 600.0, Sector::Pharma),
        ];
        let thresholds = Thresholds {
            top_k: 2,
            ..Thresholds::default()
        };
        let metrics = MetricsService::new(thresholds.clone()).compute(&holdings, "INR");
        let insights = InsightService::new(thresholds).generate(&metrics);
        let momentum = insights.iter().find(|i| i.id == "momentum").unwrap();
        assert_eq!(momentum.symbols(), vec!["M3", "M2"]);
    }

    #[test]
    fn underperformers_and_worst_sector() {
        let holdings = vec![
            stock("SUNPHARMA", 10.0, 100.0, 60.0, -400.0, Sector::Pharma),
            stock("CIPLA", 10.0, 100.0, 90.0, -100.0, Sector::Pharma),
            stock("TCS", 10.0, 100.0, 100.0, 0.0, Sector::It),
        ];
        let metrics = MetricsService::default().compute(&holdings, "INR");
        let insights = InsightService::default().generate(&metrics);

        let under = insights.iter().find(|i| i.id == "underperformers").unwrap();
        assert_eq!(under.symbols(), vec!["SUNPHARMA"]);
        assert_eq!(under.impact, Impact::High);

        let worst = insights.iter().find(|i| i.id == "worst-sector").unwrap();
        assert_eq!(worst.title, "Pharma Needs Attention");
        assert_eq!(worst.symbols(), vec!["SUNPHARMA", "CIPLA"]);
        match worst.metric("Sector Return") {
            Some(MetricValue::Percent(r)) => assert!(approx(*r, -25.0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn sorted_by_impact() {
        let metrics = MetricsService::default().compute(&two_holdings(), "INR");
        let insights = InsightService::default().generate(&metrics);
        assert!(insights.windows(2).all(|w| w[0].impact <= w[1].impact));
    }

    #[test]
    fn filters() {
        let metrics = MetricsService::default().compute(&two_holdings(), "INR");
        let insights = InsightService::default().generate(&metrics);
        let actionable: Vec<&str> = InsightService::actionable_only(&insights)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(actionable, vec!["overweight-positions", "sector-concentration", "rebalancing"]);
        let warnings: Vec<&str> = InsightService::warnings_only(&insights)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(warnings, vec!["overweight-positions", "sector-concentration"]);
    }

    #[test]
    fn amount_formatting() {
        assert_eq!(format_amount(1_234_567.5, "INR"), "₹12,34,567.5");
        assert_eq!(format_amount(14_000.0, "INR"), "₹14,000");
        assert_eq!(format_amount(999.0, "inr"), "₹999");
        assert_eq!(format_amount(1_234_567.0, "USD"), "USD 1,234,567");
        assert_eq!(format_amount(-500.0, "INR"), "-₹500");
        assert_eq!(format_amount(0.25, "USD"), "USD 0.25");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Prompts
// ═══════════════════════════════════════════════════════════════════

mod prompts {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn portfolio_prompt_lists_weights_only() {
        let snap = snapshot(two_holdings());
        let prompt = PromptService::new().portfolio_prompt(&snap, date());
        assert!(prompt.starts_with("# PORTFOLIO INTELLIGENCE BRIEFING"));
        assert!(prompt.contains("**Analysis Date:** Tuesday, 5 March 2024"));
        assert!(prompt.contains("1. **A** - 66.67% | Equity | Sector: IT"));
        assert!(prompt.contains("2. **B** - 33.33% | Equity | Sector: IT"));
        assert!(prompt.contains("- **IT:** 100.0% ████████████████████"));
        assert!(prompt.contains("- Top 5 Concentration: 100.0%"));
        assert!(!prompt.contains('₹'));
        assert!(!prompt.contains("3000"));
    }

    #[test]
    fn portfolio_prompt_counts_funds() {
        let snap = snapshot(vec![
            stock("TCS", 1.0, 100.0, 100.0, 0.0, Sector::It),
            fund("XYZ Liquid Fund", 1.0, 100.0, 100.0, FundCategory::Liquid),
        ]);
        let prompt = PromptService::new().portfolio_prompt(&snap, date());
        assert!(prompt.contains("- **Mutual Fund Holdings:** 50.0% of portfolio (1 funds)"));
        assert!(prompt.contains("| MF | Sector: Liquid"));
    }

    #[test]
    fn holding_prompt() {
        let snap = snapshot(vec![
            stock("TCS", 1.0, 100.0, 150.0, 50.0, Sector::It),
            stock("INFY", 1.0, 100.0, 100.0, 0.0, Sector::It),
        ]);
        let prompt = PromptService::new()
            .holding_prompt(&snap, "tcs", date())
            .unwrap();
        assert!(prompt.starts_with("# TCS RESEARCH BRIEFING"));
        assert!(prompt.contains("- **Current Allocation:** 60.00%"));
        assert!(prompt.contains("- **Return on Cost:** +50.0%"));
        assert!(prompt.contains("- **Other holdings in sector:** INFY"));
    }

    #[test]
    fn holding_prompt_unknown_symbol() {
        let snap = snapshot(two_holdings());
        let err = PromptService::new()
            .holding_prompt(&snap, " ZZZ ", date())
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownHolding(ref s) if s == "ZZZ"));
    }

    #[test]
    fn allocation_bars() {
        assert_eq!(allocation_bar(100.0), "█".repeat(20));
        assert_eq!(allocation_bar(33.3), format!("{}{}", "█".repeat(7), "░".repeat(13)));
        assert_eq!(allocation_bar(0.0), "░".repeat(20));
        assert_eq!(allocation_bar(250.0), "█".repeat(20));
        assert_eq!(allocation_bar(f64::NAN), "░".repeat(20));
    }
}
