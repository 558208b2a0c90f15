// ═══════════════════════════════════════════════════════════════════
// Integration Tests — the StockDashboard facade end to end:
// universe resolution + cache artifact → prices → view → performance
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ibov_dashboard_core::errors::CoreError;
use ibov_dashboard_core::models::matrix::PriceMatrix;
use ibov_dashboard_core::models::price::PricePoint;
use ibov_dashboard_core::models::settings::DashboardSettings;
use ibov_dashboard_core::models::symbol::Symbol;
use ibov_dashboard_core::providers::traits::{
    Constituent, ConstituentProvider, QuoteProvider,
};
use ibov_dashboard_core::services::universe_service::UniverseService;
use ibov_dashboard_core::StockDashboard;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sym(raw: &str) -> Symbol {
    Symbol::new(raw).unwrap()
}

fn point(y: i32, m: u32, d: u32, close: f64) -> PricePoint {
    PricePoint {
        date: date(y, m, d),
        close,
    }
}

// ═══════════════════════════════════════════════════════════════════
// Mock Providers
// ═══════════════════════════════════════════════════════════════════

struct MockConstituents {
    rows: Vec<Constituent>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockConstituents {
    fn ibov(symbols: &[&str]) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = Self {
            rows: symbols
                .iter()
                .map(|s| Constituent {
                    symbol: s.to_string(),
                    index: "IBOV".to_string(),
                })
                .collect(),
            fail: false,
            calls: calls.clone(),
        };
        (provider, calls)
    }

    fn failing() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = Self {
            rows: Vec::new(),
            fail: true,
            calls: calls.clone(),
        };
        (provider, calls)
    }
}

#[async_trait]
impl ConstituentProvider for MockConstituents {
    fn name(&self) -> &str {
        "MockConstituents"
    }

    async fn fetch_constituents(&self, _country: &str) -> Result<Vec<Constituent>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CoreError::ProviderUnavailable {
                provider: self.name().to_string(),
                message: "listing endpoint down".to_string(),
            });
        }
        Ok(self.rows.clone())
    }
}

struct MockQuotes {
    series: HashMap<String, Vec<PricePoint>>,
    calls: Arc<AtomicUsize>,
}

impl MockQuotes {
    fn with_series(series: Vec<(&str, Vec<PricePoint>)>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = Self {
            series: series
                .into_iter()
                .map(|(name, points)| (name.to_string(), points))
                .collect(),
            calls: calls.clone(),
        };
        (provider, calls)
    }
}

#[async_trait]
impl QuoteProvider for MockQuotes {
    fn name(&self) -> &str {
        "MockQuotes"
    }

    async fn close_history(
        &self,
        symbols: &[Symbol],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceMatrix, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let series = symbols
            .iter()
            .map(|symbol| {
                let points = self
                    .series
                    .get(symbol.as_str())
                    .map(|points| {
                        points
                            .iter()
                            .copied()
                            .filter(|p| p.date >= start && p.date <= end)
                            .collect()
                    })
                    .unwrap_or_default();
                (symbol.as_str().to_string(), points)
            })
            .collect();
        Ok(PriceMatrix::from_series(series))
    }
}

fn test_settings(dir: &tempfile::TempDir) -> DashboardSettings {
    DashboardSettings {
        universe_cache_path: dir.path().join("IBOV.csv"),
        history_start: date(2020, 1, 1),
        history_end: date(2020, 12, 31),
        ..DashboardSettings::default()
    }
}

// ═══════════════════════════════════════════════════════════════════
// Universe lifecycle through the facade
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn load_universe_resolves_and_persists_on_miss() {
    let dir = tempfile::tempdir().unwrap();
    let (source, source_calls) = MockConstituents::ibov(&["PETR4", "VALE3"]);
    let (quotes, _) = MockQuotes::with_series(vec![]);
    let dashboard =
        StockDashboard::with_providers(test_settings(&dir), Box::new(source), Box::new(quotes));

    let universe = dashboard.load_universe().await;
    assert_eq!(universe.len(), 2);
    assert!(dir.path().join("IBOV.csv").exists());
    assert_eq!(source_calls.load(Ordering::SeqCst), 1);

    // Second load is served from the artifact, not the source
    let again = dashboard.load_universe().await;
    assert_eq!(again, universe);
    assert_eq!(source_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn load_universe_degrades_to_fallback_and_persists_it() {
    let dir = tempfile::tempdir().unwrap();
    let (source, source_calls) = MockConstituents::failing();
    let (quotes, _) = MockQuotes::with_series(vec![]);
    let dashboard =
        StockDashboard::with_providers(test_settings(&dir), Box::new(source), Box::new(quotes));

    let universe = dashboard.load_universe().await;
    assert_eq!(universe, UniverseService::fallback_universe());
    assert!(dir.path().join("IBOV.csv").exists());

    // The persisted fallback now serves as the canonical universe
    let again = dashboard.load_universe().await;
    assert_eq!(again, universe);
    assert_eq!(source_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn refresh_universe_always_hits_the_source() {
    let dir = tempfile::tempdir().unwrap();
    let (source, source_calls) = MockConstituents::ibov(&["PETR4"]);
    let (quotes, _) = MockQuotes::with_series(vec![]);
    let dashboard =
        StockDashboard::with_providers(test_settings(&dir), Box::new(source), Box::new(quotes));

    dashboard.refresh_universe().await;
    dashboard.refresh_universe().await;
    assert_eq!(source_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn resolve_universe_does_not_write_the_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let (source, _) = MockConstituents::ibov(&["PETR4"]);
    let (quotes, _) = MockQuotes::with_series(vec![]);
    let dashboard =
        StockDashboard::with_providers(test_settings(&dir), Box::new(source), Box::new(quotes));

    dashboard.resolve_universe().await;
    assert!(!dir.path().join("IBOV.csv").exists());
}

// ═══════════════════════════════════════════════════════════════════
// Full pipeline
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn pipeline_universe_prices_view_performance() {
    let dir = tempfile::tempdir().unwrap();
    let (source, _) = MockConstituents::ibov(&["PETR4", "VALE3"]);
    let (quotes, quote_calls) = MockQuotes::with_series(vec![
        (
            "PETR4.SA",
            vec![
                point(2020, 1, 2, 100.0),
                point(2020, 3, 2, 120.0),
                point(2020, 6, 1, 150.0),
            ],
        ),
        (
            "VALE3.SA",
            vec![
                point(2020, 1, 2, 50.0),
                point(2020, 3, 2, 40.0),
                point(2020, 6, 1, 25.0),
            ],
        ),
    ]);
    let mut dashboard =
        StockDashboard::with_providers(test_settings(&dir), Box::new(source), Box::new(quotes));

    let universe = dashboard.load_universe().await;
    let matrix = dashboard.load_prices(universe.symbols()).await.unwrap();
    assert_eq!(matrix.columns(), ["PETR4.SA", "VALE3.SA"]);
    assert_eq!(matrix.row_count(), 3);

    // Whole-universe view over the full window: +50% and −50% cancel out
    let view = dashboard.filter_view(&matrix, None, None).unwrap();
    let report = dashboard.compute_performance(&view).unwrap();
    assert_eq!(report.portfolio.as_ref().unwrap().total_return, 0.0);

    // Single-asset sub-window view: PETR4 from 2020-03-02 on, 120 → 150
    let view = dashboard
        .filter_view(
            &matrix,
            Some(&[sym("PETR4")]),
            Some((date(2020, 3, 1), date(2020, 12, 31))),
        )
        .unwrap();
    assert!(view.has_column("Close"));
    let report = dashboard.compute_performance(&view).unwrap();
    assert_eq!(report.asset_return("PETR4.SA"), Some(0.25));

    let series = dashboard.chart_series(&view);
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].points.len(), 2);

    // Re-running the load for the same universe hits the memo, not the wire
    let again = dashboard.load_prices(universe.symbols()).await.unwrap();
    assert_eq!(again, matrix);
    assert_eq!(quote_calls.load(Ordering::SeqCst), 1);
    assert_eq!(dashboard.memoized_requests(), 1);
}

#[tokio::test]
async fn rejected_filter_leaves_previous_view_usable() {
    let dir = tempfile::tempdir().unwrap();
    let (source, _) = MockConstituents::ibov(&["PETR4"]);
    let (quotes, _) = MockQuotes::with_series(vec![(
        "PETR4.SA",
        vec![point(2020, 1, 2, 100.0), point(2020, 6, 1, 150.0)],
    )]);
    let mut dashboard =
        StockDashboard::with_providers(test_settings(&dir), Box::new(source), Box::new(quotes));

    let matrix = dashboard.load_prices(&[sym("PETR4")]).await.unwrap();
    let view = dashboard.filter_view(&matrix, None, None).unwrap();

    // An unknown symbol rejects the operation without touching the view
    let result = dashboard.filter_view(&matrix, Some(&[sym("WEGE3")]), None);
    assert!(matches!(result, Err(CoreError::InvalidSelection(_))));
    let report = dashboard.compute_performance(&view).unwrap();
    assert_eq!(report.asset_return("PETR4.SA"), Some(0.5));
}
