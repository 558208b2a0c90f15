pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use tracing::{debug, warn};

use errors::CoreError;
use models::{
    chart::ChartSeries,
    matrix::PriceMatrix,
    performance::PerformanceReport,
    price::QuoteCache,
    settings::DashboardSettings,
    symbol::{Symbol, SymbolUniverse},
};
use providers::investing::InvestingProvider;
use providers::traits::{ConstituentProvider, QuoteProvider};
use providers::yahoo_finance::YahooFinanceProvider;
use services::{
    chart_service, performance_service, price_service::PriceService,
    universe_service::UniverseService, view_service,
};
use storage::universe_cache::UniverseCache;

/// Main entry point for the dashboard core library.
///
/// Owns the configuration, the external data sources and the in-process
/// quote memoization. The presentation layer drives the pipeline —
/// universe → prices → view → performance — through the methods here and
/// renders whatever plain data comes back; no method ever panics the
/// process over a provider outage.
#[must_use]
pub struct StockDashboard {
    settings: DashboardSettings,
    universe_service: UniverseService,
    price_service: PriceService,
    universe_cache: UniverseCache,
    quote_cache: QuoteCache,
}

impl std::fmt::Debug for StockDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockDashboard")
            .field("settings", &self.settings)
            .field("memoized_requests", &self.quote_cache.len())
            .finish()
    }
}

impl StockDashboard {
    /// Dashboard wired to the default external sources: Investing.com for
    /// index constituents, Yahoo Finance for close prices.
    pub fn new(settings: DashboardSettings) -> Result<Self, CoreError> {
        let quotes = Box::new(YahooFinanceProvider::new()?);
        let source = Box::new(InvestingProvider::new());
        Ok(Self::with_providers(settings, source, quotes))
    }

    /// Dashboard with explicit sources. Tests inject mock providers here.
    pub fn with_providers(
        settings: DashboardSettings,
        source: Box<dyn ConstituentProvider>,
        quotes: Box<dyn QuoteProvider>,
    ) -> Self {
        let universe_service =
            UniverseService::new(source, settings.index.clone(), settings.country.clone());
        let universe_cache = UniverseCache::new(settings.universe_cache_path.clone());
        Self {
            settings,
            universe_service,
            price_service: PriceService::new(quotes),
            universe_cache,
            quote_cache: QuoteCache::new(),
        }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    // ── Universe ────────────────────────────────────────────────────

    /// Resolve the index universe from the external source, degrading to
    /// the fixed fallback list on any provider failure. Never fails, does
    /// not touch the cache artifact.
    pub async fn resolve_universe(&self) -> SymbolUniverse {
        self.universe_service.resolve_universe().await
    }

    /// The canonical universe for loads: read from the cache artifact, or
    /// — when the artifact is absent or malformed — resolve from the
    /// source, persist, and return that.
    pub async fn load_universe(&self) -> SymbolUniverse {
        match self.universe_cache.load() {
            Ok(universe) => {
                debug!(
                    symbols = universe.len(),
                    path = %self.universe_cache.path().display(),
                    "loaded universe from cache artifact"
                );
                universe
            }
            Err(e) => {
                debug!(error = %e, "universe cache miss; resolving from source");
                let universe = self.universe_service.resolve_universe().await;
                self.persist_universe(&universe);
                universe
            }
        }
    }

    /// Force re-resolution and overwrite the cache artifact regardless of
    /// its state. The dashboard calls this once at startup so the artifact
    /// tracks the live index; interactive reloads go through
    /// [`Self::load_universe`].
    pub async fn refresh_universe(&self) -> SymbolUniverse {
        let universe = self.universe_service.resolve_universe().await;
        self.persist_universe(&universe);
        universe
    }

    fn persist_universe(&self, universe: &SymbolUniverse) {
        // A failed write only costs a re-resolution on the next run
        if let Err(e) = self.universe_cache.save(universe) {
            warn!(
                error = %e,
                path = %self.universe_cache.path().display(),
                "failed to persist universe cache artifact"
            );
        }
    }

    // ── Prices ──────────────────────────────────────────────────────

    /// Close-price matrix for `symbols` over the configured historical
    /// range, memoized per exact request. Provider failure degrades to an
    /// empty matrix; `Err` means the request itself was invalid.
    pub async fn load_prices(&mut self, symbols: &[Symbol]) -> Result<PriceMatrix, CoreError> {
        let (start, end) = (self.settings.history_start, self.settings.history_end);
        self.load_prices_between(symbols, start, end).await
    }

    /// Same as [`Self::load_prices`] with an explicit date range.
    pub async fn load_prices_between(
        &mut self,
        symbols: &[Symbol],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceMatrix, CoreError> {
        self.price_service
            .load_prices(&mut self.quote_cache, symbols, start, end)
            .await
    }

    /// Number of distinct price requests currently memoized.
    pub fn memoized_requests(&self) -> usize {
        self.quote_cache.len()
    }

    // ── View & performance ──────────────────────────────────────────

    /// Apply the user's symbol selection and date sub-range to a loaded
    /// matrix. Rejected selections leave the caller's current view intact.
    pub fn filter_view(
        &self,
        matrix: &PriceMatrix,
        symbols: Option<&[Symbol]>,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<PriceMatrix, CoreError> {
        view_service::filter_view(matrix, symbols, range)
    }

    /// Per-asset and equal-weight portfolio returns over a filtered view,
    /// at the configured notional per asset.
    pub fn compute_performance(&self, view: &PriceMatrix) -> Result<PerformanceReport, CoreError> {
        performance_service::compute_performance(view, self.settings.notional_per_asset)
    }

    /// Chart-ready line series for a filtered view, one per column.
    pub fn chart_series(&self, view: &PriceMatrix) -> Vec<ChartSeries> {
        chart_service::chart_series(view)
    }
}
