//! The catalog view state machine.
//!
//! Two independent sub-machines share one owner:
//!
//! - **listing**: loads one server-side page per page-number or page-size
//!   change, retrying a failed page after a fixed delay up to a bound;
//! - **filtering**: loads distinct values for the chosen field and applies a
//!   field/value filter, retrying a failed apply the same way but never
//!   clearing what is already on screen.
//!
//! Handlers (`on_*`) mutate state synchronously and spawn any network work.
//! Each spawned task reports back through a channel; [`CatalogOrchestrator::step`]
//! applies one report at a time. Reports carry the generation they were started
//! under, and reports from a superseded generation are dropped, so a slow
//! response can never overwrite newer state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinSet};
use vitrine_client::{CatalogApi, ClientError, FilterCriteria};
use vitrine_core::{
    AppConfig, ErrorId, FilterState, FilterValue, PageState, Product, DEFAULT_PAGE_SIZE,
};

use crate::controls::FilterControls;
use crate::fetch::{fetch_catalog_page, fetch_filtered, CatalogPage};
use crate::matching::prepare_filter_values;
use crate::state::{FilterPhase, ListingMode, ListingPhase, ProductState};

/// Retry and paging knobs for [`CatalogOrchestrator`].
#[derive(Debug, Clone)]
pub struct BrowseSettings {
    /// Whole-operation retries after the first failure, for listing and for
    /// applying a filter. Client-level retries happen inside each attempt.
    pub max_retries: u32,
    /// Fixed delay before a scheduled retry.
    pub retry_delay: Duration,
    pub page_size: usize,
}

impl Default for BrowseSettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl BrowseSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_retries: config.browse_max_retries,
            retry_delay: Duration::from_millis(config.browse_retry_delay_ms),
            page_size: config.page_size,
        }
    }
}

/// Results posted back by spawned work.
#[derive(Debug)]
enum Completion {
    Page {
        generation: u64,
        result: Result<CatalogPage, ClientError>,
    },
    ListingRetryDue {
        generation: u64,
    },
    Fields(Result<Vec<String>, ClientError>),
    Values {
        generation: u64,
        field: String,
        result: Result<Vec<Option<FilterValue>>, ClientError>,
    },
    Applied {
        generation: u64,
        result: Result<Vec<Product>, ClientError>,
    },
    ApplyRetryDue {
        generation: u64,
    },
}

/// Owner of one catalog view's page and filter state.
///
/// Dropping the orchestrator aborts every in-flight fetch and scheduled retry.
pub struct CatalogOrchestrator {
    api: Arc<dyn CatalogApi>,
    settings: BrowseSettings,

    products: ProductState,
    filter: FilterState,
    mode: ListingMode,
    listing: ListingPhase,
    filtering: FilterPhase,
    /// Length of the raw unfiltered id listing, once known.
    catalog_total: Option<usize>,

    listing_generation: u64,
    listing_attempt: u32,
    listing_retry: Option<AbortHandle>,

    values_generation: u64,

    apply_generation: u64,
    apply_attempt: u32,
    apply_retry: Option<AbortHandle>,
    pending_apply: Option<FilterCriteria>,

    tasks: JoinSet<()>,
    events_tx: mpsc::UnboundedSender<Completion>,
    events_rx: mpsc::UnboundedReceiver<Completion>,
}

impl std::fmt::Debug for CatalogOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogOrchestrator")
            .field("products", &self.products)
            .field("filter", &self.filter)
            .field("mode", &self.mode)
            .field("listing", &self.listing)
            .field("filtering", &self.filtering)
            .field("pending_tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl CatalogOrchestrator {
    /// Creates an idle view. Nothing is fetched until [`Self::mount`].
    #[must_use]
    pub fn new(api: Arc<dyn CatalogApi>, settings: BrowseSettings) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            products: ProductState::new(settings.page_size),
            settings,
            filter: FilterState::default(),
            mode: ListingMode::Catalog,
            listing: ListingPhase::Idle,
            filtering: FilterPhase::Unfiltered,
            catalog_total: None,
            listing_generation: 0,
            listing_attempt: 0,
            listing_retry: None,
            values_generation: 0,
            apply_generation: 0,
            apply_attempt: 0,
            apply_retry: None,
            pending_apply: None,
            tasks: JoinSet::new(),
            events_tx,
            events_rx,
        }
    }

    // ---------------------------------------------------------------------
    // Observable state
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn product_state(&self) -> &ProductState {
        &self.products
    }

    #[must_use]
    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub fn page(&self) -> PageState {
        self.products.page
    }

    #[must_use]
    pub fn mode(&self) -> &ListingMode {
        &self.mode
    }

    #[must_use]
    pub fn listing_phase(&self) -> ListingPhase {
        self.listing
    }

    #[must_use]
    pub fn filter_phase(&self) -> FilterPhase {
        self.filtering
    }

    /// Products for the current page.
    #[must_use]
    pub fn visible_products(&self) -> &[Product] {
        self.products.visible(&self.mode)
    }

    /// Widget state for the filter bar.
    #[must_use]
    pub fn controls(&self) -> FilterControls {
        FilterControls::from_state(&self.filter)
    }

    /// True while any fetch or scheduled retry is outstanding.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        !self.tasks.is_empty()
    }

    // ---------------------------------------------------------------------
    // User events
    // ---------------------------------------------------------------------

    /// Starts the initial page load and the field list load.
    pub fn mount(&mut self) {
        self.mount_at_page(1);
    }

    /// Like [`Self::mount`], but the first load is `page_number` rather than
    /// page 1.
    pub fn mount_at_page(&mut self, page_number: usize) {
        self.products.page.page_number = page_number.max(1);
        self.start_listing();

        self.filter.loading_fields = true;
        let api = Arc::clone(&self.api);
        self.spawn(async move { Completion::Fields(api.list_fields().await) });
    }

    /// Moves to `page_number` with `page_size` items per page.
    ///
    /// In catalog mode this fetches the page. With a filter applied the
    /// filtered set is already loaded and is re-sliced instead.
    pub fn on_page_change(&mut self, page_number: usize, page_size: usize) {
        if page_size == 0 {
            tracing::warn!("ignoring page change to a zero page size");
            return;
        }
        self.products.page.page_number = page_number.max(1);
        self.products.page.page_size = page_size;
        if matches!(self.mode, ListingMode::Catalog) {
            self.start_listing();
        }
    }

    /// Changes the page size, keeping the page number within range.
    pub fn on_page_size_change(&mut self, page_size: usize) {
        if page_size == 0 {
            tracing::warn!("ignoring zero page size");
            return;
        }
        self.products.page.page_size = page_size;
        self.products.page.clamp_page();
        if matches!(self.mode, ListingMode::Catalog) {
            self.start_listing();
        }
    }

    /// Selects `field`, clears the selected value and loads its distinct values.
    pub fn on_field_change(&mut self, field: impl Into<String>) {
        let field = field.into();
        self.supersede_apply();
        self.filter.select_field(field.clone());
        self.filtering = FilterPhase::ValuesLoading;
        self.filter.loading_values = true;

        self.values_generation += 1;
        let generation = self.values_generation;
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.list_field_values(&field, None, None).await;
            Completion::Values {
                generation,
                field,
                result,
            }
        });
    }

    /// Records the selected value. Never fetches.
    pub fn on_value_change(&mut self, value: FilterValue) {
        if self.filter.selected_field.is_none() {
            tracing::debug!(%value, "ignoring value selected without a field");
            return;
        }
        self.supersede_apply();
        self.filter.selected_value = Some(value);
    }

    /// Applies the selected field/value filter.
    ///
    /// No-op while an apply is in flight or when field or value is unset.
    pub fn on_apply_filter(&mut self) {
        if self.filter.is_applying_filter {
            tracing::debug!("apply already in flight, dropping duplicate submit");
            return;
        }
        let (Some(field), Some(value)) = (&self.filter.selected_field, &self.filter.selected_value)
        else {
            return;
        };

        let criteria = FilterCriteria::new(field.clone(), value.clone());
        tracing::info!(field = %criteria.field, value = %criteria.value, "applying filter");
        self.filter.is_applying_filter = true;
        self.apply_generation += 1;
        self.apply_attempt = 0;
        self.pending_apply = Some(criteria);
        self.launch_apply();
    }

    /// Numeric input submit: selects `value` and applies, like pressing apply.
    pub fn on_range_submit(&mut self, value: f64) {
        if self.filter.is_applying_filter {
            return;
        }
        match FilterValue::from_f64(value) {
            Some(value) => {
                self.on_value_change(value);
                self.on_apply_filter();
            }
            None => tracing::warn!(value, "ignoring non-finite range value"),
        }
    }

    /// Drops the active filter and selection and reloads the first catalog page.
    pub fn on_clear_filter(&mut self) {
        self.supersede_apply();
        self.values_generation += 1;
        self.filter.selected_field = None;
        self.filter.selected_value = None;
        self.filter.filter_values.clear();
        self.filter.loading_values = false;
        self.filtering = FilterPhase::Unfiltered;

        self.mode = ListingMode::Catalog;
        self.products.page.page_number = 1;
        self.products.page.total = self.catalog_total.unwrap_or(0);
        self.start_listing();
    }

    // ---------------------------------------------------------------------
    // Event loop
    // ---------------------------------------------------------------------

    /// Waits for and applies the next completion.
    ///
    /// Returns `false` once no work is outstanding.
    pub async fn step(&mut self) -> bool {
        enum Wake {
            Event(Completion),
            Reaped,
        }

        loop {
            if let Ok(event) = self.events_rx.try_recv() {
                self.handle(event);
                return true;
            }
            if self.tasks.is_empty() {
                return false;
            }

            let wake = tokio::select! {
                Some(event) = self.events_rx.recv() => Wake::Event(event),
                Some(joined) = self.tasks.join_next() => {
                    if let Err(e) = joined {
                        if e.is_panic() {
                            tracing::error!(error = %e, "catalog task panicked");
                        }
                    }
                    Wake::Reaped
                }
                else => return false,
            };

            if let Wake::Event(event) = wake {
                self.handle(event);
                return true;
            }
        }
    }

    /// Applies completions until nothing is outstanding, including scheduled
    /// retries.
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn spawn<F>(&mut self, work: F) -> AbortHandle
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let tx = self.events_tx.clone();
        self.tasks.spawn(async move {
            // The receiver lives as long as the orchestrator, which also owns
            // this task; a failed send only happens during teardown.
            let _ = tx.send(work.await);
        })
    }

    fn schedule(&mut self, event: Completion) -> AbortHandle {
        let delay = self.settings.retry_delay;
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            event
        })
    }

    fn refresh_loading(&mut self) {
        self.products.is_loading = self.listing.is_busy() || self.filter.is_applying_filter;
    }

    fn cancel_listing_retry(&mut self) {
        if let Some(handle) = self.listing_retry.take() {
            handle.abort();
        }
    }

    fn cancel_apply_retry(&mut self) {
        if let Some(handle) = self.apply_retry.take() {
            handle.abort();
        }
    }

    /// Begins a fresh listing generation, invalidating any in-flight page.
    fn start_listing(&mut self) {
        self.cancel_listing_retry();
        self.listing_generation += 1;
        self.listing_attempt = 0;
        self.launch_listing();
    }

    /// One listing attempt under the current generation.
    fn launch_listing(&mut self) {
        self.listing = ListingPhase::Loading;
        self.refresh_loading();

        let generation = self.listing_generation;
        let api = Arc::clone(&self.api);
        let known_total = self.catalog_total;
        let offset = self.products.page.offset();
        let limit = self.products.page.page_size;
        tracing::debug!(generation, offset, limit, "loading catalog page");
        self.spawn(async move {
            let result = fetch_catalog_page(api, known_total, offset, limit).await;
            Completion::Page { generation, result }
        });
    }

    fn launch_apply(&mut self) {
        let Some(criteria) = self.pending_apply.clone() else {
            return;
        };
        self.filtering = FilterPhase::Applying;
        self.refresh_loading();

        let generation = self.apply_generation;
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = fetch_filtered(api, criteria).await;
            Completion::Applied { generation, result }
        });
    }

    /// Ends an in-flight or retry-pending apply without touching products.
    fn supersede_apply(&mut self) {
        if !self.filter.is_applying_filter {
            return;
        }
        tracing::info!("filter selection changed, abandoning pending apply");
        self.cancel_apply_retry();
        self.apply_generation += 1;
        self.pending_apply = None;
        self.filter.is_applying_filter = false;
        self.filtering = if self.filter.filter_values.is_empty() {
            FilterPhase::FieldSelected
        } else {
            FilterPhase::ValuesLoaded
        };
        self.refresh_loading();
    }

    fn handle(&mut self, event: Completion) {
        match event {
            Completion::Page { generation, result } => self.on_page_loaded(generation, result),
            Completion::ListingRetryDue { generation } => {
                if generation == self.listing_generation
                    && matches!(self.mode, ListingMode::Catalog)
                {
                    self.listing_retry = None;
                    self.launch_listing();
                }
            }
            Completion::Fields(result) => self.on_fields_loaded(result),
            Completion::Values {
                generation,
                field,
                result,
            } => self.on_values_loaded(generation, &field, result),
            Completion::Applied { generation, result } => self.on_applied(generation, result),
            Completion::ApplyRetryDue { generation } => {
                if generation == self.apply_generation && self.filter.is_applying_filter {
                    self.apply_retry = None;
                    self.launch_apply();
                }
            }
        }
    }

    fn on_page_loaded(&mut self, generation: u64, result: Result<CatalogPage, ClientError>) {
        if generation != self.listing_generation || !matches!(self.mode, ListingMode::Catalog) {
            tracing::debug!(
                generation,
                current = self.listing_generation,
                "discarding stale catalog page"
            );
            return;
        }

        match result {
            Ok(page) => {
                self.catalog_total = Some(page.total);
                self.products.page.total = page.total;
                self.products.products = page.products;
                self.listing = ListingPhase::Loaded;
            }
            Err(err) => {
                let error_id = ErrorId::new();
                if self.listing_attempt < self.settings.max_retries {
                    self.listing_attempt += 1;
                    let attempt = self.listing_attempt;
                    tracing::warn!(
                        %error_id,
                        attempt,
                        max_retries = self.settings.max_retries,
                        error = %err,
                        "catalog page failed, scheduling retry"
                    );
                    self.listing = ListingPhase::ErrorPending { error_id, attempt };
                    self.listing_retry = Some(self.schedule(Completion::ListingRetryDue {
                        generation: self.listing_generation,
                    }));
                } else {
                    tracing::error!(
                        %error_id,
                        attempts = self.listing_attempt + 1,
                        error = %err,
                        "catalog page failed, giving up"
                    );
                    self.listing = ListingPhase::Failed { error_id };
                    self.products.products.clear();
                    self.products.page.total = 0;
                }
            }
        }
        self.refresh_loading();
    }

    fn on_fields_loaded(&mut self, result: Result<Vec<String>, ClientError>) {
        self.filter.loading_fields = false;
        match result {
            Ok(fields) => self.filter.fields = fields,
            Err(err) => {
                let error_id = ErrorId::new();
                tracing::error!(%error_id, error = %err, "could not load filter fields");
            }
        }
    }

    fn on_values_loaded(
        &mut self,
        generation: u64,
        field: &str,
        result: Result<Vec<Option<FilterValue>>, ClientError>,
    ) {
        if generation != self.values_generation {
            tracing::debug!(field, "discarding values for a deselected field");
            return;
        }
        self.filter.loading_values = false;
        match result {
            Ok(raw) => {
                self.filter.filter_values = prepare_filter_values(field, raw);
                if !self.filter.is_applying_filter {
                    self.filtering = FilterPhase::ValuesLoaded;
                }
            }
            Err(err) => {
                let error_id = ErrorId::new();
                tracing::error!(%error_id, field, error = %err, "could not load filter values");
                if !self.filter.is_applying_filter {
                    self.filtering = FilterPhase::FieldSelected;
                }
            }
        }
    }

    fn on_applied(&mut self, generation: u64, result: Result<Vec<Product>, ClientError>) {
        if generation != self.apply_generation || !self.filter.is_applying_filter {
            tracing::debug!(generation, "discarding superseded filter result");
            return;
        }

        match result {
            Ok(products) => {
                let criteria = self.pending_apply.take();
                tracing::info!(matches = products.len(), "filter applied");

                // The filtered set replaces whatever the listing was doing.
                self.cancel_listing_retry();
                self.listing_generation += 1;
                self.listing = ListingPhase::Loaded;

                self.products.page.total = products.len();
                self.products.page.page_number = 1;
                self.products.products = products;
                if let Some(criteria) = criteria {
                    self.mode = ListingMode::Filtered(criteria);
                }
                self.filter.is_applying_filter = false;
                self.filtering = FilterPhase::Applied;
            }
            Err(err) => {
                let error_id = ErrorId::new();
                if self.apply_attempt < self.settings.max_retries {
                    self.apply_attempt += 1;
                    let attempt = self.apply_attempt;
                    tracing::warn!(
                        %error_id,
                        attempt,
                        max_retries = self.settings.max_retries,
                        error = %err,
                        "filter apply failed, scheduling retry"
                    );
                    self.filtering = FilterPhase::ErrorPending { error_id, attempt };
                    self.apply_retry = Some(self.schedule(Completion::ApplyRetryDue {
                        generation: self.apply_generation,
                    }));
                } else {
                    tracing::error!(
                        %error_id,
                        attempts = self.apply_attempt + 1,
                        error = %err,
                        "filter apply failed, keeping previous results"
                    );
                    self.pending_apply = None;
                    self.filter.is_applying_filter = false;
                    self.filtering = FilterPhase::Failed { error_id };
                }
            }
        }
        self.refresh_loading();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_app_config() {
        let config = AppConfig {
            api_url: "http://localhost:4000".to_owned(),
            api_password: "pw".to_owned(),
            log_level: "info".to_owned(),
            request_timeout_secs: 30,
            user_agent: "ua".to_owned(),
            client_max_retries: 2,
            client_backoff_base_ms: 250,
            browse_max_retries: 5,
            browse_retry_delay_ms: 1500,
            page_size: 20,
        };
        let settings = BrowseSettings::from_app_config(&config);
        assert_eq!(settings.max_retries, 5);
        assert_eq!(settings.retry_delay, Duration::from_millis(1500));
        assert_eq!(settings.page_size, 20);
    }

    #[test]
    fn default_settings() {
        let settings = BrowseSettings::default();
        assert_eq!(settings.max_retries, 3);
        assert_eq!(settings.retry_delay, Duration::from_secs(2));
        assert_eq!(settings.page_size, 50);
    }
}
