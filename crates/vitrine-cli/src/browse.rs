//! Command handlers. Each builds what it needs from the loaded config and
//! prints to stdout; diagnostics go to the log on stderr.

use std::sync::Arc;

use anyhow::Context;
use vitrine_browse::{
    prepare_filter_values, BrowseSettings, CatalogOrchestrator, FilterPhase, ListingPhase,
};
use vitrine_client::{CatalogApi, CatalogClient};
use vitrine_core::{AppConfig, FilterValue, PRICE_FIELD};

use crate::render;

pub(crate) fn connect(config: &AppConfig) -> anyhow::Result<Arc<dyn CatalogApi>> {
    let client = CatalogClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build catalog client: {e}"))?;
    tracing::debug!(endpoint = %client.endpoint(), "catalog client ready");
    Ok(Arc::new(client))
}

fn settings(config: &AppConfig, page_size: Option<usize>) -> BrowseSettings {
    let mut settings = BrowseSettings::from_app_config(config);
    if let Some(size) = page_size {
        settings.page_size = size;
    }
    settings
}

/// Loads and prints page `page` of the unfiltered catalog.
pub(crate) async fn run_list(
    api: Arc<dyn CatalogApi>,
    config: &AppConfig,
    page: usize,
    page_size: Option<usize>,
) -> anyhow::Result<()> {
    let mut view = CatalogOrchestrator::new(api, settings(config, page_size));
    view.mount_at_page(page);
    view.settle().await;

    if let ListingPhase::Failed { error_id } = view.listing_phase() {
        anyhow::bail!("could not load the catalog (error id {error_id})");
    }
    println!("{}", render::product_page(view.visible_products(), &view.page()));
    Ok(())
}

pub(crate) async fn run_fields(api: &dyn CatalogApi) -> anyhow::Result<()> {
    let fields = api.list_fields().await.context("could not load fields")?;
    for field in fields {
        println!("{field}");
    }
    Ok(())
}

/// Prints the distinct values of `field`, prices in ascending order.
pub(crate) async fn run_values(api: &dyn CatalogApi, field: &str) -> anyhow::Result<()> {
    let raw = api
        .list_field_values(field, None, None)
        .await
        .with_context(|| format!("could not load values for {field}"))?;
    for value in prepare_filter_values(field, raw) {
        println!("{value}");
    }
    Ok(())
}

/// Applies `field == value` and prints page `page` of the matches.
pub(crate) async fn run_filter(
    api: Arc<dyn CatalogApi>,
    config: &AppConfig,
    field: &str,
    value: &str,
    page: usize,
    page_size: Option<usize>,
) -> anyhow::Result<()> {
    let settings = settings(config, page_size);
    let size = settings.page_size;
    let mut view = CatalogOrchestrator::new(api, settings);
    view.mount();
    view.on_field_change(field);
    view.settle().await;

    if field == PRICE_FIELD {
        let price: f64 = value
            .parse()
            .with_context(|| format!("price must be a number, got {value:?}"))?;
        view.on_range_submit(price);
    } else {
        view.on_value_change(FilterValue::from(value));
        view.on_apply_filter();
    }
    view.settle().await;

    if let FilterPhase::Failed { error_id } = view.filter_phase() {
        anyhow::bail!("could not apply filter {field}={value} (error id {error_id})");
    }
    if page > 1 {
        view.on_page_change(page, size);
    }
    println!("{}", render::product_page(view.visible_products(), &view.page()));
    Ok(())
}
