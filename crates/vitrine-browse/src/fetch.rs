//! Fetch pipelines run on spawned tasks.

use std::sync::Arc;

use vitrine_client::{CatalogApi, ClientError, FilterCriteria};
use vitrine_core::{dedupe_by_id, dedupe_values, Product, PRODUCT_FIELD};

use crate::matching::retain_exact_name_matches;

/// One server-side page plus the catalog size.
#[derive(Debug)]
pub(crate) struct CatalogPage {
    pub total: usize,
    pub products: Vec<Product>,
}

/// Loads one page of the unfiltered catalog.
///
/// The server pages by position in its raw id listing, repeats included, so
/// the catalog size is the length of that listing. It is only requested when
/// `known_total` is `None`. Ids and items are deduplicated within the page.
pub(crate) async fn fetch_catalog_page(
    api: Arc<dyn CatalogApi>,
    known_total: Option<usize>,
    offset: usize,
    limit: usize,
) -> Result<CatalogPage, ClientError> {
    let total = match known_total {
        Some(total) => total,
        None => api.list_ids(None, None).await?.len(),
    };
    let ids = dedupe_values(api.list_ids(Some(offset), Some(limit)).await?);
    let products = dedupe_by_id(api.fetch_items(&ids).await?);
    Ok(CatalogPage { total, products })
}

/// Resolves `criteria` to the full, deduplicated set of matching products.
pub(crate) async fn fetch_filtered(
    api: Arc<dyn CatalogApi>,
    criteria: FilterCriteria,
) -> Result<Vec<Product>, ClientError> {
    let ids = dedupe_values(api.filter_ids(&criteria).await?);
    let items = dedupe_by_id(api.fetch_items(&ids).await?);
    if criteria.field == PRODUCT_FIELD {
        Ok(retain_exact_name_matches(items, &criteria.value.to_string()))
    } else {
        Ok(items)
    }
}
