use async_trait::async_trait;
use vitrine_core::{FilterValue, Product};

use crate::error::ClientError;
use crate::types::FilterCriteria;

/// The four remote catalog operations, as seen by the orchestrator.
///
/// Every operation is idempotent. Implementations retry internally and fail
/// loudly: an `Err` is returned instead of partial or empty data.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Lists product ids. `None` for both bounds lists the whole catalog.
    async fn list_ids(
        &self,
        offset: Option<usize>,
        limit: Option<usize>,
    ) -> Result<Vec<String>, ClientError>;

    /// Fetches items for `ids`. The result may repeat ids and is not
    /// guaranteed to line up with the input.
    async fn fetch_items(&self, ids: &[String]) -> Result<Vec<Product>, ClientError>;

    /// Names of the fields that can be filtered on.
    async fn list_fields(&self) -> Result<Vec<String>, ClientError>;

    /// Raw values of `field`, one per catalog item, `None` where the item has
    /// no value.
    async fn list_field_values(
        &self,
        field: &str,
        offset: Option<usize>,
        limit: Option<usize>,
    ) -> Result<Vec<Option<FilterValue>>, ClientError>;

    /// Ids of items whose `criteria.field` equals `criteria.value` server-side.
    async fn filter_ids(&self, criteria: &FilterCriteria) -> Result<Vec<String>, ClientError>;
}
