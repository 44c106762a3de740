//! Wire types for the catalog API.
//!
//! Every request is `{"action": "...", "params": {...}}` and every successful
//! response is `{"result": ...}`. Optional parameters are omitted rather than
//! sent as `null`.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use vitrine_core::FilterValue;

/// Request envelope.
#[derive(Debug, Serialize)]
pub(crate) struct ApiRequest<'a, P> {
    pub action: &'static str,
    pub params: &'a P,
}

/// Response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub result: T,
}

/// `get_ids` params.
#[derive(Debug, Serialize)]
pub(crate) struct IdsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// `get_items` params.
#[derive(Debug, Serialize)]
pub(crate) struct ItemsParams<'a> {
    pub ids: &'a [String],
}

/// `get_fields` params. Without `field` the action lists field names.
#[derive(Debug, Serialize)]
pub(crate) struct FieldsParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Single-field criteria for the `filter` action.
///
/// Serializes as a one-entry object, e.g. `{"brand": "Piaget"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub field: String,
    pub value: FilterValue,
}

impl FilterCriteria {
    #[must_use]
    pub fn new(field: impl Into<String>, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

impl Serialize for FilterCriteria {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.value)?;
        map.end()
    }
}
