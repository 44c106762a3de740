//! Filter selection state shared between the orchestrator and the controls
//! that render it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric field that drives a range control instead of a value list.
pub const PRICE_FIELD: &str = "price";

/// Name field that gets an extra client-side exact match after the
/// server-side filter.
pub const PRODUCT_FIELD: &str = "product";

/// A distinct field value as reported by `get_fields`, or a user selection.
///
/// Numbers keep their original JSON representation so a selected price is sent
/// back to the server exactly as it was received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(serde_json::Number),
    Text(String),
}

impl FilterValue {
    /// Numeric view of the value. Text values are never coerced.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FilterValue::Number(n) => n.as_f64(),
            FilterValue::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            FilterValue::Number(_) => None,
        }
    }

    /// Builds a numeric value, returning `None` for NaN or infinities.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        serde_json::Number::from_f64(value).map(FilterValue::Number)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value.into())
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Number(n) => write!(f, "{n}"),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

/// Filter selection and loading flags for the catalog view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Filterable field names, in server order.
    pub fields: Vec<String>,
    pub selected_field: Option<String>,
    /// Distinct values of `selected_field`.
    pub filter_values: Vec<FilterValue>,
    pub selected_value: Option<FilterValue>,
    pub loading_fields: bool,
    pub loading_values: bool,
    /// True from filter submission until it succeeds, fails for good, or is
    /// superseded.
    pub is_applying_filter: bool,
}

impl FilterState {
    /// Switches the selected field. The selected value and the value list
    /// always reset, even when the same field is picked again.
    pub fn select_field(&mut self, field: impl Into<String>) {
        self.selected_field = Some(field.into());
        self.selected_value = None;
        self.filter_values.clear();
    }

    #[must_use]
    pub fn is_price_selected(&self) -> bool {
        self.selected_field.as_deref() == Some(PRICE_FIELD)
    }

    /// Field and value are both set and no apply is in flight.
    #[must_use]
    pub fn can_apply(&self) -> bool {
        self.selected_field.is_some() && self.selected_value.is_some() && !self.is_applying_filter
    }
}
