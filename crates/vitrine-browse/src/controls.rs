//! View model for the filter bar.
//!
//! Derived from [`FilterState`] on demand; holds no state of its own. User
//! input goes back through the orchestrator's `on_*` handlers.

use vitrine_core::{FilterState, FilterValue};

/// Bounds used by the price range before any values have loaded.
const FALLBACK_PRICE_MIN: f64 = 1.0;
const FALLBACK_PRICE_MAX: f64 = 10_000_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSelector {
    pub options: Vec<String>,
    pub selected: Option<String>,
    pub disabled: bool,
    pub loading: bool,
}

/// Slider plus numeric input for the price field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

impl PriceRange {
    /// Bounds from the numeric entries of `values`, starting at `selected`
    /// when it is numeric, else at the minimum.
    #[must_use]
    pub fn from_values(values: &[FilterValue], selected: Option<&FilterValue>) -> Self {
        let mut numbers = values.iter().filter_map(FilterValue::as_f64);
        let (min, max) = match numbers.next() {
            Some(first) => numbers.fold((first, first), |(lo, hi), n| (lo.min(n), hi.max(n))),
            None => (FALLBACK_PRICE_MIN, FALLBACK_PRICE_MAX),
        };
        let mut range = Self {
            min,
            max,
            value: min,
        };
        if let Some(v) = selected.and_then(FilterValue::as_f64) {
            range.value = range.clamp(v);
        }
        range
    }

    /// Pulls typed input back inside `min..=max`. NaN maps to `min`.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueControl {
    Select {
        options: Vec<FilterValue>,
        selected: Option<FilterValue>,
        disabled: bool,
        loading: bool,
    },
    Range {
        range: PriceRange,
        disabled: bool,
        loading: bool,
    },
}

impl ValueControl {
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        match self {
            ValueControl::Select { disabled, .. } | ValueControl::Range { disabled, .. } => {
                *disabled
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterControls {
    pub field_selector: FieldSelector,
    pub value_control: ValueControl,
    pub apply_disabled: bool,
}

impl FilterControls {
    #[must_use]
    pub fn from_state(state: &FilterState) -> Self {
        let applying = state.is_applying_filter;
        let value_disabled = state.selected_field.is_none() || applying;

        let value_control = if state.is_price_selected() {
            ValueControl::Range {
                range: PriceRange::from_values(
                    &state.filter_values,
                    state.selected_value.as_ref(),
                ),
                disabled: value_disabled,
                loading: state.loading_values,
            }
        } else {
            ValueControl::Select {
                options: state.filter_values.clone(),
                selected: state.selected_value.clone(),
                disabled: value_disabled,
                loading: state.loading_values,
            }
        };

        Self {
            field_selector: FieldSelector {
                options: state.fields.clone(),
                selected: state.selected_field.clone(),
                disabled: applying,
                loading: state.loading_fields,
            },
            value_control,
            apply_disabled: !state.can_apply(),
        }
    }
}
