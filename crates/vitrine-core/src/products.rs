use serde::{Deserialize, Serialize};

use crate::dedup::HasId;

/// A catalog item as returned by the remote `get_items` action.
///
/// Only `id` is guaranteed. Every other attribute may be missing or `null`
/// upstream and is kept as `None` ("unknown") rather than coerced to an empty
/// string or zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub brand: Option<String>,
}

impl Product {
    /// Creates a product with only its id known.
    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            product: None,
            price: None,
            brand: None,
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.product = Some(name.into());
        self
    }

    #[must_use]
    pub fn priced(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn branded(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }
}

impl HasId for Product {
    fn id(&self) -> &str {
        &self.id
    }
}
