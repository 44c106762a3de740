//! Observable state of a catalog view.

use vitrine_client::FilterCriteria;
use vitrine_core::{ErrorId, PageState, Product};

/// Progress of the unfiltered page listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingPhase {
    Idle,
    Loading,
    Loaded,
    /// A fetch failed; another attempt is scheduled.
    ErrorPending { error_id: ErrorId, attempt: u32 },
    /// Retries are exhausted. The view shows an empty list.
    Failed { error_id: ErrorId },
}

impl ListingPhase {
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, ListingPhase::Loading | ListingPhase::ErrorPending { .. })
    }
}

/// Progress of the filter selection and its application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPhase {
    Unfiltered,
    /// A field is chosen but its values are not (or could not be) loaded.
    FieldSelected,
    ValuesLoading,
    ValuesLoaded,
    Applying,
    Applied,
    /// An apply failed; another attempt is scheduled.
    ErrorPending { error_id: ErrorId, attempt: u32 },
    /// Apply retries are exhausted. Previously shown products stay visible.
    Failed { error_id: ErrorId },
}

/// What the product list currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingMode {
    /// One server-side page of the unfiltered catalog.
    Catalog,
    /// The full result of an applied filter, paged client-side.
    Filtered(FilterCriteria),
}

/// Products and page metadata handed to the list and pagination views.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductState {
    /// In catalog mode, exactly the current page; in filtered mode, the whole
    /// filtered set.
    pub products: Vec<Product>,
    pub page: PageState,
    pub is_loading: bool,
}

impl ProductState {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            products: Vec::new(),
            page: PageState::new(page_size),
            is_loading: false,
        }
    }

    /// Items for the current page, given how `products` was materialized.
    #[must_use]
    pub fn visible<'a>(&'a self, mode: &ListingMode) -> &'a [Product] {
        match mode {
            ListingMode::Catalog => &self.products,
            ListingMode::Filtered(_) => self.page.slice(&self.products),
        }
    }
}
