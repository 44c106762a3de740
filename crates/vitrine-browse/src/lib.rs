//! Catalog browsing orchestration.
//!
//! [`CatalogOrchestrator`] owns the page and filter state of one catalog view
//! and reconciles server-side paging, user-driven filtering and retries
//! against an unreliable backend. Network work runs on spawned tasks whose
//! completions are applied back on the task that owns the orchestrator, so
//! state is only ever mutated from one place.

pub mod controls;
pub mod matching;
pub mod orchestrator;
pub mod state;

mod fetch;

pub use controls::{FieldSelector, FilterControls, PriceRange, ValueControl};
pub use matching::{prepare_filter_values, retain_exact_name_matches};
pub use orchestrator::{BrowseSettings, CatalogOrchestrator};
pub use state::{FilterPhase, ListingMode, ListingPhase, ProductState};
