//! Domain model and shared utilities for the vitrine catalog browser.
//!
//! Holds the product and filter types exchanged between the remote client and
//! the orchestrator, pagination math, id-based deduplication, correlation ids
//! for diagnostics, and environment-driven configuration.

pub mod app_config;
pub mod config;
pub mod dedup;
pub mod diagnostics;
pub mod filter;
pub mod pagination;
pub mod products;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use dedup::{dedupe_by_id, dedupe_values, HasId};
pub use diagnostics::ErrorId;
pub use filter::{FilterState, FilterValue, PRICE_FIELD, PRODUCT_FIELD};
pub use pagination::{PageState, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use products::Product;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
