//! Client for the remote catalog API.
//!
//! The remote service exposes a single `POST` endpoint that dispatches on an
//! `action` name. [`CatalogClient`] wraps it with per-call date-based auth and a
//! bounded retry policy, and implements [`CatalogApi`] so callers can swap in a
//! fake.

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod types;

mod retry;

pub use api::CatalogApi;
pub use auth::{auth_token, AUTH_HEADER};
pub use client::{CatalogClient, ClientSettings};
pub use error::ClientError;
pub use types::FilterCriteria;
