//! REST API client module for the spendtrack backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! backend to manage transactions, budgets, categories, and account
//! data.
//!
//! The API uses JWT bearer token authentication obtained from the
//! token endpoint at login; the attached `Session` decides per request
//! whether a token still accompanies it.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
