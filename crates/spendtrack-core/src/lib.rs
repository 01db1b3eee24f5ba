//! Core library for the spendtrack personal-finance client.
//!
//! This crate holds everything front ends share:
//!
//! - `auth`: bearer-token session management with expiry watching
//! - `api`: typed REST client for the spendtrack backend
//! - `models`: transaction, budget, category, and account types
//! - `storage`: persistent token storage
//! - `nav`: the redirect seam used when a session ends
//! - `config`: application configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod nav;
pub mod storage;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{Session, TokenWatch};
pub use config::Config;
pub use nav::Navigator;
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
