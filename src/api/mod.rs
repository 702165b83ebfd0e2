//! REST API client module for the TaskDeck backend.
//!
//! This module provides the `ApiClient` and the typed endpoint APIs built on
//! top of it (`AuthApi`, `TasksApi`).
//!
//! The API uses JWT bearer authentication. Expired access tokens are renewed
//! transparently: a 401 on a non-auth endpoint triggers a single renewal call
//! no matter how many requests fail concurrently, and every affected request
//! is replayed with the renewed token or failed uniformly.

pub mod auth;
pub mod client;
pub mod error;
mod refresh;
pub mod tasks;

pub use auth::AuthApi;
pub use client::ApiClient;
pub use error::ApiError;
pub use tasks::TasksApi;
