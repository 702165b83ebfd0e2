//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `TokenStore`: durable persistence for the token pair and user record
//! - `Session`: in-memory authenticated-user state with login/logout actions
//!
//! Session entries are persisted under the application data directory and
//! survive restarts; access tokens are renewed by the request pipeline when
//! the server rejects them.

pub mod session;
pub mod token_store;

pub use session::Session;
pub use token_store::TokenStore;
