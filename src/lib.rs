//! TaskDeck client - a Rust client library for the TaskDeck task manager API.
//!
//! The library covers account registration and login, durable session
//! persistence with silent access-token renewal, and CRUD operations over the
//! task resource.
//!
//! # Example
//!
//! ```no_run
//! use taskdeck::{ApiClient, Config, LoginRequest, Session};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let client = ApiClient::from_config(&config)?;
//!
//! let mut session = Session::new(client.clone());
//! session.initialize();
//! if !session.is_authenticated() {
//!     session
//!         .login(&LoginRequest {
//!             email: "ada@example.com".to_string(),
//!             password: "secret".to_string(),
//!         })
//!         .await?;
//! }
//!
//! let page = client.tasks().list(1).await?;
//! for task in &page.results {
//!     println!("[{}] {}", if task.completed { "x" } else { " " }, task.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! An access token rejected mid-flight is renewed transparently: no matter
//! how many requests hit the stale token at once, a single renewal call is
//! made and every affected request is replayed with the new token, or failed
//! uniformly if the renewal is rejected.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, AuthApi, TasksApi};
pub use auth::{Session, TokenStore};
pub use config::Config;
pub use models::{
    AuthResponse, LoginRequest, NewTask, Paginated, RegisterRequest, RegisterResponse, Task,
    TaskStats, TaskUpdate, TokenPair, User,
};
