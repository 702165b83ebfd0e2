//! Data models for the TaskDeck API.
//!
//! This module contains the wire types exchanged with the backend:
//!
//! - `User` and the authentication request/response bodies
//! - `Task` plus its create/update bodies and the pagination envelope
//! - `TaskStats`: derived counts for display

pub mod task;
pub mod user;

pub use task::{NewTask, Paginated, Task, TaskStats, TaskUpdate};
pub use user::{
    AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, RegisterResponse, TokenPair, User,
};
