//! Shared formatting helpers.

pub mod format;

pub use format::{format_date, format_date_short, relative_date};
