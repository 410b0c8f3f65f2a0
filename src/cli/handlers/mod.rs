//! CLI command handlers.

pub mod auth;
pub mod jobs;
pub mod notebook;
