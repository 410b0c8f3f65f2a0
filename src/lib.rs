pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod init;
pub mod mapper;
pub mod mcp;
pub mod models;
pub mod poller;
pub mod progress;
pub mod rpc;

pub use error::NblmError;
