pub mod error;
pub mod progress;
pub mod server;
pub mod tools;
pub mod types;

pub use server::NblmServer;
pub use types::*;
