pub mod auth;
pub mod chat;
pub mod notebook;
pub mod research;
pub mod source;
pub mod studio;
