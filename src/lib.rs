pub mod cache;
pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod notion;
pub mod revalidate;
pub mod server;
