pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod mcp;
pub mod models;
pub mod store;

pub use error::{Error, Result};
