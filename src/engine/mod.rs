//! Scope resolution and rule merging.
//!
//! Everything here is pure: callers hand in the manifest and the loaded rules,
//! and get back the resolved scopes, filtered rules, or rendered text.

mod matcher;
mod resolver;
pub mod size;

pub use matcher::*;
pub use resolver::*;
