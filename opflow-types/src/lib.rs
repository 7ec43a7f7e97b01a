pub mod constants;
pub mod errors;
pub mod models;
#[cfg(test)]
mod tests;

// Re-exports
pub use indexmap;
#[macro_use]
pub extern crate prettytable;
pub use schemars;
pub use serde;
pub use serde_json;
pub use serde_yaml;
pub use thiserror;
pub use tracing;
