mod telemetry;
pub use telemetry::{init_logging, init_logging_closure, log_filter};
use opflow_types::thiserror;

#[derive(opflow_types::thiserror::Error, Debug)]
pub enum TracingError {
    #[error("Invalid log filter {0}: {1}")]
    InvalidFilter(String, #[source] tracing_subscriber::filter::ParseError),
}

#[cfg(test)]
mod tests;
