use crate::{init_logging_closure, log_filter, TracingError};
use opflow_types::tracing::info;

#[test]
fn test_log_filter_levels() {
    if std::env::var("RUST_LOG").is_ok() {
        return;
    }
    assert!(log_filter(None).is_ok());
    assert!(log_filter(Some("debug")).is_ok());
    assert!(log_filter(Some("opflow_core=trace,warn")).is_ok());
    assert!(matches!(
        log_filter(Some("opflow_core=loud")),
        Err(TracingError::InvalidFilter(level, _)) if level == "opflow_core=loud"
    ));
}

#[test]
fn test_closure_returns_value() {
    let value = init_logging_closure(Some("info"), || {
        info!("inside closure");
        42
    });
    if std::env::var("RUST_LOG").is_err() {
        assert_eq!(value.unwrap(), 42);
    }
}
