use crate::models::config::{default_log_level, Config};

#[test]
fn empty_config_uses_defaults() {
    let config = serde_yaml::from_str::<Config>("{}").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.log_level, default_log_level());
}

#[test]
fn override_library_and_log_level() {
    let input_config = r#"
    library: ./operators.yaml
    log_level: debug
  "#;
    let config = serde_yaml::from_str::<Config>(input_config).unwrap();
    assert_eq!(config.library.as_deref(), Some("./operators.yaml"));
    assert_eq!(config.log_level, "debug");
}

#[test]
fn error_unknown_field() {
    let input_config = r#"
    library: ./operators.yaml
    home_dir: ./.opflow
  "#;
    let error = serde_yaml::from_str::<Config>(input_config).unwrap_err();
    assert!(error.to_string().contains("unknown field `home_dir`"));
}
