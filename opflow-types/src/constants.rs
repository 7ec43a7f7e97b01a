pub const DEFAULT_CONFIG_PATH: &str = "opflow.yaml";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Key of the operator every process is rooted at.
pub const ROOT_OPERATOR_KEY: &str = "process";

pub const ROOT_OPERATOR_NAME: &str = "Process";

pub const MAIN_PROCESS_NAME: &str = "Main Process";
