use crate::constants::DEFAULT_LOG_LEVEL;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
/// The configuration of the opflow command line
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// path of an operator library yaml; the built-in library is used when omitted
    pub library: Option<String>,

    #[serde(default = "default_log_level")]
    /// log filter used when `RUST_LOG` is not set; Default: info
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library: None,
            log_level: default_log_level(),
        }
    }
}

pub fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
