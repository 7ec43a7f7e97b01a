use crate::errors::types::DeserializationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(deny_unknown_fields)]
/// A set of operator descriptions the operator service can instantiate from.
pub struct OperatorLibrary {
    #[serde(default)]
    pub operators: Vec<OperatorDescription>,
}

impl OperatorLibrary {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DeserializationError> {
        serde_yaml::from_str(yaml).map_err(DeserializationError::Yaml)
    }

    pub fn get(&self, key: &str) -> Option<&OperatorDescription> {
        self.operators.iter().find(|description| description.key == key)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
pub struct OperatorDescription {
    /// unique key operators are created by; Type: String
    pub key: String,
    /// display name, also the base of the operator's name in a process
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// prefix of a self-growing group of input ports, e.g. `input` gives `input 1`, `input 2`, ...
    pub input_extender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_extender: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// nested subprocesses; an operator with at least one is a chain
    pub subprocesses: Vec<SubprocessDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// reason the operator cannot be instantiated, e.g. a missing extension
    pub disabled: Option<String>,
}

impl OperatorDescription {
    pub fn new(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            group: String::new(),
            inputs: vec![],
            outputs: vec![],
            input_extender: None,
            output_extender: None,
            subprocesses: vec![],
            disabled: None,
        }
    }

    pub fn is_chain(&self) -> bool {
        !self.subprocesses.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.disabled.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
pub struct SubprocessDescription {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// boundary ports feeding the children
    pub inner_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// boundary ports collecting the results of the children
    pub inner_sinks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_extender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sink_extender: Option<String>,
}

impl SubprocessDescription {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inner_sources: vec![],
            inner_sinks: vec![],
            source_extender: None,
            sink_extender: None,
        }
    }
}
