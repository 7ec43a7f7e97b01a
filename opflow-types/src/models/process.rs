use crate::errors::types::{DeserializationError, SerializationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
/// On-disk form of a process: the content of the root operator's subprocess.
pub struct ProcessDefinition {
    pub process: UnitDefinition,
}

impl ProcessDefinition {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DeserializationError> {
        serde_yaml::from_str(yaml).map_err(DeserializationError::Yaml)
    }

    pub fn from_json_str(json: &str) -> Result<Self, DeserializationError> {
        serde_json::from_str(json).map_err(DeserializationError::Json)
    }

    pub fn to_yaml_string(&self) -> Result<String, SerializationError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct UnitDefinition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operators: Vec<OperatorDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<ConnectionDefinition>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct OperatorDefinition {
    pub name: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<RectDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subprocesses: Vec<UnitDefinition>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
/// A wire inside one unit. A missing operator name refers to the unit's own
/// inner ports: an inner source on the `from` side, an inner sink on the `to` side.
pub struct ConnectionDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_op: Option<String>,
    pub from_port: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_op: Option<String>,
    pub to_port: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct RectDefinition {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
