use std::path::PathBuf;

use opflow_core::errors::{DefinitionError, ProcessError};
use opflow_tracing::TracingError;
use opflow_types::errors::internal::BoxedError;
use opflow_types::errors::types::{DeserializationError, SerializationError};
use opflow_types::thiserror::Error;
use opflow_types::{serde_json, thiserror};

#[derive(Error, Debug)]
pub enum OrchestrationError {
    #[error("File system error {0:?}: {1}")]
    FileSystem(PathBuf, #[source] std::io::Error),
    #[error("Failed to read process {0:?}: {1}")]
    FailedToReadProcess(PathBuf, #[source] DeserializationError),
    #[error("Failed to write process: {0}")]
    FailedToWriteProcess(#[source] SerializationError),
    #[error("Failed to generate config schema: {0}")]
    FailedToGenerateSchema(#[source] serde_json::Error),
    #[error("Invalid process: {0}")]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error(transparent)]
    Tracing(#[from] TracingError),
    #[error(transparent)]
    CliError(#[from] CliError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Can't find the configuration file at: {0:?}")]
    FailedToFindConfigurationFile(String),
    #[error("Failed to parse opflow config: {0:?}")]
    FailedToParseYaml(#[source] BoxedError),
    #[error("Failed to load operator library {0:?}: {1}")]
    FailedToLoadLibrary(PathBuf, #[source] DeserializationError),
    #[error("File system error {0:?}: {1}")]
    FileSystem(PathBuf, #[source] std::io::Error),
}
