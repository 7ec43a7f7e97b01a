use crate::node::{OperatorId, UnitId};
use opflow_types::thiserror;
use opflow_types::thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Adding this connection would have created a cycle")]
    WouldCycle,
    #[error("Unknown operator: {0}")]
    UnknownOperator(OperatorId),
    #[error("Unknown execution unit: {0}")]
    UnknownUnit(UnitId),
    #[error("No operator named {0}")]
    UnknownOperatorName(String),
    #[error("Invalid port: {0}")]
    InvalidPort(String),
    #[error("Port {0} is already connected")]
    PortAlreadyConnected(String),
    #[error("Ports {from} and {to} are not part of the same execution unit")]
    NotInSameUnit { from: String, to: String },
    #[error("Operator {0} is not part of an execution unit")]
    NotAttached(String),
    #[error("Operator {0} is already part of an execution unit")]
    AlreadyAttached(String),
    #[error("Operator {0} cannot be inserted into one of its own subprocesses")]
    NestedIntoItself(String),
    #[error("The root operator cannot be moved or removed")]
    RootOperator,
}

impl<T> From<daggy::WouldCycle<T>> for ProcessError {
    fn from(_: daggy::WouldCycle<T>) -> Self {
        ProcessError::WouldCycle
    }
}

#[derive(Error, Debug)]
pub enum OperatorCreationError {
    #[error("No operator description for key {0}")]
    NoDescription(String),
    #[error("Operator {key} is disabled: {reason}")]
    OperatorDisabled { key: String, reason: String },
    #[error("Operator description {key} is invalid: {reason}")]
    InvalidDescription { key: String, reason: String },
}

#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("Cannot create operator {name}: {source}")]
    Creation {
        name: String,
        #[source]
        source: OperatorCreationError,
    },
    #[error("Operator {name} defines {defined} subprocesses, but {key} only has {available}")]
    TooManySubprocesses {
        name: String,
        key: String,
        defined: usize,
        available: usize,
    },
    #[error("Duplicate operator name {0}")]
    DuplicateOperatorName(String),
    #[error("Connection references unknown operator {0}")]
    UnknownConnectionOperator(String),
    #[error(transparent)]
    Process(#[from] ProcessError),
}
