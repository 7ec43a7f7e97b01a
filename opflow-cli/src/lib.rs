pub mod cli;
pub mod errors;
pub mod simple;

use errors::OrchestrationError;
use opflow_core::replace::ReplaceReport;
use opflow_types::prettytable::Table;

pub trait Orchestrator {
    fn list_operators(&self) -> Result<Table, OrchestrationError>;
    fn show(&self, process_path: &str) -> Result<Table, OrchestrationError>;
    fn candidates(&self, process_path: &str, operator: &str) -> Result<Table, OrchestrationError>;
    fn config_schema(&self) -> Result<String, OrchestrationError>;
    /// Replaces `operator` by a new operator created from `key` and writes the result to
    /// `output`, or back to `process_path`. Returns `None` if nothing was replaced.
    fn replace(
        &self,
        process_path: &str,
        operator: &str,
        key: &str,
        output: Option<&str>,
    ) -> Result<Option<ReplaceReport>, OrchestrationError>;
}
