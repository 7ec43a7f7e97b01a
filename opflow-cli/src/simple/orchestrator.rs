use crate::errors::OrchestrationError;
use crate::Orchestrator;
use opflow_core::description::OperatorService;
use opflow_core::notification::LogNotifier;
use opflow_core::operator::Operator;
use opflow_core::replace::ReplaceReport;
use opflow_core::workbench::Workbench;
use opflow_core::Process;
use opflow_types::models::config::Config;
use opflow_types::models::process::ProcessDefinition;
use opflow_types::prettytable::{row, Table};
use opflow_types::schemars::schema_for;
use opflow_types::serde_json;
use opflow_types::tracing::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct SimpleOrchestrator {
    service: OperatorService,
}

impl SimpleOrchestrator {
    pub fn new(service: OperatorService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &OperatorService {
        &self.service
    }

    fn open(&self, process_path: &str) -> Result<Workbench<LogNotifier>, OrchestrationError> {
        let definition = read_process(Path::new(process_path))?;
        Ok(Workbench::from_definition(
            &definition,
            self.service.clone(),
            LogNotifier,
        )?)
    }
}

impl Orchestrator for SimpleOrchestrator {
    fn list_operators(&self) -> Result<Table, OrchestrationError> {
        let mut table = Table::new();
        table.add_row(row!["Key", "Name", "Group", "Kind", "Status"]);
        for description in self.service.descriptions() {
            let kind = if description.is_chain() {
                format!("chain ({})", description.subprocesses.len())
            } else {
                "simple".to_string()
            };
            let status = description
                .disabled
                .as_ref()
                .map_or("enabled".to_string(), |reason| format!("disabled: {reason}"));
            table.add_row(row![
                description.key,
                description.name,
                description.group,
                kind,
                status
            ]);
        }
        Ok(table)
    }

    fn show(&self, process_path: &str) -> Result<Table, OrchestrationError> {
        let workbench = self.open(process_path)?;
        let process = workbench.process();
        let mut table = Table::new();
        table.add_row(row!["Operator", "Key", "Subprocess", "Inputs", "Outputs"]);
        for id in process.subtree(process.root())? {
            let operator = process.operator(id)?;
            let Some(parent) = operator.parent() else {
                continue;
            };
            table.add_row(row![
                operator.name(),
                operator.key(),
                process.unit(parent)?.name(),
                input_wiring(process, operator),
                output_wiring(process, operator)
            ]);
        }
        Ok(table)
    }

    fn candidates(&self, process_path: &str, operator: &str) -> Result<Table, OrchestrationError> {
        let mut workbench = self.open(process_path)?;
        workbench.select_by_name(operator)?;
        let mut table = Table::new();
        table.add_row(row!["Key", "Name", "Group"]);
        for description in workbench.replacement_candidates() {
            table.add_row(row![description.key, description.name, description.group]);
        }
        Ok(table)
    }

    fn config_schema(&self) -> Result<String, OrchestrationError> {
        let schema = schema_for!(Config);
        serde_json::to_string_pretty(&schema).map_err(OrchestrationError::FailedToGenerateSchema)
    }

    fn replace(
        &self,
        process_path: &str,
        operator: &str,
        key: &str,
        output: Option<&str>,
    ) -> Result<Option<ReplaceReport>, OrchestrationError> {
        let mut workbench = self.open(process_path)?;
        workbench.select_by_name(operator)?;
        let Some(report) = workbench.replace_selected(key)? else {
            warn!("{} was not replaced", operator);
            return Ok(None);
        };

        let definition = workbench.to_definition()?;
        let output = PathBuf::from(output.unwrap_or(process_path));
        write_process(&output, &definition)?;
        info!("Wrote {}", output.display());
        Ok(Some(report))
    }
}

fn input_wiring(process: &Process, operator: &Operator) -> String {
    operator
        .input_ports()
        .iter()
        .map(|port| match port.partner() {
            Some(from) => format!("{} <- {}", port.name(), process.output_label(from)),
            None => port.name().to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn output_wiring(process: &Process, operator: &Operator) -> String {
    operator
        .output_ports()
        .iter()
        .map(|port| match port.partner() {
            Some(to) => format!("{} -> {}", port.name(), process.input_label(to)),
            None => port.name().to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|extension| extension == "json")
}

pub(crate) fn read_process(path: &Path) -> Result<ProcessDefinition, OrchestrationError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| OrchestrationError::FileSystem(path.to_path_buf(), e))?;
    let definition = if is_json(path) {
        ProcessDefinition::from_json_str(&content)
    } else {
        ProcessDefinition::from_yaml_str(&content)
    };
    definition.map_err(|e| OrchestrationError::FailedToReadProcess(path.to_path_buf(), e))
}

fn write_process(path: &Path, definition: &ProcessDefinition) -> Result<(), OrchestrationError> {
    let content = if is_json(path) {
        definition.to_json_string()
    } else {
        definition.to_yaml_string()
    }
    .map_err(OrchestrationError::FailedToWriteProcess)?;
    std::fs::write(path, content).map_err(|e| OrchestrationError::FileSystem(path.to_path_buf(), e))
}
