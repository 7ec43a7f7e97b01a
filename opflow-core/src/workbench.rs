use crate::description::OperatorService;
use crate::errors::{DefinitionError, ProcessError};
use crate::node::OperatorId;
use crate::notification::{Notification, Notifier};
use crate::process::Process;
use crate::renderer::ProcessRendererModel;
use crate::replace::{replace_operator, ReplaceReport};
use opflow_types::models::library::OperatorDescription;
use opflow_types::models::process::ProcessDefinition;
use opflow_types::tracing::{debug, info};

#[derive(Debug)]
/// A process opened for editing together with its view state.
pub struct Workbench<N: Notifier> {
    process: Process,
    service: OperatorService,
    renderer: ProcessRendererModel,
    notifier: N,
}

impl<N: Notifier> Workbench<N> {
    pub fn new(service: OperatorService, notifier: N) -> Self {
        Self {
            process: Process::new(),
            service,
            renderer: ProcessRendererModel::new(),
            notifier,
        }
    }

    pub fn from_definition(
        definition: &ProcessDefinition,
        service: OperatorService,
        notifier: N,
    ) -> Result<Self, DefinitionError> {
        let (process, renderer) = Process::from_definition(definition, &service)?;
        Ok(Self {
            process,
            service,
            renderer,
            notifier,
        })
    }

    pub fn process(&self) -> &Process {
        &self.process
    }

    pub fn process_mut(&mut self) -> &mut Process {
        &mut self.process
    }

    pub fn renderer(&self) -> &ProcessRendererModel {
        &self.renderer
    }

    pub fn service(&self) -> &OperatorService {
        &self.service
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn select(&mut self, operator: OperatorId) -> Result<(), ProcessError> {
        self.renderer.select_and_show(&self.process, operator)
    }

    pub fn select_by_name(&mut self, name: &str) -> Result<OperatorId, ProcessError> {
        let operator = self
            .process
            .operator_by_name(name)
            .ok_or_else(|| ProcessError::UnknownOperatorName(name.to_string()))?;
        self.select(operator)?;
        Ok(operator)
    }

    /// The operator a replace action works on: the first selected one, unless it is the root.
    fn replace_target(&self) -> Option<OperatorId> {
        let selected = self.renderer.selected_operators().first().copied()?;
        let attached = self
            .process
            .operator(selected)
            .is_ok_and(|operator| operator.parent().is_some());
        (attached && selected != self.process.root()).then_some(selected)
    }

    /// Replaces the selected operator by a new operator created from `key`.
    ///
    /// Returns `None` without touching the process if nothing replaceable is selected or
    /// the operator cannot be created; the latter is reported to the notifier.
    pub fn replace_selected(&mut self, key: &str) -> Result<Option<ReplaceReport>, ProcessError> {
        let Some(selected) = self.replace_target() else {
            debug!("Nothing to replace");
            return Ok(None);
        };

        let replacement = match self.service.create_operator(&mut self.process, key) {
            Ok(replacement) => replacement,
            Err(e) => {
                self.notifier.notify(Notification::CannotInstantiate {
                    operator: key.to_string(),
                    error: e.to_string(),
                });
                return Ok(None);
            }
        };

        let report = replace_operator(&mut self.process, &mut self.renderer, selected, replacement)?;
        if let Some(report) = &report {
            info!(
                "{} replaced at position {}",
                report.replaced, report.position
            );
            if report.failed_reconnects > 0 {
                self.notifier.notify(Notification::FailedConnectionsRestored {
                    count: report.failed_reconnects,
                });
            }
        }
        Ok(report)
    }

    /// What the selected operator could be replaced by.
    pub fn replacement_candidates(&self) -> Vec<&OperatorDescription> {
        self.replace_target()
            .and_then(|selected| self.process.operator(selected).ok())
            .map(|operator| self.service.replacement_candidates(operator))
            .unwrap_or_default()
    }

    pub fn to_definition(&self) -> Result<ProcessDefinition, ProcessError> {
        self.process.to_definition(&self.renderer)
    }
}
