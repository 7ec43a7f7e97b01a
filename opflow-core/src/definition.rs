use crate::description::OperatorService;
use crate::errors::{DefinitionError, ProcessError};
use crate::node::{Connection, InputPortRef, OperatorId, OutputPortRef, PortOwner, UnitId};
use crate::process::Process;
use crate::renderer::ProcessRendererModel;
use opflow_types::constants::ROOT_OPERATOR_NAME;
use opflow_types::models::process::{
    ConnectionDefinition, OperatorDefinition, ProcessDefinition, UnitDefinition,
};
use opflow_types::tracing::debug;
use std::collections::{HashMap, HashSet};

impl Process {
    /// Builds a process from its on-disk form. Operators without a stored rect get a
    /// default one.
    pub fn from_definition(
        definition: &ProcessDefinition,
        service: &OperatorService,
    ) -> Result<(Process, ProcessRendererModel), DefinitionError> {
        let mut seen = HashSet::from([ROOT_OPERATOR_NAME.to_string()]);
        check_unique_names(&definition.process, &mut seen)?;

        let mut process = Process::new();
        let mut renderer = ProcessRendererModel::new();
        let main_unit = process.main_unit();
        let mut loader = Loader {
            process: &mut process,
            renderer: &mut renderer,
            service,
            names: HashMap::new(),
        };
        loader.load_unit(main_unit, &definition.process)?;
        renderer.ensure_layout(&process)?;
        debug!(
            "Loaded process with {} operators",
            process.subtree(process.root())?.len() - 1
        );
        Ok((process, renderer))
    }

    /// The on-disk form of the process. Connections of each unit are written inner
    /// sources first, then per operator in unit order.
    pub fn to_definition(
        &self,
        renderer: &ProcessRendererModel,
    ) -> Result<ProcessDefinition, ProcessError> {
        Ok(ProcessDefinition {
            process: self.unit_definition(self.main_unit(), renderer)?,
        })
    }

    fn unit_definition(
        &self,
        unit: UnitId,
        renderer: &ProcessRendererModel,
    ) -> Result<UnitDefinition, ProcessError> {
        let mut operators = vec![];
        for id in self.unit(unit)?.operators() {
            let operator = self.operator(*id)?;
            let mut subprocesses = vec![];
            for subprocess in operator.subprocesses() {
                subprocesses.push(self.unit_definition(*subprocess, renderer)?);
            }
            operators.push(OperatorDefinition {
                name: operator.name().to_string(),
                key: operator.key().to_string(),
                rect: renderer.operator_rect(*id).map(Into::into),
                subprocesses,
            });
        }

        let mut connections = vec![];
        for Connection { from, to } in self.connections(unit)? {
            connections.push(ConnectionDefinition {
                from_op: self.owner_name(&from.owner)?,
                from_port: from.name,
                to_op: self.owner_name(&to.owner)?,
                to_port: to.name,
            });
        }
        Ok(UnitDefinition {
            operators,
            connections,
        })
    }

    fn owner_name(&self, owner: &PortOwner) -> Result<Option<String>, ProcessError> {
        match owner {
            PortOwner::Operator(id) => Ok(Some(self.operator(*id)?.name().to_string())),
            PortOwner::Unit(_) => Ok(None),
        }
    }
}

fn check_unique_names(
    unit: &UnitDefinition,
    seen: &mut HashSet<String>,
) -> Result<(), DefinitionError> {
    for operator in &unit.operators {
        if !seen.insert(operator.name.clone()) {
            return Err(DefinitionError::DuplicateOperatorName(
                operator.name.clone(),
            ));
        }
        for subprocess in &operator.subprocesses {
            check_unique_names(subprocess, seen)?;
        }
    }
    Ok(())
}

struct Loader<'a> {
    process: &'a mut Process,
    renderer: &'a mut ProcessRendererModel,
    service: &'a OperatorService,
    /// Defined name -> operator.
    names: HashMap<String, OperatorId>,
}

impl Loader<'_> {
    fn load_unit(&mut self, unit: UnitId, definition: &UnitDefinition) -> Result<(), DefinitionError> {
        for operator in &definition.operators {
            self.load_operator(unit, operator)?;
        }
        self.load_connections(unit, &definition.connections)
    }

    fn load_operator(
        &mut self,
        unit: UnitId,
        definition: &OperatorDefinition,
    ) -> Result<(), DefinitionError> {
        let id = self
            .service
            .create_operator(self.process, &definition.key)
            .map_err(|source| DefinitionError::Creation {
                name: definition.name.clone(),
                source,
            })?;
        let available = self.process.operator(id)?.number_of_subprocesses();
        if definition.subprocesses.len() > available {
            return Err(DefinitionError::TooManySubprocesses {
                name: definition.name.clone(),
                key: definition.key.clone(),
                defined: definition.subprocesses.len(),
                available,
            });
        }
        self.process.rename_operator(id, &definition.name)?;
        self.process.add_operator(unit, id, None)?;
        self.names.insert(definition.name.clone(), id);
        if let Some(rect) = definition.rect {
            self.renderer.set_operator_rect(id, rect.into());
        }

        for (index, subprocess) in definition.subprocesses.iter().enumerate() {
            let Some(child_unit) = self.process.operator(id)?.subprocess(index) else {
                continue;
            };
            self.load_unit(child_unit, subprocess)?;
        }
        Ok(())
    }

    fn owner(&self, unit: UnitId, name: &Option<String>) -> Result<PortOwner, DefinitionError> {
        match name {
            None => Ok(PortOwner::Unit(unit)),
            Some(name) => self
                .names
                .get(name)
                .map(|id| PortOwner::Operator(*id))
                .ok_or_else(|| DefinitionError::UnknownConnectionOperator(name.clone())),
        }
    }

    /// Connects the wires of one unit. Every referenced port is created first and the ports
    /// of all involved owners stay locked until the last wire is in, so that extender ports
    /// keep the numbers the definition refers to. Extender numbers beyond the number of
    /// wires are rejected.
    fn load_connections(
        &mut self,
        unit: UnitId,
        connections: &[ConnectionDefinition],
    ) -> Result<(), DefinitionError> {
        let mut resolved = Vec::with_capacity(connections.len());
        let mut owners = vec![];
        for connection in connections {
            let from = OutputPortRef::new(
                self.owner(unit, &connection.from_op)?,
                &connection.from_port,
            );
            let to = InputPortRef::new(self.owner(unit, &connection.to_op)?, &connection.to_port);
            for owner in [&from.owner, &to.owner] {
                if !owners.contains(owner) {
                    owners.push(owner.clone());
                }
            }
            resolved.push(Connection::new(from, to));
        }

        let max_index = resolved.len() + 1;
        for Connection { from, to } in &resolved {
            self.process.provide_output(from, max_index)?;
            self.process.provide_input(to, max_index)?;
        }
        for owner in &owners {
            self.process.set_locks(owner, true)?;
        }
        for Connection { from, to } in &resolved {
            self.process.connect(from, to)?;
        }
        for owner in &owners {
            self.process.set_locks(owner, false)?;
            self.process.refresh_extenders(owner)?;
        }
        Ok(())
    }
}
