use crate::description::root_description;
use crate::errors::ProcessError;
use crate::execution_unit::ExecutionUnit;
use crate::node::{Connection, InputPortRef, OperatorId, OutputPortRef, PortOwner, UnitId};
use crate::operator::{Operator, OperatorKind};
use crate::ports::{InputPort, OutputPort, Ports};
use daggy::Walker;
use opflow_types::models::library::OperatorDescription;
use opflow_types::tracing::debug;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

#[derive(Debug)]
/// An analysis process: a tree of operators and execution units, with port connections
/// inside every unit.
///
/// Operators live in an arena and are addressed by `OperatorId`. An operator is either
/// attached to a unit or detached (freshly created, or just removed). Names are unique
/// among the operators reachable from the root.
pub struct Process {
    operators: HashMap<OperatorId, Operator>,
    units: HashMap<UnitId, ExecutionUnit>,
    names: HashMap<String, OperatorId>,
    root: OperatorId,
    main_unit: UnitId,
    next_operator_id: u32,
    next_unit_id: u32,
}

impl Default for Process {
    fn default() -> Self {
        Self::new()
    }
}

impl Process {
    /// Creates a process with an empty main unit.
    pub fn new() -> Self {
        let mut process = Self {
            operators: HashMap::new(),
            units: HashMap::new(),
            names: HashMap::new(),
            root: OperatorId(0),
            main_unit: UnitId(0),
            next_operator_id: 0,
            next_unit_id: 0,
        };
        let root = process.instantiate(&root_description());
        process.root = root;
        if let Some(operator) = process.operators.get(&root) {
            process.names.insert(operator.name.clone(), root);
            if let Some(unit) = operator.subprocess(0) {
                process.main_unit = unit;
            }
        }
        process
    }

    pub fn root(&self) -> OperatorId {
        self.root
    }

    /// The single subprocess of the root operator.
    pub fn main_unit(&self) -> UnitId {
        self.main_unit
    }

    pub fn operator(&self, id: OperatorId) -> Result<&Operator, ProcessError> {
        self.operators
            .get(&id)
            .ok_or(ProcessError::UnknownOperator(id))
    }

    pub(crate) fn operator_mut(&mut self, id: OperatorId) -> Result<&mut Operator, ProcessError> {
        self.operators
            .get_mut(&id)
            .ok_or(ProcessError::UnknownOperator(id))
    }

    pub fn unit(&self, id: UnitId) -> Result<&ExecutionUnit, ProcessError> {
        self.units.get(&id).ok_or(ProcessError::UnknownUnit(id))
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Result<&mut ExecutionUnit, ProcessError> {
        self.units.get_mut(&id).ok_or(ProcessError::UnknownUnit(id))
    }

    pub fn operator_by_name(&self, name: &str) -> Option<OperatorId> {
        self.names.get(name).copied()
    }

    /// `operator` and every operator nested in its subprocesses, depth first.
    pub fn subtree(&self, operator: OperatorId) -> Result<Vec<OperatorId>, ProcessError> {
        let mut result = vec![];
        let mut stack = vec![operator];
        while let Some(id) = stack.pop() {
            result.push(id);
            for unit in self.operator(id)?.subprocesses().iter().rev() {
                stack.extend(self.unit(*unit)?.operators.iter().rev());
            }
        }
        Ok(result)
    }

    /// Whether the operator is reachable from the root.
    pub fn is_registered(&self, operator: OperatorId) -> bool {
        let mut current = operator;
        loop {
            if current == self.root {
                return true;
            }
            let Some(unit) = self
                .operators
                .get(&current)
                .and_then(|operator| operator.parent)
                .and_then(|parent| self.units.get(&parent))
            else {
                return false;
            };
            current = unit.owner;
        }
    }

    fn is_unit_registered(&self, unit: UnitId) -> bool {
        self.units
            .get(&unit)
            .is_some_and(|unit| self.is_registered(unit.owner))
    }

    /// Creates a detached operator with the ports and subprocesses of `description`.
    pub(crate) fn instantiate(&mut self, description: &OperatorDescription) -> OperatorId {
        let id = OperatorId(self.next_operator_id);
        self.next_operator_id += 1;

        let kind = if description.is_chain() {
            let mut units = Vec::with_capacity(description.subprocesses.len());
            for subprocess in &description.subprocesses {
                let unit = UnitId(self.next_unit_id);
                self.next_unit_id += 1;
                self.units.insert(
                    unit,
                    ExecutionUnit {
                        id: unit,
                        name: subprocess.name.clone(),
                        owner: id,
                        operators: vec![],
                        inner_sources: Ports::new(
                            &subprocess.inner_sources,
                            subprocess.source_extender.clone(),
                        ),
                        inner_sinks: Ports::new(
                            &subprocess.inner_sinks,
                            subprocess.sink_extender.clone(),
                        ),
                    },
                );
                units.push(unit);
            }
            OperatorKind::Chain(units)
        } else {
            OperatorKind::Simple
        };

        self.operators.insert(
            id,
            Operator {
                id,
                name: description.name.clone(),
                key: description.key.clone(),
                inputs: Ports::new(&description.inputs, description.input_extender.clone()),
                outputs: Ports::new(&description.outputs, description.output_extender.clone()),
                kind,
                parent: None,
            },
        );
        id
    }

    /// Renames an operator. Registered operators get a unique variant of `name`.
    pub fn rename_operator(
        &mut self,
        operator: OperatorId,
        name: &str,
    ) -> Result<String, ProcessError> {
        let registered = self.is_registered(operator);
        let old_name = self.operator(operator)?.name.clone();
        if !registered {
            self.operator_mut(operator)?.name = name.to_string();
            return Ok(name.to_string());
        }
        if old_name == name {
            return Ok(old_name);
        }
        self.names.remove(&old_name);
        let name = self.unique_name(name);
        self.operator_mut(operator)?.name = name.clone();
        self.names.insert(name.clone(), operator);
        Ok(name)
    }

    fn unique_name(&self, base: &str) -> String {
        if !self.names.contains_key(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base} ({n})"))
            .find(|name| !self.names.contains_key(name))
            .unwrap_or_else(|| base.to_string())
    }

    pub(crate) fn register_names(&mut self, operator: OperatorId) -> Result<(), ProcessError> {
        for id in self.subtree(operator)? {
            let name = self.unique_name(&self.operator(id)?.name);
            self.operator_mut(id)?.name = name.clone();
            self.names.insert(name, id);
        }
        Ok(())
    }

    pub(crate) fn unregister_names(&mut self, operator: OperatorId) -> Result<(), ProcessError> {
        for id in self.subtree(operator)? {
            let name = self.operator(id)?.name.clone();
            if self.names.get(&name) == Some(&id) {
                self.names.remove(&name);
            }
        }
        Ok(())
    }

    /// Inserts a detached operator into `unit` at `index` (appends if `None` or out of range).
    ///
    /// Returns the position the operator was inserted at.
    pub fn add_operator(
        &mut self,
        unit: UnitId,
        operator: OperatorId,
        index: Option<usize>,
    ) -> Result<usize, ProcessError> {
        if operator == self.root {
            return Err(ProcessError::RootOperator);
        }
        let name = self.operator(operator)?.name.clone();
        if self.operator(operator)?.parent.is_some() {
            return Err(ProcessError::AlreadyAttached(name));
        }

        let mut owner = self.unit(unit)?.owner;
        loop {
            if owner == operator {
                return Err(ProcessError::NestedIntoItself(name));
            }
            match self.operator(owner)?.parent {
                Some(parent) => owner = self.unit(parent)?.owner,
                None => break,
            }
        }

        let target = self.unit_mut(unit)?;
        let len = target.operators.len();
        let index = index.map_or(len, |index| index.min(len));
        target.operators.insert(index, operator);
        self.operator_mut(operator)?.parent = Some(unit);
        if self.is_unit_registered(unit) {
            self.register_names(operator)?;
        }

        debug!("Added {} to {} at {}", name, self.unit(unit)?.name, index);
        Ok(index)
    }

    /// Disconnects an operator and takes it out of its unit. The operator stays in the
    /// process as a detached operator. Returns its former position.
    pub fn remove_operator(&mut self, operator: OperatorId) -> Result<usize, ProcessError> {
        if operator == self.root {
            return Err(ProcessError::RootOperator);
        }
        let Some(parent) = self.operator(operator)?.parent else {
            return Err(ProcessError::NotAttached(
                self.operator(operator)?.name.clone(),
            ));
        };

        self.disconnect_all(&PortOwner::Operator(operator))?;
        if self.is_registered(operator) {
            self.unregister_names(operator)?;
        }
        let unit = self.unit_mut(parent)?;
        let index = unit
            .index_of(operator)
            .ok_or(ProcessError::UnknownOperator(operator))?;
        unit.operators.remove(index);
        self.operator_mut(operator)?.parent = None;
        Ok(index)
    }

    /// Drops a detached operator and everything nested in it.
    pub fn discard(&mut self, operator: OperatorId) -> Result<(), ProcessError> {
        if operator == self.root {
            return Err(ProcessError::RootOperator);
        }
        let detached = self.operator(operator)?;
        if detached.parent.is_some() {
            return Err(ProcessError::AlreadyAttached(detached.name.clone()));
        }
        for id in self.subtree(operator)? {
            if let Some(removed) = self.operators.remove(&id) {
                for unit in removed.subprocesses() {
                    self.units.remove(unit);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn output_ports(
        &self,
        owner: &PortOwner,
    ) -> Result<&Ports<InputPortRef>, ProcessError> {
        match owner {
            PortOwner::Operator(id) => Ok(&self.operator(*id)?.outputs),
            PortOwner::Unit(id) => Ok(&self.unit(*id)?.inner_sources),
        }
    }

    fn output_ports_mut(
        &mut self,
        owner: &PortOwner,
    ) -> Result<&mut Ports<InputPortRef>, ProcessError> {
        match owner {
            PortOwner::Operator(id) => Ok(&mut self.operator_mut(*id)?.outputs),
            PortOwner::Unit(id) => Ok(&mut self.unit_mut(*id)?.inner_sources),
        }
    }

    pub(crate) fn input_ports(
        &self,
        owner: &PortOwner,
    ) -> Result<&Ports<OutputPortRef>, ProcessError> {
        match owner {
            PortOwner::Operator(id) => Ok(&self.operator(*id)?.inputs),
            PortOwner::Unit(id) => Ok(&self.unit(*id)?.inner_sinks),
        }
    }

    fn input_ports_mut(
        &mut self,
        owner: &PortOwner,
    ) -> Result<&mut Ports<OutputPortRef>, ProcessError> {
        match owner {
            PortOwner::Operator(id) => Ok(&mut self.operator_mut(*id)?.inputs),
            PortOwner::Unit(id) => Ok(&mut self.unit_mut(*id)?.inner_sinks),
        }
    }

    pub fn output_port(&self, port: &OutputPortRef) -> Result<&OutputPort, ProcessError> {
        self.output_ports(&port.owner)?
            .get(&port.name)
            .ok_or_else(|| ProcessError::InvalidPort(self.output_label(port)))
    }

    pub fn input_port(&self, port: &InputPortRef) -> Result<&InputPort, ProcessError> {
        self.input_ports(&port.owner)?
            .get(&port.name)
            .ok_or_else(|| ProcessError::InvalidPort(self.input_label(port)))
    }

    pub(crate) fn output_port_mut(
        &mut self,
        port: &OutputPortRef,
    ) -> Result<&mut OutputPort, ProcessError> {
        if !self.output_ports(&port.owner)?.contains(&port.name) {
            return Err(ProcessError::InvalidPort(self.output_label(port)));
        }
        self.output_ports_mut(&port.owner)?
            .get_mut(&port.name)
            .ok_or_else(|| ProcessError::InvalidPort(port.name.clone()))
    }

    pub(crate) fn input_port_mut(
        &mut self,
        port: &InputPortRef,
    ) -> Result<&mut InputPort, ProcessError> {
        if !self.input_ports(&port.owner)?.contains(&port.name) {
            return Err(ProcessError::InvalidPort(self.input_label(port)));
        }
        self.input_ports_mut(&port.owner)?
            .get_mut(&port.name)
            .ok_or_else(|| ProcessError::InvalidPort(port.name.clone()))
    }

    fn owner_label(&self, owner: &PortOwner) -> String {
        match owner {
            PortOwner::Operator(id) => self
                .operators
                .get(id)
                .map_or_else(|| id.to_string(), |operator| operator.name.clone()),
            PortOwner::Unit(id) => self.units.get(id).map_or_else(
                || id.to_string(),
                |unit| format!("{}/{}", self.owner_label(&PortOwner::Operator(unit.owner)), unit.name),
            ),
        }
    }

    /// Human readable `owner.port` form of an output port.
    pub fn output_label(&self, port: &OutputPortRef) -> String {
        format!("{}.{}", self.owner_label(&port.owner), port.name)
    }

    /// Human readable `owner.port` form of an input port.
    pub fn input_label(&self, port: &InputPortRef) -> String {
        format!("{}.{}", self.owner_label(&port.owner), port.name)
    }

    /// The unit inside which the owner's ports can be connected.
    fn scope(&self, owner: &PortOwner) -> Result<Option<UnitId>, ProcessError> {
        match owner {
            PortOwner::Operator(id) => Ok(self.operator(*id)?.parent),
            PortOwner::Unit(id) => self.unit(*id).map(|unit| Some(unit.id)),
        }
    }

    /// Connects an output port to a free input port of the same unit.
    ///
    /// Extender ports named in `from` or `to` are created on demand. Returns an error if a
    /// port cannot be found or is taken, the ports live in different units, or the
    /// connection would create a cycle.
    pub fn connect(&mut self, from: &OutputPortRef, to: &InputPortRef) -> Result<(), ProcessError> {
        let scope = self.scope(&from.owner)?;
        if scope.is_none() || scope != self.scope(&to.owner)? {
            return Err(ProcessError::NotInSameUnit {
                from: self.output_label(from),
                to: self.input_label(to),
            });
        }
        validate_free(self.output_ports(&from.owner)?, &from.name, || {
            self.output_label(from)
        })?;
        validate_free(self.input_ports(&to.owner)?, &to.name, || {
            self.input_label(to)
        })?;
        if let (PortOwner::Operator(source), PortOwner::Operator(target), Some(unit)) =
            (&from.owner, &to.owner, scope)
        {
            self.check_acyclic(unit, *source, *target)?;
        }

        let outputs = self.output_ports_mut(&from.owner)?;
        outputs.ensure_port(&from.name, outputs.next_extender_index());
        let inputs = self.input_ports_mut(&to.owner)?;
        inputs.ensure_port(&to.name, inputs.next_extender_index());
        self.output_port_mut(from)?.set_partner(Some(to.clone()));
        self.input_port_mut(to)?.set_partner(Some(from.clone()));
        self.refresh_output_extender(&from.owner)?;
        self.refresh_input_extender(&to.owner)?;

        debug!(
            "Connected {} to {}",
            self.output_label(from),
            self.input_label(to)
        );
        Ok(())
    }

    /// Disconnects an output port. Returns the input port it was connected to.
    pub fn disconnect_output(
        &mut self,
        from: &OutputPortRef,
    ) -> Result<Option<InputPortRef>, ProcessError> {
        let Some(to) = self.output_port_mut(from)?.set_partner(None) else {
            return Ok(None);
        };
        self.input_port_mut(&to)?.set_partner(None);
        self.refresh_output_extender(&from.owner)?;
        self.refresh_input_extender(&to.owner)?;
        Ok(Some(to))
    }

    /// Disconnects an input port. Returns the output port it was connected to.
    pub fn disconnect_input(
        &mut self,
        to: &InputPortRef,
    ) -> Result<Option<OutputPortRef>, ProcessError> {
        let Some(from) = self.input_port_mut(to)?.set_partner(None) else {
            return Ok(None);
        };
        self.output_port_mut(&from)?.set_partner(None);
        self.refresh_output_extender(&from.owner)?;
        self.refresh_input_extender(&to.owner)?;
        Ok(Some(from))
    }

    /// Disconnects every port of an operator, or every inner port of a unit.
    pub fn disconnect_all(&mut self, owner: &PortOwner) -> Result<(), ProcessError> {
        // Extenders may renumber the remaining ports after each disconnect, so look them up again.
        while let Some(name) = first_connected(self.output_ports(owner)?) {
            self.disconnect_output(&OutputPortRef::new(owner.clone(), &name))?;
        }
        while let Some(name) = first_connected(self.input_ports(owner)?) {
            self.disconnect_input(&InputPortRef::new(owner.clone(), &name))?;
        }
        Ok(())
    }

    pub fn lock_output(&mut self, port: &OutputPortRef) -> Result<(), ProcessError> {
        self.output_port_mut(port)?.set_locked(true);
        Ok(())
    }

    pub fn lock_input(&mut self, port: &InputPortRef) -> Result<(), ProcessError> {
        self.input_port_mut(port)?.set_locked(true);
        Ok(())
    }

    pub fn unlock_output(&mut self, port: &OutputPortRef) -> Result<(), ProcessError> {
        self.output_port_mut(port)?.set_locked(false);
        self.refresh_output_extender(&port.owner)
    }

    pub fn unlock_input(&mut self, port: &InputPortRef) -> Result<(), ProcessError> {
        self.input_port_mut(port)?.set_locked(false);
        self.refresh_input_extender(&port.owner)
    }

    /// Creates the extender ports up to `port` if it does not exist yet. Extender ports
    /// numbered above `max_index` are invalid.
    pub(crate) fn provide_output(
        &mut self,
        port: &OutputPortRef,
        max_index: usize,
    ) -> Result<(), ProcessError> {
        if !self
            .output_ports_mut(&port.owner)?
            .ensure_port(&port.name, max_index)
        {
            return Err(ProcessError::InvalidPort(self.output_label(port)));
        }
        Ok(())
    }

    pub(crate) fn provide_input(
        &mut self,
        port: &InputPortRef,
        max_index: usize,
    ) -> Result<(), ProcessError> {
        if !self
            .input_ports_mut(&port.owner)?
            .ensure_port(&port.name, max_index)
        {
            return Err(ProcessError::InvalidPort(self.input_label(port)));
        }
        Ok(())
    }

    /// Locks or unlocks every port of an operator, or every inner port of a unit.
    pub(crate) fn set_locks(&mut self, owner: &PortOwner, locked: bool) -> Result<(), ProcessError> {
        for port in self.output_ports_mut(owner)?.iter_mut() {
            port.set_locked(locked);
        }
        for port in self.input_ports_mut(owner)?.iter_mut() {
            port.set_locked(locked);
        }
        Ok(())
    }

    pub(crate) fn refresh_extenders(&mut self, owner: &PortOwner) -> Result<(), ProcessError> {
        self.refresh_output_extender(owner)?;
        self.refresh_input_extender(owner)
    }

    fn refresh_output_extender(&mut self, owner: &PortOwner) -> Result<(), ProcessError> {
        let renamed = self.output_ports_mut(owner)?.update_extender();
        for (name, partner) in renamed {
            self.input_port_mut(&partner)?
                .set_partner(Some(OutputPortRef::new(owner.clone(), &name)));
        }
        Ok(())
    }

    fn refresh_input_extender(&mut self, owner: &PortOwner) -> Result<(), ProcessError> {
        let renamed = self.input_ports_mut(owner)?.update_extender();
        for (name, partner) in renamed {
            self.output_port_mut(&partner)?
                .set_partner(Some(InputPortRef::new(owner.clone(), &name)));
        }
        Ok(())
    }

    /// Every connection inside a unit: inner sources first, then operators in unit order.
    pub fn connections(&self, unit: UnitId) -> Result<Vec<Connection>, ProcessError> {
        let execution_unit = self.unit(unit)?;
        let mut connections = execution_unit
            .inner_sources
            .connected()
            .map(|(name, to)| Connection::new(OutputPortRef::inner_source(unit, name), to.clone()))
            .collect::<Vec<_>>();
        for id in &execution_unit.operators {
            connections.extend(
                self.operator(*id)?
                    .outputs
                    .connected()
                    .map(|(name, to)| Connection::new(OutputPortRef::operator(*id, name), to.clone())),
            );
        }
        Ok(connections)
    }

    /// Operators of a unit in an order that respects their connections, falling back to
    /// the unit order between independent operators.
    pub fn execution_order(&self, unit: UnitId) -> Result<Vec<OperatorId>, ProcessError> {
        let (dag, _) = self.unit_dag(unit)?;
        let mut in_degrees = (0..dag.node_count())
            .map(|index| dag.parents(daggy::NodeIndex::new(index)).iter(&dag).count())
            .collect::<Vec<_>>();
        let mut ready = in_degrees
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(index, _)| Reverse(index))
            .collect::<BinaryHeap<_>>();

        let mut order = Vec::with_capacity(dag.node_count());
        while let Some(Reverse(index)) = ready.pop() {
            let node = daggy::NodeIndex::new(index);
            order.push(dag[node]);
            for (_, child) in dag.children(node).iter(&dag) {
                let degree = &mut in_degrees[child.index()];
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(child.index()));
                }
            }
        }
        Ok(order)
    }

    fn check_acyclic(
        &self,
        unit: UnitId,
        source: OperatorId,
        target: OperatorId,
    ) -> Result<(), ProcessError> {
        if source == target {
            return Err(ProcessError::WouldCycle);
        }
        let (mut dag, indexes) = self.unit_dag(unit)?;
        let source = *indexes
            .get(&source)
            .ok_or(ProcessError::UnknownOperator(source))?;
        let target = *indexes
            .get(&target)
            .ok_or(ProcessError::UnknownOperator(target))?;
        dag.add_edge(source, target, ())?;
        Ok(())
    }

    /// The operators of a unit as a DAG, node indexes following the unit order.
    #[allow(clippy::type_complexity)]
    fn unit_dag(
        &self,
        unit: UnitId,
    ) -> Result<
        (
            daggy::Dag<OperatorId, ()>,
            HashMap<OperatorId, daggy::NodeIndex>,
        ),
        ProcessError,
    > {
        let unit = self.unit(unit)?;
        let mut dag = daggy::Dag::new();
        let indexes = unit
            .operators
            .iter()
            .map(|id| (*id, dag.add_node(*id)))
            .collect::<HashMap<_, _>>();
        for (id, source) in &indexes {
            for (_, partner) in self.operator(*id)?.outputs.connected() {
                if let PortOwner::Operator(target) = &partner.owner {
                    if let Some(target) = indexes.get(target) {
                        dag.add_edge(*source, *target, ())?;
                    }
                }
            }
        }
        Ok((dag, indexes))
    }
}

fn validate_free<P: Clone>(
    ports: &Ports<P>,
    name: &str,
    label: impl FnOnce() -> String,
) -> Result<(), ProcessError> {
    match ports.get(name) {
        Some(port) if port.is_connected() => Err(ProcessError::PortAlreadyConnected(label())),
        Some(_) => Ok(()),
        None if ports.can_provide(name, ports.next_extender_index()) => Ok(()),
        None => Err(ProcessError::InvalidPort(label())),
    }
}

fn first_connected<P: Clone>(ports: &Ports<P>) -> Option<String> {
    ports.connected().next().map(|(name, _)| name.to_string())
}
