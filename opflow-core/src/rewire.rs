use crate::errors::ProcessError;
use crate::node::{InputPortRef, OutputPortRef, PortOwner, UnitId};
use crate::process::Process;
use opflow_types::indexmap::{IndexMap, IndexSet};
use opflow_types::tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
/// The connections of one port owner keyed by its port names, taken before rewiring it.
pub struct ConnectionSnapshot {
    owner: PortOwner,
    /// Own output port name -> the input port it fed.
    outgoing: IndexMap<String, InputPortRef>,
    /// Own input port name -> the output port feeding it.
    incoming: IndexMap<String, OutputPortRef>,
}

impl ConnectionSnapshot {
    pub fn owner(&self) -> &PortOwner {
        &self.owner
    }

    pub fn outgoing(&self) -> &IndexMap<String, InputPortRef> {
        &self.outgoing
    }

    pub fn incoming(&self) -> &IndexMap<String, OutputPortRef> {
        &self.incoming
    }

    pub fn len(&self) -> usize {
        self.outgoing.len() + self.incoming.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Process {
    /// Records every connection of `owner` and locks both ends of each of them, so that
    /// port extenders keep the ports while they are free.
    pub fn snapshot_and_lock(&mut self, owner: &PortOwner) -> Result<ConnectionSnapshot, ProcessError> {
        let outgoing = self
            .output_ports(owner)?
            .connected()
            .map(|(name, to)| (name.to_string(), to.clone()))
            .collect::<IndexMap<_, _>>();
        let incoming = self
            .input_ports(owner)?
            .connected()
            .map(|(name, from)| (name.to_string(), from.clone()))
            .collect::<IndexMap<_, _>>();

        for (name, to) in &outgoing {
            self.output_port_mut(&OutputPortRef::new(owner.clone(), name))?
                .set_locked(true);
            self.input_port_mut(to)?.set_locked(true);
        }
        for (name, from) in &incoming {
            self.input_port_mut(&InputPortRef::new(owner.clone(), name))?
                .set_locked(true);
            self.output_port_mut(from)?.set_locked(true);
        }

        Ok(ConnectionSnapshot {
            owner: owner.clone(),
            outgoing,
            incoming,
        })
    }

    /// Reconnects the snapshotted partners to the same-named ports of `owner` and releases
    /// the snapshot's locks. Returns the number of connections that could not be restored.
    ///
    /// The partners of abandoned connections stay locked until every other connection is
    /// back, so that their extenders cannot renumber ports that are still waiting.
    pub fn restore_connections(
        &mut self,
        snapshot: ConnectionSnapshot,
        owner: &PortOwner,
    ) -> Result<usize, ProcessError> {
        let ConnectionSnapshot {
            owner: old_owner,
            outgoing,
            incoming,
        } = snapshot;
        let mut abandoned_inputs = vec![];
        let mut abandoned_outputs = vec![];

        for (name, to) in outgoing {
            let from = OutputPortRef::new(owner.clone(), &name);
            let outputs = self.output_ports(owner)?;
            let available = outputs.can_provide(&name, outputs.next_extender_index());
            if available && self.reconnect(&from, &to) {
                self.input_port_mut(&to)?.set_locked(false);
            } else {
                debug!("Cannot restore connection from {name} to {}", self.input_label(&to));
                abandoned_inputs.push(to);
            }
        }
        for (name, from) in incoming {
            let to = InputPortRef::new(owner.clone(), &name);
            let inputs = self.input_ports(owner)?;
            let available = inputs.can_provide(&name, inputs.next_extender_index());
            if available && self.reconnect(&from, &to) {
                self.output_port_mut(&from)?.set_locked(false);
            } else {
                debug!("Cannot restore connection from {} to {name}", self.output_label(&from));
                abandoned_outputs.push(from);
            }
        }

        let failed = abandoned_inputs.len() + abandoned_outputs.len();
        for to in &abandoned_inputs {
            self.input_port_mut(to)?.set_locked(false);
        }
        for from in &abandoned_outputs {
            self.output_port_mut(from)?.set_locked(false);
        }
        self.set_locks(&old_owner, false)?;

        let mut touched = IndexSet::from([old_owner, owner.clone()]);
        touched.extend(abandoned_inputs.into_iter().map(|to| to.owner));
        touched.extend(abandoned_outputs.into_iter().map(|from| from.owner));
        for owner in touched {
            self.refresh_extenders(&owner)?;
        }
        Ok(failed)
    }

    fn reconnect(&mut self, from: &OutputPortRef, to: &InputPortRef) -> bool {
        match self.connect(from, to) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Failed to reconnect {} to {}: {}",
                    self.output_label(from),
                    self.input_label(to),
                    e
                );
                false
            }
        }
    }

    /// Moves every operator of `source` to the end of `target`, keeping the connections
    /// among them, and rewires `source`'s inner ports to the same-named inner ports of
    /// `target`. Returns the number of inner connections that could not be carried over.
    pub fn steal_operators_from(
        &mut self,
        target: UnitId,
        source: UnitId,
    ) -> Result<usize, ProcessError> {
        if target == source {
            return Ok(0);
        }
        let mut owner = self.unit(target)?.owner;
        loop {
            match self.operator(owner)?.parent() {
                Some(parent) if parent == source => {
                    return Err(ProcessError::NestedIntoItself(
                        self.operator(self.unit(source)?.owner())?.name().to_string(),
                    ))
                }
                Some(parent) => owner = self.unit(parent)?.owner(),
                None => break,
            }
        }

        let source_owner = PortOwner::Unit(source);
        let snapshot = self.snapshot_and_lock(&source_owner)?;
        self.disconnect_all(&source_owner)?;

        let source_registered = self.is_registered(self.unit(source)?.owner());
        let target_registered = self.is_registered(self.unit(target)?.owner());
        let moved = std::mem::take(&mut self.unit_mut(source)?.operators);
        for id in &moved {
            if source_registered {
                self.unregister_names(*id)?;
            }
        }
        for id in &moved {
            self.unit_mut(target)?.operators.push(*id);
            self.operator_mut(*id)?.parent = Some(target);
            if target_registered {
                self.register_names(*id)?;
            }
        }

        let failed = self.restore_connections(snapshot, &PortOwner::Unit(target))?;
        debug!(
            "Moved {} operators from {} to {}, {} inner connections lost",
            moved.len(),
            source,
            target,
            failed
        );
        Ok(failed)
    }
}
