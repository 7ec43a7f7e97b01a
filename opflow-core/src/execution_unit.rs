use crate::node::{InputPortRef, OperatorId, OutputPortRef, UnitId};
use crate::ports::Ports;

#[derive(Debug)]
/// A subprocess: an ordered list of operators owned by a chain, plus the unit's inner ports.
pub struct ExecutionUnit {
    pub(crate) id: UnitId,
    pub(crate) name: String,
    pub(crate) owner: OperatorId,
    pub(crate) operators: Vec<OperatorId>,
    /// Output-kind ports handing the chain's inputs to the children.
    pub(crate) inner_sources: Ports<InputPortRef>,
    /// Input-kind ports collecting the children's results.
    pub(crate) inner_sinks: Ports<OutputPortRef>,
}

impl ExecutionUnit {
    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The chain this unit belongs to.
    pub fn owner(&self) -> OperatorId {
        self.owner
    }

    pub fn operators(&self) -> &[OperatorId] {
        &self.operators
    }

    pub fn index_of(&self, operator: OperatorId) -> Option<usize> {
        self.operators.iter().position(|id| *id == operator)
    }

    pub fn inner_sources(&self) -> &Ports<InputPortRef> {
        &self.inner_sources
    }

    pub fn inner_sinks(&self) -> &Ports<OutputPortRef> {
        &self.inner_sinks
    }
}
