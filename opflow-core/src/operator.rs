use crate::node::{InputPortRef, OperatorId, OutputPortRef, UnitId};
use crate::ports::Ports;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorKind {
    Simple,
    /// A composite operator and its subprocesses, in order.
    Chain(Vec<UnitId>),
}

#[derive(Debug)]
/// A node of a process.
pub struct Operator {
    pub(crate) id: OperatorId,
    pub(crate) name: String,
    pub(crate) key: String,
    pub(crate) inputs: Ports<OutputPortRef>,
    pub(crate) outputs: Ports<InputPortRef>,
    pub(crate) kind: OperatorKind,
    /// The unit this operator is part of; `None` for the root and detached operators.
    pub(crate) parent: Option<UnitId>,
}

impl Operator {
    pub fn id(&self) -> OperatorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key of the description the operator was created from.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn input_ports(&self) -> &Ports<OutputPortRef> {
        &self.inputs
    }

    pub fn output_ports(&self) -> &Ports<InputPortRef> {
        &self.outputs
    }

    pub fn kind(&self) -> &OperatorKind {
        &self.kind
    }

    pub fn is_chain(&self) -> bool {
        matches!(self.kind, OperatorKind::Chain(_))
    }

    pub fn subprocesses(&self) -> &[UnitId] {
        match &self.kind {
            OperatorKind::Simple => &[],
            OperatorKind::Chain(units) => units,
        }
    }

    pub fn number_of_subprocesses(&self) -> usize {
        self.subprocesses().len()
    }

    pub fn subprocess(&self, index: usize) -> Option<UnitId> {
        self.subprocesses().get(index).copied()
    }

    pub fn parent(&self) -> Option<UnitId> {
        self.parent
    }

    pub fn is_connected(&self) -> bool {
        self.inputs.connected().next().is_some() || self.outputs.connected().next().is_some()
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.key)
    }
}
