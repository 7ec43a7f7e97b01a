use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Handle of an operator inside a `Process`.
pub struct OperatorId(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Handle of an execution unit (subprocess) inside a `Process`.
pub struct UnitId(pub(crate) u32);

impl Display for OperatorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

impl Display for UnitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// Ports belong either to an operator or to the boundary of an execution unit.
pub enum PortOwner {
    Operator(OperatorId),
    Unit(UnitId),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// An operator output, or an inner source of a unit.
pub struct OutputPortRef {
    pub owner: PortOwner,
    pub name: String,
}

impl OutputPortRef {
    pub fn new(owner: PortOwner, name: &str) -> Self {
        Self {
            owner,
            name: name.to_string(),
        }
    }

    pub fn operator(operator: OperatorId, name: &str) -> Self {
        Self::new(PortOwner::Operator(operator), name)
    }

    pub fn inner_source(unit: UnitId, name: &str) -> Self {
        Self::new(PortOwner::Unit(unit), name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// An operator input, or an inner sink of a unit.
pub struct InputPortRef {
    pub owner: PortOwner,
    pub name: String,
}

impl InputPortRef {
    pub fn new(owner: PortOwner, name: &str) -> Self {
        Self {
            owner,
            name: name.to_string(),
        }
    }

    pub fn operator(operator: OperatorId, name: &str) -> Self {
        Self::new(PortOwner::Operator(operator), name)
    }

    pub fn inner_sink(unit: UnitId, name: &str) -> Self {
        Self::new(PortOwner::Unit(unit), name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    pub from: OutputPortRef,
    pub to: InputPortRef,
}

impl Connection {
    pub fn new(from: OutputPortRef, to: InputPortRef) -> Self {
        Self { from, to }
    }
}
