use opflow_types::indexmap::IndexMap;

use crate::node::{InputPortRef, OutputPortRef};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A named connection point. `P` is the kind of port on the other end.
pub struct Port<P> {
    name: String,
    partner: Option<P>,
    locked: bool,
}

/// Input ports are fed by output ports.
pub type InputPort = Port<OutputPortRef>;
/// Output ports feed input ports.
pub type OutputPort = Port<InputPortRef>;

impl<P> Port<P> {
    fn new(name: String) -> Self {
        Self {
            name,
            partner: None,
            locked: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn partner(&self) -> Option<&P> {
        self.partner.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.partner.is_some()
    }

    /// Locked ports are kept by port extenders even while they are free.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn set_partner(&mut self, partner: Option<P>) -> Option<P> {
        std::mem::replace(&mut self.partner, partner)
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

/// A port whose name changed while connected, and the port it is connected to.
pub(crate) type Renamed<P> = (String, P);

#[derive(Debug, Clone)]
/// An ordered group of ports of one direction.
///
/// The first `fixed` ports are declared by the operator description. If the group has
/// an extender, the remaining ports are named `"<prefix> <n>"` and are kept so that there
/// is always exactly one free, unlocked port among them.
pub struct Ports<P> {
    ports: IndexMap<String, Port<P>>,
    fixed: usize,
    extender: Option<String>,
}

impl<P: Clone> Ports<P> {
    pub(crate) fn new(names: &[String], extender: Option<String>) -> Self {
        let ports = names
            .iter()
            .map(|name| (name.clone(), Port::new(name.clone())))
            .collect::<IndexMap<_, _>>();
        let mut ports = Self {
            fixed: ports.len(),
            ports,
            extender,
        };
        if let Some(prefix) = &ports.extender {
            let name = extender_port_name(prefix, 1);
            ports.ports.insert(name.clone(), Port::new(name));
        }
        ports
    }

    pub fn get(&self, name: &str) -> Option<&Port<P>> {
        self.ports.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Port<P>> {
        self.ports.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ports.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Port<P>> {
        self.ports.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Port<P>> {
        self.ports.values_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ports.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Connected ports with their partners, in port order.
    pub fn connected(&self) -> impl Iterator<Item = (&str, &P)> {
        self.ports
            .values()
            .filter_map(|port| port.partner().map(|partner| (port.name(), partner)))
    }

    pub fn extender(&self) -> Option<&str> {
        self.extender.as_deref()
    }

    /// Number of ports the extender currently holds.
    pub fn extender_len(&self) -> usize {
        self.ports.len() - self.fixed
    }

    /// Highest extender port number a single connection may refer to.
    pub fn next_extender_index(&self) -> usize {
        self.extender_len() + 1
    }

    /// Whether `name` exists or is an extender port numbered at most `max_index`, which
    /// `ensure_port` would create.
    pub fn can_provide(&self, name: &str, max_index: usize) -> bool {
        self.contains(name)
            || self
                .extender_index(name)
                .is_some_and(|index| index <= max_index)
    }

    /// Creates the extender ports up to `name`, numbered at most `max_index`. Returns
    /// whether `name` exists afterwards.
    pub(crate) fn ensure_port(&mut self, name: &str, max_index: usize) -> bool {
        if self.contains(name) {
            return true;
        }
        let (Some(index), Some(prefix)) = (self.extender_index(name), self.extender.clone()) else {
            return false;
        };
        if index > max_index {
            return false;
        }
        for n in self.extender_len() + 1..=index {
            let port_name = extender_port_name(&prefix, n);
            self.ports.insert(port_name.clone(), Port::new(port_name));
        }
        true
    }

    /// Drops surplus free extender ports, adds a spare one if needed and renumbers.
    ///
    /// Returns the connected ports that were renamed, so that their partners can be updated.
    pub(crate) fn update_extender(&mut self) -> Vec<Renamed<P>> {
        let Some(prefix) = self.extender.clone() else {
            return vec![];
        };

        let managed = self
            .ports
            .drain(self.fixed..)
            .map(|(_, port)| port)
            .collect::<Vec<_>>();
        let mut kept = Vec::with_capacity(managed.len() + 1);
        let mut found_free = false;
        for port in managed {
            if !port.is_connected() && !port.is_locked() {
                if found_free {
                    continue;
                }
                found_free = true;
            }
            kept.push(port);
        }
        if !found_free {
            kept.push(Port::new(String::new()));
        }

        let mut renamed = vec![];
        for (n, mut port) in kept.into_iter().enumerate() {
            let name = extender_port_name(&prefix, n + 1);
            if port.name != name {
                if let Some(partner) = port.partner() {
                    renamed.push((name.clone(), partner.clone()));
                }
                port.name = name.clone();
            }
            self.ports.insert(name, port);
        }
        renamed
    }

    fn extender_index(&self, name: &str) -> Option<usize> {
        let prefix = self.extender.as_deref()?;
        let index = name
            .strip_prefix(prefix)?
            .strip_prefix(' ')?
            .parse::<usize>()
            .ok()?;
        (index > 0 && extender_port_name(prefix, index) == name).then_some(index)
    }
}

pub fn extender_port_name(prefix: &str, n: usize) -> String {
    format!("{prefix} {n}")
}
