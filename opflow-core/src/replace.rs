use crate::errors::ProcessError;
use crate::node::{OperatorId, PortOwner};
use crate::process::Process;
use crate::renderer::{operator_height, ProcessRendererModel, Rect};
use opflow_types::tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceReport {
    /// Name the replaced operator had.
    pub replaced: String,
    pub replacement: OperatorId,
    /// Position of both operators in their unit.
    pub position: usize,
    /// Connections and inner connections that could not be carried over.
    pub failed_reconnects: usize,
}

/// Puts the detached operator `replacement` in the place of `selected`.
///
/// Connections are carried over by port name, children of chains are moved into the
/// subprocesses both operators have in common. Whatever cannot be matched is dropped and
/// counted in the report; nothing is rolled back. Returns `None` if `selected` is not
/// part of a unit.
pub fn replace_operator(
    process: &mut Process,
    renderer: &mut ProcessRendererModel,
    selected: OperatorId,
    replacement: OperatorId,
) -> Result<Option<ReplaceReport>, ProcessError> {
    let Some(parent) = process.operator(selected)?.parent() else {
        return Ok(None);
    };
    let new_operator = process.operator(replacement)?;
    if new_operator.parent().is_some() || replacement == process.root() {
        return Err(ProcessError::AlreadyAttached(new_operator.name().to_string()));
    }
    let replaced = process.operator(selected)?.name().to_string();

    // remember the connections so they can be restored on the replacement
    let snapshot = process.snapshot_and_lock(&PortOwner::Operator(selected))?;
    process.disconnect_all(&PortOwner::Operator(selected))?;

    let mut failed_reconnects = 0;

    // carry over children where both are chains
    let old_chain = process.operator(selected)?;
    let new_chain = process.operator(replacement)?;
    if old_chain.is_chain() && new_chain.is_chain() {
        let common = old_chain
            .subprocesses()
            .iter()
            .copied()
            .zip(new_chain.subprocesses().iter().copied())
            .collect::<Vec<_>>();
        for (old_subprocess, new_subprocess) in common {
            failed_reconnects += process.steal_operators_from(new_subprocess, old_subprocess)?;
        }
    }

    let position = process.remove_operator(selected)?;
    process.add_operator(parent, replacement, Some(position))?;

    failed_reconnects += process.restore_connections(snapshot, &PortOwner::Operator(replacement))?;

    // swap the box in place
    let rect = match renderer.operator_rect(selected) {
        Some(rect) => rect,
        None => ProcessRendererModel::default_rect(process.operator(selected)?, position),
    };
    let height = operator_height(process.operator(replacement)?);
    renderer.set_operator_rect(replacement, Rect { height, ..rect });
    for id in process.subtree(selected)? {
        renderer.forget_operator(id);
    }
    process.discard(selected)?;
    renderer.select_and_show(process, replacement)?;

    if failed_reconnects > 0 {
        warn!(
            "Replaced {} by {}, {} connection(s) could not be restored",
            replaced,
            process.operator(replacement)?.name(),
            failed_reconnects
        );
    } else {
        info!(
            "Replaced {} by {}",
            replaced,
            process.operator(replacement)?.name()
        );
    }

    Ok(Some(ReplaceReport {
        replaced,
        replacement,
        position,
        failed_reconnects,
    }))
}
