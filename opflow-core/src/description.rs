use crate::errors::OperatorCreationError;
use crate::node::OperatorId;
use crate::operator::Operator;
use crate::process::Process;
use opflow_types::constants::{MAIN_PROCESS_NAME, ROOT_OPERATOR_KEY, ROOT_OPERATOR_NAME};
use opflow_types::indexmap::IndexMap;
use opflow_types::models::library::{OperatorDescription, OperatorLibrary, SubprocessDescription};
use opflow_types::tracing::{debug, warn};
use std::collections::HashSet;

const BUILTIN_LIBRARY: &str = include_str!("../library/operators.yaml");

/// Description of the operator every process is rooted at.
pub fn root_description() -> OperatorDescription {
    let mut main = SubprocessDescription::new(MAIN_PROCESS_NAME);
    main.source_extender = Some("input".to_string());
    main.sink_extender = Some("result".to_string());

    let mut root = OperatorDescription::new(ROOT_OPERATOR_KEY, ROOT_OPERATOR_NAME);
    root.group = "process".to_string();
    root.subprocesses = vec![main];
    root
}

/// The operator library shipped with opflow.
pub fn builtin_library() -> OperatorLibrary {
    OperatorLibrary::from_yaml_str(BUILTIN_LIBRARY)
        .unwrap_or_else(|e| panic!("BUG: built-in operator library is invalid: {e}"))
}

#[derive(Debug, Clone, Default)]
/// Creates operators from the descriptions of a library.
pub struct OperatorService {
    descriptions: IndexMap<String, OperatorDescription>,
}

impl OperatorService {
    pub fn new(library: OperatorLibrary) -> Self {
        let mut descriptions = IndexMap::new();
        for description in library.operators {
            if description.key == ROOT_OPERATOR_KEY {
                warn!("Ignoring library entry with reserved key {}", description.key);
                continue;
            }
            if let Some(previous) = descriptions.insert(description.key.clone(), description) {
                warn!("Operator description {} is defined more than once", previous.key);
            }
        }
        Self { descriptions }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_library())
    }

    pub fn description(&self, key: &str) -> Option<&OperatorDescription> {
        self.descriptions.get(key)
    }

    pub fn descriptions(&self) -> impl Iterator<Item = &OperatorDescription> {
        self.descriptions.values()
    }

    /// Instantiates a detached operator in `process`.
    pub fn create_operator(
        &self,
        process: &mut Process,
        key: &str,
    ) -> Result<OperatorId, OperatorCreationError> {
        let description = self
            .description(key)
            .ok_or_else(|| OperatorCreationError::NoDescription(key.to_string()))?;
        if let Some(reason) = &description.disabled {
            return Err(OperatorCreationError::OperatorDisabled {
                key: key.to_string(),
                reason: reason.clone(),
            });
        }
        validate_description(description).map_err(|reason| {
            OperatorCreationError::InvalidDescription {
                key: key.to_string(),
                reason,
            }
        })?;
        let operator = process.instantiate(description);
        debug!("Created operator {} from {}", operator, key);
        Ok(operator)
    }

    /// The descriptions `operator` can be replaced by. Simple operators can be replaced by
    /// simple operators and chains; chains only by other chains.
    pub fn replacement_candidates(&self, operator: &Operator) -> Vec<&OperatorDescription> {
        let only_chains = operator.is_chain();
        self.descriptions()
            .filter(|description| description.is_enabled())
            .filter(|description| description.key != operator.key())
            .filter(|description| !only_chains || description.is_chain())
            .collect()
    }
}

fn validate_description(description: &OperatorDescription) -> Result<(), String> {
    validate_ports("input", &description.inputs, description.input_extender.as_deref())?;
    validate_ports("output", &description.outputs, description.output_extender.as_deref())?;
    for subprocess in &description.subprocesses {
        validate_ports(
            "inner source",
            &subprocess.inner_sources,
            subprocess.source_extender.as_deref(),
        )?;
        validate_ports(
            "inner sink",
            &subprocess.inner_sinks,
            subprocess.sink_extender.as_deref(),
        )?;
    }
    Ok(())
}

/// Port names of one group must be unique and must not look like ports of its extender.
fn validate_ports(kind: &str, names: &[String], extender: Option<&str>) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(format!("duplicate {kind} port {name}"));
        }
        let clashes = extender.is_some_and(|prefix| {
            name.strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix(' '))
                .is_some_and(|number| number.parse::<usize>().is_ok())
        });
        if clashes {
            return Err(format!("{kind} port {name} clashes with its port extender"));
        }
    }
    Ok(())
}
