use crate::description::OperatorService;
use crate::node::{InputPortRef, OperatorId, OutputPortRef, UnitId};
use crate::Process;
use opflow_types::models::library::OperatorLibrary;

pub(crate) const TEST_LIBRARY: &str = r#"
operators:
  - key: source
    name: Source
    outputs: [result]
  - key: sink
    name: Sink
    inputs: [result]
  - key: filter
    name: Filter
    inputs: [input]
    outputs: [result, original]
  - key: sampler
    name: Sampler
    inputs: [input]
    outputs: [result, original]
  - key: learner
    name: Learner
    inputs: [input]
    outputs: [model]
  - key: union
    name: Union
    input_extender: input
    outputs: [union]
  - key: multiply
    name: Multiply
    inputs: [input]
    output_extender: output
  - key: validation
    name: Validation
    inputs: [input]
    outputs: [result]
    subprocesses:
      - name: Training
        inner_sources: [training]
        inner_sinks: [model]
      - name: Testing
        inner_sources: [test]
        inner_sinks: [performance]
  - key: loop
    name: Loop
    inputs: [input]
    outputs: [result]
    subprocesses:
      - name: Iteration
        inner_sources: [training]
        inner_sinks: [output]
  - key: legacy
    name: Legacy
    inputs: [input]
    outputs: [result]
    disabled: extension not installed
"#;

pub(crate) fn test_service() -> OperatorService {
    OperatorService::new(OperatorLibrary::from_yaml_str(TEST_LIBRARY).unwrap())
}

/// Creates an operator and appends it to the main unit.
pub(crate) fn add(process: &mut Process, service: &OperatorService, key: &str) -> OperatorId {
    let unit = process.main_unit();
    add_to(process, service, unit, key)
}

pub(crate) fn add_to(
    process: &mut Process,
    service: &OperatorService,
    unit: UnitId,
    key: &str,
) -> OperatorId {
    let id = service.create_operator(process, key).unwrap();
    process.add_operator(unit, id, None).unwrap();
    id
}

pub(crate) fn connect(
    process: &mut Process,
    from: OperatorId,
    from_port: &str,
    to: OperatorId,
    to_port: &str,
) {
    process
        .connect(
            &OutputPortRef::operator(from, from_port),
            &InputPortRef::operator(to, to_port),
        )
        .unwrap();
}

pub(crate) fn output_partner(
    process: &Process,
    operator: OperatorId,
    port: &str,
) -> Option<InputPortRef> {
    process
        .output_port(&OutputPortRef::operator(operator, port))
        .unwrap()
        .partner()
        .cloned()
}

pub(crate) fn input_partner(
    process: &Process,
    operator: OperatorId,
    port: &str,
) -> Option<OutputPortRef> {
    process
        .input_port(&InputPortRef::operator(operator, port))
        .unwrap()
        .partner()
        .cloned()
}

pub(crate) fn subprocess(process: &Process, operator: OperatorId, index: usize) -> UnitId {
    process.operator(operator).unwrap().subprocess(index).unwrap()
}
