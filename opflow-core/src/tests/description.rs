use crate::description::{builtin_library, root_description, OperatorService};
use crate::errors::OperatorCreationError;
use crate::node::{InputPortRef, OperatorId};
use crate::tests::common::{add, test_service};
use crate::Process;
use opflow_types::constants::ROOT_OPERATOR_KEY;
use opflow_types::models::library::OperatorLibrary;

#[test]
fn test_builtin_library() {
    let library = builtin_library();
    assert!(library.get(ROOT_OPERATOR_KEY).is_none());
    let cross_validation = library.get("cross_validation").unwrap();
    assert!(cross_validation.is_chain());
    assert_eq!(cross_validation.subprocesses.len(), 2);
    assert!(!library.get("weka_j48").unwrap().is_enabled());

    let service = OperatorService::builtin();
    assert_eq!(service.descriptions().count(), library.operators.len());
}

#[test]
fn test_root_description() {
    let root = root_description();
    assert!(root.is_chain());
    assert_eq!(root.subprocesses[0].source_extender.as_deref(), Some("input"));
    assert_eq!(root.subprocesses[0].sink_extender.as_deref(), Some("result"));
}

#[test]
fn test_service_skips_reserved_and_duplicate_keys() {
    let library = OperatorLibrary::from_yaml_str(
        r#"
operators:
  - key: process
    name: Fake Root
  - key: filter
    name: Filter
  - key: filter
    name: Better Filter
"#,
    )
    .unwrap();
    let service = OperatorService::new(library);
    assert!(service.description(ROOT_OPERATOR_KEY).is_none());
    assert_eq!(service.descriptions().count(), 1);
    assert_eq!(service.description("filter").unwrap().name, "Better Filter");
}

#[test]
fn test_create_operator() {
    let service = OperatorService::builtin();
    let mut process = Process::new();
    let id = service
        .create_operator(&mut process, "cross_validation")
        .unwrap();
    let operator = process.operator(id).unwrap();
    assert_eq!(operator.name(), "Cross Validation");
    assert_eq!(operator.key(), "cross_validation");
    assert!(operator.parent().is_none());
    assert_eq!(operator.number_of_subprocesses(), 2);
    assert_eq!(
        operator.output_ports().names().collect::<Vec<_>>(),
        vec!["model", "example set", "test result set", "performance 1"]
    );

    let training = process.unit(operator.subprocess(0).unwrap()).unwrap();
    assert_eq!(training.name(), "Training");
    assert_eq!(training.owner(), id);
    assert_eq!(
        training.inner_sources().names().collect::<Vec<_>>(),
        vec!["training set", "through 1"]
    );
    assert_eq!(
        training.inner_sinks().names().collect::<Vec<_>>(),
        vec!["model"]
    );
}

#[test]
fn test_create_operator_errors() {
    let service = test_service();
    let mut process = Process::new();
    assert!(matches!(
        service.create_operator(&mut process, "missing"),
        Err(OperatorCreationError::NoDescription(key)) if key == "missing"
    ));
    let error = service
        .create_operator(&mut process, "legacy")
        .unwrap_err();
    assert!(matches!(
        &error,
        OperatorCreationError::OperatorDisabled { key, .. } if key == "legacy"
    ));
    assert_eq!(
        error.to_string(),
        "Operator legacy is disabled: extension not installed"
    );
    assert_eq!(process.subtree(process.root()).unwrap().len(), 1);
}

#[test]
fn test_invalid_port_declarations_are_rejected() {
    let library = OperatorLibrary::from_yaml_str(
        r#"
operators:
  - key: dup
    name: Duplicate
    inputs: [a, a, a]
    input_extender: x
  - key: clash
    name: Clash
    outputs: [result, "result 1"]
    output_extender: result
  - key: nested
    name: Nested
    subprocesses:
      - name: Body
        inner_sinks: [model, model]
  - key: fine
    name: Fine
    inputs: [a, "x 1"]
    input_extender: y
"#,
    )
    .unwrap();
    let service = OperatorService::new(library);
    let mut process = Process::new();

    for (key, reason) in [
        ("dup", "duplicate input port a"),
        ("clash", "output port result 1 clashes with its port extender"),
        ("nested", "duplicate inner sink port model"),
    ] {
        let error = service.create_operator(&mut process, key).unwrap_err();
        assert!(matches!(
            &error,
            OperatorCreationError::InvalidDescription { key: k, reason: r } if k == key && r == reason
        ));
    }
    assert_eq!(process.subtree(process.root()).unwrap().len(), 1);

    let fine = service.create_operator(&mut process, "fine").unwrap();
    process
        .add_operator(process.main_unit(), fine, None)
        .unwrap();
    process
        .unlock_input(&InputPortRef::operator(fine, "a"))
        .unwrap();
    assert_eq!(
        process
            .operator(fine)
            .unwrap()
            .input_ports()
            .names()
            .collect::<Vec<_>>(),
        vec!["a", "x 1", "y 1"]
    );
}

fn candidate_keys<'a>(
    service: &'a OperatorService,
    process: &Process,
    operator: OperatorId,
) -> Vec<&'a str> {
    service
        .replacement_candidates(process.operator(operator).unwrap())
        .into_iter()
        .map(|description| description.key.as_str())
        .collect()
}

#[test]
fn test_replacement_candidates() {
    let service = test_service();
    let mut process = Process::new();
    let filter = add(&mut process, &service, "filter");
    let validation = add(&mut process, &service, "validation");

    assert_eq!(
        candidate_keys(&service, &process, filter),
        vec![
            "source",
            "sink",
            "sampler",
            "learner",
            "union",
            "multiply",
            "validation",
            "loop"
        ]
    );
    assert_eq!(
        candidate_keys(&service, &process, validation),
        vec!["loop"]
    );
}
