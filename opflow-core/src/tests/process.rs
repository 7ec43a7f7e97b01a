use crate::errors::ProcessError;
use crate::node::{Connection, InputPortRef, OutputPortRef, PortOwner};
use crate::tests::common::{add, add_to, connect, input_partner, output_partner, subprocess, test_service};
use crate::Process;
use opflow_types::constants::{MAIN_PROCESS_NAME, ROOT_OPERATOR_KEY, ROOT_OPERATOR_NAME};

#[test]
fn test_new_process() {
    let process = Process::new();
    let root = process.operator(process.root()).unwrap();
    assert_eq!(root.name(), ROOT_OPERATOR_NAME);
    assert_eq!(root.key(), ROOT_OPERATOR_KEY);
    assert!(root.parent().is_none());
    assert_eq!(root.subprocesses(), &[process.main_unit()]);

    let main = process.unit(process.main_unit()).unwrap();
    assert_eq!(main.name(), MAIN_PROCESS_NAME);
    assert!(main.operators().is_empty());
    assert!(main.inner_sources().contains("input 1"));
    assert!(main.inner_sinks().contains("result 1"));
    assert_eq!(
        process.operator_by_name(ROOT_OPERATOR_NAME),
        Some(process.root())
    );
}

#[test]
fn test_names_are_made_unique() {
    let service = test_service();
    let mut process = Process::new();
    let first = add(&mut process, &service, "filter");
    let second = add(&mut process, &service, "filter");
    let third = add(&mut process, &service, "filter");
    assert_eq!(process.operator(first).unwrap().name(), "Filter");
    assert_eq!(process.operator(second).unwrap().name(), "Filter (2)");
    assert_eq!(process.operator(third).unwrap().name(), "Filter (3)");

    assert_eq!(process.remove_operator(second).unwrap(), 1);
    assert_eq!(process.operator_by_name("Filter (2)"), None);
    let fourth = add(&mut process, &service, "filter");
    assert_eq!(process.operator(fourth).unwrap().name(), "Filter (2)");

    assert_eq!(process.rename_operator(fourth, "Renamed").unwrap(), "Renamed");
    assert_eq!(
        process.rename_operator(first, "Renamed").unwrap(),
        "Renamed (2)"
    );
    assert_eq!(process.operator_by_name("Renamed (2)"), Some(first));
    assert_eq!(process.operator_by_name("Filter"), None);
}

#[test]
fn test_add_operator_at_index() {
    let service = test_service();
    let mut process = Process::new();
    let a = add(&mut process, &service, "source");
    let b = add(&mut process, &service, "sink");
    let c = service.create_operator(&mut process, "filter").unwrap();
    assert!(!process.is_registered(c));
    assert_eq!(
        process.add_operator(process.main_unit(), c, Some(1)).unwrap(),
        1
    );
    assert!(process.is_registered(c));
    let main = process.unit(process.main_unit()).unwrap();
    assert_eq!(main.operators(), &[a, c, b]);

    let d = service.create_operator(&mut process, "filter").unwrap();
    assert_eq!(
        process.add_operator(process.main_unit(), d, Some(42)).unwrap(),
        3
    );
    assert!(matches!(
        process.add_operator(process.main_unit(), d, None),
        Err(ProcessError::AlreadyAttached(_))
    ));
    assert!(matches!(
        process.add_operator(process.main_unit(), process.root(), None),
        Err(ProcessError::RootOperator)
    ));
}

#[test]
fn test_operator_cannot_be_nested_into_itself() {
    let service = test_service();
    let mut process = Process::new();
    let validation = service.create_operator(&mut process, "validation").unwrap();
    let training = subprocess(&process, validation, 0);
    assert!(matches!(
        process.add_operator(training, validation, None),
        Err(ProcessError::NestedIntoItself(_))
    ));
}

#[test]
fn test_connect_and_disconnect() {
    let service = test_service();
    let mut process = Process::new();
    let source = add(&mut process, &service, "source");
    let filter = add(&mut process, &service, "filter");
    connect(&mut process, source, "result", filter, "input");

    assert_eq!(
        output_partner(&process, source, "result"),
        Some(InputPortRef::operator(filter, "input"))
    );
    assert_eq!(
        input_partner(&process, filter, "input"),
        Some(OutputPortRef::operator(source, "result"))
    );
    assert!(process.operator(source).unwrap().is_connected());

    let to = process
        .disconnect_output(&OutputPortRef::operator(source, "result"))
        .unwrap();
    assert_eq!(to, Some(InputPortRef::operator(filter, "input")));
    assert_eq!(output_partner(&process, source, "result"), None);
    assert_eq!(input_partner(&process, filter, "input"), None);
    assert_eq!(
        process
            .disconnect_output(&OutputPortRef::operator(source, "result"))
            .unwrap(),
        None
    );
}

#[test]
fn test_connect_errors() {
    let service = test_service();
    let mut process = Process::new();
    let first = add(&mut process, &service, "source");
    let second = add(&mut process, &service, "source");
    let filter = add(&mut process, &service, "filter");
    connect(&mut process, first, "result", filter, "input");

    assert!(matches!(
        process.connect(
            &OutputPortRef::operator(second, "result"),
            &InputPortRef::operator(filter, "input"),
        ),
        Err(ProcessError::PortAlreadyConnected(_))
    ));
    assert!(matches!(
        process.connect(
            &OutputPortRef::operator(second, "missing"),
            &InputPortRef::operator(filter, "input"),
        ),
        Err(ProcessError::InvalidPort(_))
    ));

    let detached = service.create_operator(&mut process, "sink").unwrap();
    assert!(matches!(
        process.connect(
            &OutputPortRef::operator(second, "result"),
            &InputPortRef::operator(detached, "result"),
        ),
        Err(ProcessError::NotInSameUnit { .. })
    ));

    let validation = add(&mut process, &service, "validation");
    let training = subprocess(&process, validation, 0);
    let nested = add_to(&mut process, &service, training, "sink");
    assert!(matches!(
        process.connect(
            &OutputPortRef::operator(second, "result"),
            &InputPortRef::operator(nested, "result"),
        ),
        Err(ProcessError::NotInSameUnit { .. })
    ));
}

#[test]
fn test_cycles_are_rejected() {
    let service = test_service();
    let mut process = Process::new();
    let a = add(&mut process, &service, "filter");
    let b = add(&mut process, &service, "filter");
    connect(&mut process, a, "result", b, "input");

    assert!(matches!(
        process.connect(
            &OutputPortRef::operator(b, "result"),
            &InputPortRef::operator(a, "input"),
        ),
        Err(ProcessError::WouldCycle)
    ));
    assert!(matches!(
        process.connect(
            &OutputPortRef::operator(a, "original"),
            &InputPortRef::operator(a, "input"),
        ),
        Err(ProcessError::WouldCycle)
    ));
    assert_eq!(input_partner(&process, a, "input"), None);
}

#[test]
fn test_execution_order() {
    let service = test_service();
    let mut process = Process::new();
    let sink = add(&mut process, &service, "sink");
    let filter = add(&mut process, &service, "filter");
    let source = add(&mut process, &service, "source");
    let learner = add(&mut process, &service, "learner");
    connect(&mut process, source, "result", filter, "input");
    connect(&mut process, filter, "result", sink, "result");

    assert_eq!(
        process.execution_order(process.main_unit()).unwrap(),
        vec![source, filter, sink, learner]
    );
}

#[test]
fn test_connections_are_listed_in_unit_order() {
    let service = test_service();
    let mut process = Process::new();
    let main = process.main_unit();
    let filter = add(&mut process, &service, "filter");
    let sink = add(&mut process, &service, "sink");
    connect(&mut process, filter, "result", sink, "result");
    process
        .connect(
            &OutputPortRef::inner_source(main, "input 1"),
            &InputPortRef::operator(filter, "input"),
        )
        .unwrap();
    process
        .connect(
            &OutputPortRef::operator(filter, "original"),
            &InputPortRef::inner_sink(main, "result 1"),
        )
        .unwrap();

    assert_eq!(
        process.connections(main).unwrap(),
        vec![
            Connection::new(
                OutputPortRef::inner_source(main, "input 1"),
                InputPortRef::operator(filter, "input"),
            ),
            Connection::new(
                OutputPortRef::operator(filter, "result"),
                InputPortRef::operator(sink, "result"),
            ),
            Connection::new(
                OutputPortRef::operator(filter, "original"),
                InputPortRef::inner_sink(main, "result 1"),
            ),
        ]
    );
    let unit = process.unit(main).unwrap();
    assert_eq!(
        unit.inner_sources().names().collect::<Vec<_>>(),
        vec!["input 1", "input 2"]
    );
    assert_eq!(
        unit.inner_sinks().names().collect::<Vec<_>>(),
        vec!["result 1", "result 2"]
    );
}

#[test]
fn test_extender_renames_are_propagated() {
    let service = test_service();
    let mut process = Process::new();
    let a = add(&mut process, &service, "source");
    let b = add(&mut process, &service, "source");
    let c = add(&mut process, &service, "source");
    let union = add(&mut process, &service, "union");
    connect(&mut process, a, "result", union, "input 1");
    connect(&mut process, b, "result", union, "input 2");
    connect(&mut process, c, "result", union, "input 3");
    assert_eq!(
        process
            .operator(union)
            .unwrap()
            .input_ports()
            .names()
            .collect::<Vec<_>>(),
        vec!["input 1", "input 2", "input 3", "input 4"]
    );

    process
        .disconnect_input(&InputPortRef::operator(union, "input 1"))
        .unwrap();
    process
        .disconnect_input(&InputPortRef::operator(union, "input 2"))
        .unwrap();

    let inputs = process.operator(union).unwrap().input_ports();
    assert_eq!(
        inputs.names().collect::<Vec<_>>(),
        vec!["input 1", "input 2"]
    );
    assert_eq!(
        output_partner(&process, c, "result"),
        Some(InputPortRef::operator(union, "input 2"))
    );
    assert_eq!(
        input_partner(&process, union, "input 2"),
        Some(OutputPortRef::operator(c, "result"))
    );
}

#[test]
fn test_connect_only_grows_extender_by_one() {
    let service = test_service();
    let mut process = Process::new();
    let source = add(&mut process, &service, "source");
    let union = add(&mut process, &service, "union");

    for port in ["input 3", "input 3000000", "input 18446744073709551615"] {
        assert!(matches!(
            process.connect(
                &OutputPortRef::operator(source, "result"),
                &InputPortRef::operator(union, port),
            ),
            Err(ProcessError::InvalidPort(_))
        ));
    }
    assert_eq!(process.operator(union).unwrap().input_ports().len(), 1);

    connect(&mut process, source, "result", union, "input 2");
    assert_eq!(
        process
            .operator(union)
            .unwrap()
            .input_ports()
            .names()
            .collect::<Vec<_>>(),
        vec!["input 1", "input 2"]
    );
}

#[test]
fn test_locked_ports_survive_disconnects() {
    let service = test_service();
    let mut process = Process::new();
    let a = add(&mut process, &service, "source");
    let b = add(&mut process, &service, "source");
    let union = add(&mut process, &service, "union");
    connect(&mut process, a, "result", union, "input 1");
    connect(&mut process, b, "result", union, "input 2");

    let first = InputPortRef::operator(union, "input 1");
    process.lock_input(&first).unwrap();
    process.disconnect_input(&first).unwrap();
    assert!(process.input_port(&first).unwrap().is_locked());
    assert_eq!(
        input_partner(&process, union, "input 2"),
        Some(OutputPortRef::operator(b, "result"))
    );

    process.unlock_input(&first).unwrap();
    assert!(!process.input_port(&first).unwrap().is_locked());
}

#[test]
fn test_remove_and_discard() {
    let service = test_service();
    let mut process = Process::new();
    let source = add(&mut process, &service, "source");
    let validation = add(&mut process, &service, "validation");
    let testing = subprocess(&process, validation, 1);
    let nested = add_to(&mut process, &service, testing, "filter");
    connect(&mut process, source, "result", validation, "input");

    assert_eq!(
        process.subtree(process.root()).unwrap(),
        vec![process.root(), source, validation, nested]
    );
    assert!(process.is_registered(nested));

    assert_eq!(process.remove_operator(validation).unwrap(), 1);
    assert_eq!(output_partner(&process, source, "result"), None);
    assert!(!process.is_registered(nested));
    assert_eq!(process.operator_by_name("Filter"), None);

    process.discard(validation).unwrap();
    assert!(process.operator(validation).is_err());
    assert!(process.operator(nested).is_err());
    assert!(matches!(
        process.discard(source),
        Err(ProcessError::AlreadyAttached(_))
    ));
    assert!(matches!(
        process.remove_operator(process.root()),
        Err(ProcessError::RootOperator)
    ));
    assert!(matches!(
        process.disconnect_all(&PortOwner::Operator(validation)),
        Err(ProcessError::UnknownOperator(_))
    ));
}
