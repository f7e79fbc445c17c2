//! Integration tests for the mapped accessor
//!
//! Every call runs against the scripted connector in `common`, which records
//! the resolved procedure, the bound parameters and the release order of
//! every scoped resource.

mod common;

use common::{assert_nested_release, names, row_for, sample, FailAt, MockConnector, Script, Test};
use proc_access::prelude::*;
use proc_access::marshal::ColumnMap;
use proc_access::{AccessSettings, Direction, IdWidth, ProcValue};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const CONNECTION_STRING: &str = "Server=test;Database=test";

fn mapped(script: Script) -> (MappedDataAccess, Arc<common::Probe>) {
    let (connector, probe) = MockConnector::new(script);
    let access = MappedDataAccess::new(
        connector,
        CONNECTION_STRING,
        Arc::new(ConventionResolver::new("X")),
    );
    (access, probe)
}

#[tokio::test]
async fn test_insert_returns_generated_id() {
    let (access, probe) = mapped(Script::output(42));

    let id: i32 = access
        .insert(&sample(1), OperationKind::Insert, CallOptions::new())
        .await
        .unwrap();

    assert_eq!(id, 42);
    let call = probe.last_call();
    assert_eq!(call.procedure, "X.InsertTest");
    assert_eq!(names(&call), vec!["@TestDate", "@TestString", "@TestInt", "@Id"]);
    assert_eq!(call.parameters[1].value, ProcValue::Text("String".into()));
    assert_eq!(call.parameters[2].value, ProcValue::Int(1));

    let output = &call.parameters[3];
    assert_eq!(output.direction, Direction::Output);
    assert_eq!(output.width, Some(IdWidth::Int));
    assert!(probe.balanced());
}

#[tokio::test]
async fn test_insert_output_width_follows_identifier_type() {
    async fn width_for<TID: Identifier>(value: i64) -> Option<IdWidth> {
        let (access, probe) = mapped(Script::output(value));
        let _: TID = access
            .insert(&sample(1), OperationKind::Insert, CallOptions::new())
            .await
            .unwrap();
        probe.last_call().parameters.last().and_then(|p| p.width)
    }

    assert_eq!(width_for::<u8>(7).await, Some(IdWidth::TinyInt));
    assert_eq!(width_for::<i16>(7).await, Some(IdWidth::SmallInt));
    assert_eq!(width_for::<i32>(7).await, Some(IdWidth::Int));
    assert_eq!(width_for::<i64>(7).await, Some(IdWidth::BigInt));
    assert_eq!(width_for::<u32>(7).await, Some(IdWidth::Int));
    assert_eq!(width_for::<u16>(7).await, Some(IdWidth::Int));
}

#[tokio::test]
async fn test_insert_without_output_value_fails() {
    let (access, probe) = mapped(Script::empty());

    let err = access
        .insert::<i32, Test>(&sample(1), OperationKind::Insert, CallOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        DataAccessError::MissingOutput { procedure, parameter }
            if procedure == "X.InsertTest" && parameter == "@Id"
    ));
    assert!(probe.balanced());
}

#[tokio::test]
async fn test_insert_output_out_of_range_fails() {
    let (access, _probe) = mapped(Script::output(300i64));

    let err = access
        .insert::<u8, Test>(&sample(1), OperationKind::Insert, CallOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DataAccessError::OutputConversion { .. }));
}

#[tokio::test]
async fn test_get_object_by_id_empty_result_is_not_found() {
    let (access, probe) = mapped(Script::empty());

    let err = access
        .get_object_by_id::<i32, Test>(1, OperationKind::GetObjectById, CallOptions::new())
        .await
        .unwrap_err();

    match err {
        DataAccessError::NotFound { input, procedure } => {
            assert_eq!(input, "1");
            assert_eq!(procedure, "X.GetObjectByIdTest");
        }
        other => panic!("expected NotFound, got {:?}", other),
    }

    let call = probe.last_call();
    assert_eq!(names(&call), vec!["@Id"]);
    assert_eq!(call.parameters[0].value, ProcValue::Int(1));
    assert_nested_release(&probe);
}

#[tokio::test]
async fn test_get_object_by_id_reads_first_row() {
    let expected = sample(5);
    let (access, probe) = mapped(Script::rows(vec![row_for(&expected), row_for(&sample(6))]));

    let found: Test = access
        .get_object_by_id(5i64, OperationKind::GetObjectById, CallOptions::new())
        .await
        .unwrap();

    assert_eq!(found, expected);
    assert_eq!(probe.last_call().parameters[0].value, ProcValue::BigInt(5));
    assert_nested_release(&probe);
}

#[tokio::test]
async fn test_optional_distinguishes_absent_from_failure() {
    let (access, _probe) = mapped(Script::empty());
    let absent = access
        .get_object_by_id::<i32, Test>(1, OperationKind::GetObjectById, CallOptions::new())
        .await
        .optional()
        .unwrap();
    assert_eq!(absent, None);

    let (access, _probe) = mapped(Script::failing(FailAt::Execute));
    let failed = access
        .get_object_by_id::<i32, Test>(1, OperationKind::GetObjectById, CallOptions::new())
        .await
        .optional();
    assert!(matches!(failed, Err(DataAccessError::Transport { .. })));
}

#[tokio::test]
async fn test_get_object_with_parameters_not_found_carries_input() {
    let (access, probe) = mapped(Script::empty());
    let lookup = ParameterSet::new()
        .with_value("TestString", "abc")
        .with_value("TestInt", 3);

    let err = access
        .get_object_with_parameters::<_, Test>(
            &lookup,
            OperationKind::GetObjectWithParameters,
            CallOptions::new(),
        )
        .await
        .unwrap_err();

    match err {
        DataAccessError::NotFound { input, procedure } => {
            assert_eq!(input, "TestString:abc,TestInt:3");
            assert_eq!(procedure, "X.GetObjectWithParametersTest");
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert_eq!(names(&probe.last_call()), vec!["@TestString", "@TestInt"]);
}

#[tokio::test]
async fn test_get_list_returns_rows_in_order() {
    for count in [0usize, 1, 3] {
        let expected: Vec<Test> = (0..count as i32).map(sample).collect();
        let (access, probe) = mapped(Script::rows(expected.iter().map(row_for).collect()));

        let items: Vec<Test> = access
            .get_list(OperationKind::GetList, CallOptions::new())
            .await
            .unwrap();

        assert_eq!(items, expected);
        assert!(probe.last_call().parameters.is_empty());
        assert_nested_release(&probe);
    }
}

#[tokio::test]
async fn test_get_list_calls_resolver_with_type_context() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let resolver = move |context: &OperationContext| -> Result<String, ResolutionError> {
        recorder.lock().unwrap().push(*context);
        Ok("Reports.Everything_v2".to_string())
    };

    let (connector, probe) = MockConnector::new(Script::empty());
    let access = MappedDataAccess::new(connector, CONNECTION_STRING, Arc::new(resolver));

    let items: Vec<Test> = access
        .get_list(OperationKind::GetList, CallOptions::new())
        .await
        .unwrap();

    assert!(items.is_empty());
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        &[OperationContext::Typed(OperationKind::GetList, TypeDescriptor::new("Test"))]
    );
    assert_eq!(probe.last_call().procedure, "Reports.Everything_v2");
}

#[tokio::test]
async fn test_get_list_with_parameters_binds_input() {
    let rows = vec![row_for(&sample(1)), row_for(&sample(2))];
    let (access, probe) = mapped(Script::rows(rows));

    let items: Vec<Test> = access
        .get_list_with_parameters(
            &ParameterSet::new().with_value("MinInt", 1),
            OperationKind::GetListWithParameters,
            CallOptions::new(),
        )
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    let call = probe.last_call();
    assert_eq!(call.procedure, "X.GetListWithParametersTest");
    assert_eq!(names(&call), vec!["@MinInt"]);
}

#[tokio::test]
async fn test_update_by_id_binds_fields_then_id() {
    let (access, probe) = mapped(Script::empty());

    access
        .update_by_id(9i32, &sample(4), OperationKind::UpdateById, CallOptions::new())
        .await
        .unwrap();

    let call = probe.last_call();
    assert_eq!(call.procedure, "X.UpdateByIdTest");
    assert_eq!(names(&call), vec!["@TestDate", "@TestString", "@TestInt", "@Id"]);
    assert_eq!(call.parameters[3].value, ProcValue::Int(9));
    assert!(call.parameters.iter().all(|p| !p.is_output()));
}

#[tokio::test]
async fn test_untyped_calls_resolve_tag_only() {
    let (access, probe) = mapped(Script::empty());

    access
        .id_call(3i32, OperationKind::IdCall, CallOptions::new())
        .await
        .unwrap();
    assert_eq!(probe.last_call().procedure, "X.IdCall");

    access
        .id_call_for::<i32, Test>(3, OperationKind::IdCall, CallOptions::new())
        .await
        .unwrap();
    assert_eq!(probe.last_call().procedure, "X.IdCallTest");
    assert_eq!(names(&probe.last_call()), vec!["@Id"]);

    access
        .parameter_call(
            &ParameterSet::new().with_value("Flag", true),
            OperationKind::ParameterCall,
            CallOptions::new(),
        )
        .await
        .unwrap();
    assert_eq!(probe.last_call().procedure, "X.ParameterCall");

    access
        .no_parameter_call(OperationKind::NoParameterCall, CallOptions::new())
        .await
        .unwrap();
    let call = probe.last_call();
    assert_eq!(call.procedure, "X.NoParameterCall");
    assert!(call.parameters.is_empty());

    assert_eq!(probe.opened(), 4);
    assert!(probe.balanced());
}

#[tokio::test]
async fn test_resolution_failures_propagate_without_connecting() {
    let resolver = |_: &OperationContext| -> Result<String, ResolutionError> {
        Err(ResolutionError::Failed("naming service offline".into()))
    };
    let (connector, probe) = MockConnector::new(Script::empty());
    let access = MappedDataAccess::new(connector, CONNECTION_STRING, Arc::new(resolver));

    let err = access
        .no_parameter_call(OperationKind::NoParameterCall, CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(
        &err,
        DataAccessError::Resolution(ResolutionError::Failed(message)) if message == "naming service offline"
    ));
    assert_eq!(probe.opened(), 0);

    let empty = |_: &OperationContext| -> Result<String, ResolutionError> { Ok(String::new()) };
    let (connector, _probe) = MockConnector::new(Script::empty());
    let access = MappedDataAccess::new(connector, CONNECTION_STRING, Arc::new(empty));
    let err = access
        .get_list::<Test>(OperationKind::GetList, CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DataAccessError::Resolution(ResolutionError::Empty(_))));

    let invalid = |_: &OperationContext| -> Result<String, ResolutionError> { Ok("X.Get List".into()) };
    let (connector, _probe) = MockConnector::new(Script::empty());
    let access = MappedDataAccess::new(connector, CONNECTION_STRING, Arc::new(invalid));
    let err = access
        .get_list::<Test>(OperationKind::GetList, CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DataAccessError::Resolution(ResolutionError::InvalidName(_))));
}

#[tokio::test]
async fn test_map_resolver_names() {
    let resolver = MapResolver::new()
        .with_typed(OperationKind::GetList, "Test", "app.ListTests")
        .with_name("NoParameterCall", "app.Refresh");
    let (connector, probe) = MockConnector::new(Script::empty());
    let access = MappedDataAccess::new(connector, CONNECTION_STRING, Arc::new(resolver));

    let _: Vec<Test> = access
        .get_list(OperationKind::GetList, CallOptions::new())
        .await
        .unwrap();
    assert_eq!(probe.last_call().procedure, "app.ListTests");

    access
        .no_parameter_call(OperationKind::NoParameterCall, CallOptions::new())
        .await
        .unwrap();
    assert_eq!(probe.last_call().procedure, "app.Refresh");

    let err = access
        .id_call(1i32, OperationKind::IdCall, CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DataAccessError::Resolution(ResolutionError::Unmapped(_))));
}

#[tokio::test]
async fn test_missing_column_is_field_mapping_error() {
    let full = sample(1);
    let row = ColumnMap::new()
        .with("TestDate", full.test_date)
        .with("TestString", full.test_string)
        .with("Unrelated", 5);
    let (access, probe) = mapped(Script::rows(vec![row]));

    let err = access
        .get_list::<Test>(OperationKind::GetList, CallOptions::new())
        .await
        .unwrap_err();

    match err {
        DataAccessError::FieldMapping {
            record,
            procedure,
            source,
        } => {
            assert_eq!(record, "Test");
            assert_eq!(procedure, "X.GetListTest");
            assert_eq!(source, FieldMappingError::missing("TestInt"));
        }
        other => panic!("expected FieldMapping, got {:?}", other),
    }
    assert_nested_release(&probe);
}

#[tokio::test]
async fn test_every_failure_releases_connection() {
    for at in [FailAt::Execute, FailAt::Advance] {
        let (access, probe) = mapped(Script::failing(at));

        let by_id = access
            .get_object_by_id::<i32, Test>(1, OperationKind::GetObjectById, CallOptions::new())
            .await;
        let list = access
            .get_list::<Test>(OperationKind::GetList, CallOptions::new())
            .await;

        for result in [by_id.map(|_| ()), list.map(|_| ())] {
            match result {
                Err(DataAccessError::Transport { procedure, .. }) => assert!(procedure.starts_with("X.")),
                other => panic!("expected Transport, got {:?}", other),
            }
        }
        assert_eq!(probe.opened(), 2);
        assert!(probe.balanced());
    }

    let (access, probe) = mapped(Script::failing(FailAt::Open));
    let err = access
        .no_parameter_call(OperationKind::NoParameterCall, CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DataAccessError::Transport { .. }));
    assert_eq!(probe.opened(), 0);
    assert!(probe.balanced());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_cancels_and_releases() {
    let script = Script::rows(vec![row_for(&sample(1))]).delayed(Duration::from_secs(5));
    let (access, probe) = mapped(script);

    let err = access
        .get_list::<Test>(
            OperationKind::GetList,
            CallOptions::new().with_timeout(Duration::from_millis(100)),
        )
        .await
        .unwrap_err();

    match err {
        DataAccessError::Timeout { procedure, timeout } => {
            assert_eq!(procedure, "X.GetListTest");
            assert_eq!(timeout, Duration::from_millis(100));
        }
        other => panic!("expected Timeout, got {:?}", other),
    }
    assert_eq!(probe.opened(), 1);
    assert!(probe.balanced());
}

#[tokio::test]
async fn test_settings_rename_parameters_and_default_timeout() {
    let (connector, probe) = MockConnector::new(Script::empty());
    let access = MappedDataAccess::new(connector, CONNECTION_STRING, Arc::new(ConventionResolver::new("X")))
        .with_settings(AccessSettings {
            parameter_prefix: "p_".into(),
            id_parameter: "ObjectId".into(),
            default_timeout: Some(Duration::from_secs(30)),
        });

    access
        .id_call(1i32, OperationKind::IdCall, CallOptions::new())
        .await
        .unwrap();
    assert_eq!(names(&probe.last_call()), vec!["p_ObjectId"]);

    access
        .id_call(1i32, OperationKind::IdCall, CallOptions::new().with_timeout(Duration::from_secs(2)))
        .await
        .unwrap();

    let timeouts = probe.timeouts.lock().unwrap().clone();
    assert_eq!(
        timeouts,
        vec![Some(Duration::from_secs(30)), Some(Duration::from_secs(2))]
    );
    assert_eq!(
        probe.connection_strings.lock().unwrap().as_slice(),
        &[CONNECTION_STRING.to_string(), CONNECTION_STRING.to_string()]
    );
}

#[tokio::test]
async fn test_concurrent_calls_open_distinct_connections() {
    let rows = vec![row_for(&sample(1))];
    let (access, probe) = mapped(Script::rows(rows));
    let access = Arc::new(access);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let access = access.clone();
        handles.push(tokio::spawn(async move {
            access
                .get_list::<Test>(OperationKind::GetList, CallOptions::new())
                .await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().len(), 1);
    }

    assert_eq!(probe.opened(), 8);
    assert!(probe.balanced());
}
