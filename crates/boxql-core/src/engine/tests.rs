use super::*;
use crate::model::{EntityModel, PropertyModel, ValueType};

fn note_engine() -> (MemoryEngine, SessionHandle) {
    let model = EntityModel::new(
        "Note",
        vec![
            PropertyModel::int64(1, "id"),
            PropertyModel::text(2, "title"),
            PropertyModel::float64(3, "score"),
        ],
    )
    .unwrap();
    let engine = MemoryEngine::new().with_entity(model);
    let session = engine.open_session();

    (engine, session)
}

#[test]
fn handles_are_never_zero() {
    assert!(ContextHandle::from_raw(0).is_none());
    assert_eq!(ContextHandle::from_raw(7).map(ContextHandle::get), Some(7));
    assert_eq!(QueryHandle::from_raw(255).unwrap().to_string(), "0xff");
}

#[test]
fn lifecycle_ops_are_not_conditions() {
    assert!(!EngineOp::CreateContext.is_condition());
    assert!(!EngineOp::Compile.is_condition());
    assert!(EngineOp::InInt32.is_condition());
    assert!(EngineOp::GreaterFloat.is_condition());
    assert!(EngineOp::Compile.is_fallible());
    assert!(!EngineOp::DestroyQuery.is_fallible());
}

#[test]
fn conditions_accumulate_in_call_order() {
    let (engine, session) = note_engine();
    let ctx = engine.create_context(session, "Note").unwrap();

    engine.greater_float(ctx, PropertyId::new(3), 0.5).unwrap();
    engine.starts_with_text(ctx, PropertyId::new(2), "re").unwrap();
    engine.in_int32(ctx, PropertyId::new(1), &[4, 5]).unwrap();

    assert_eq!(
        engine.context_conditions(ctx).unwrap(),
        vec![
            Condition::GreaterFloat(PropertyId::new(3), 0.5),
            Condition::StartsWithText(PropertyId::new(2), "re".to_string()),
            Condition::InInt32(PropertyId::new(1), vec![4, 5]),
        ]
    );
}

#[test]
fn compile_snapshots_and_keeps_context_alive() {
    let (engine, session) = note_engine();
    let ctx = engine.create_context(session, "Note").unwrap();
    engine.is_null(ctx, PropertyId::new(2)).unwrap();

    let query = engine.compile(ctx).unwrap();
    engine.not_null(ctx, PropertyId::new(1)).unwrap();

    assert_ne!(query.get(), ctx.get());
    assert_eq!(
        engine.compiled_conditions(query).unwrap(),
        vec![Condition::IsNull(PropertyId::new(2))]
    );
    assert_eq!(engine.live_contexts(), 1);
    assert_eq!(engine.live_queries(), 1);

    engine.destroy_context(ctx);
    engine.destroy_query(query);
    assert_eq!(engine.live_contexts(), 0);
    assert_eq!(engine.live_queries(), 0);
    assert_eq!(engine.double_releases(), 0);
}

#[test]
fn second_destroy_is_counted_as_double_release() {
    let (engine, session) = note_engine();
    let ctx = engine.create_context(session, "Note").unwrap();

    engine.destroy_context(ctx);
    engine.destroy_context(ctx);

    assert_eq!(engine.double_releases(), 1);
}

#[test]
fn unknown_entity_and_session_are_rejected() {
    let (engine, session) = note_engine();

    assert_eq!(
        engine.create_context(session, "Missing").unwrap_err(),
        EngineError::UnknownEntity {
            name: "Missing".to_string()
        }
    );

    let stale = SessionHandle::from_raw(999).unwrap();
    assert!(matches!(
        engine.create_context(stale, "Note"),
        Err(EngineError::UnknownSession { handle: 999 })
    ));
}

#[test]
fn operand_type_mismatch_is_reported_by_engine() {
    let (engine, session) = note_engine();
    let ctx = engine.create_context(session, "Note").unwrap();

    let err = engine.less_float(ctx, PropertyId::new(1), 1.0).unwrap_err();
    assert_eq!(
        err,
        EngineError::TypeMismatch {
            property: PropertyId::new(1),
            expected: ValueType::Int64,
            found: ValueType::Float64,
        }
    );

    let err = engine.equal_int(ctx, PropertyId::new(9), 1).unwrap_err();
    assert!(matches!(err, EngineError::UnknownProperty { .. }));
    assert!(engine.context_conditions(ctx).unwrap().is_empty());
}

#[test]
fn injected_fault_fires_once() {
    let (engine, session) = note_engine();
    let ctx = engine.create_context(session, "Note").unwrap();
    engine
        .fail_next(
            EngineOp::InInt64,
            EngineError::InvalidKey {
                message: "invalid unordered_map<K, T> key".to_string(),
            },
        )
        .unwrap();

    assert!(matches!(
        engine.in_int64(ctx, PropertyId::new(1), &[1, 2]),
        Err(EngineError::InvalidKey { .. })
    ));
    engine.in_int64(ctx, PropertyId::new(1), &[1, 2]).unwrap();

    let ops: Vec<_> = engine.journal().iter().map(EngineCall::op).collect();
    assert_eq!(
        ops,
        vec![EngineOp::CreateContext, EngineOp::InInt64, EngineOp::InInt64]
    );
}

#[test]
fn destroy_calls_cannot_be_made_to_fail() {
    let (engine, session) = note_engine();
    let ctx = engine.create_context(session, "Note").unwrap();

    for op in [EngineOp::DestroyContext, EngineOp::DestroyQuery] {
        let err = engine
            .fail_next(
                op,
                EngineError::Rejected {
                    message: "busy".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::Rejected { .. }));
    }

    engine.destroy_context(ctx);
    assert_eq!(engine.live_contexts(), 0);
    assert_eq!(engine.double_releases(), 0);
}

#[test]
fn journal_keeps_only_the_most_recent_calls() {
    let (engine, session) = note_engine();
    let engine = engine.with_journal_capacity(2);
    let ctx = engine.create_context(session, "Note").unwrap();

    engine.is_null(ctx, PropertyId::new(1)).unwrap();
    engine.not_null(ctx, PropertyId::new(2)).unwrap();

    let ops: Vec<_> = engine.journal().iter().map(EngineCall::op).collect();
    assert_eq!(ops, vec![EngineOp::IsNull, EngineOp::NotNull]);
    assert_eq!(engine.context_conditions(ctx).unwrap().len(), 2);

    engine.clear_journal();
    assert!(engine.journal().is_empty());
}

#[test]
fn zero_journal_capacity_disables_journaling() {
    let (engine, session) = note_engine();
    let engine = engine.with_journal_capacity(0);
    let ctx = engine.create_context(session, "Note").unwrap();
    engine.equal_int(ctx, PropertyId::new(1), 4).unwrap();

    assert!(engine.journal().is_empty());
    assert_eq!(engine.live_contexts(), 1);
}
