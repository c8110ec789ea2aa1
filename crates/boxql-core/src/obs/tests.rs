use super::*;
use crate::engine::EngineOp;

// Global counters are shared by every test in the process, so assertions
// only look at entity-keyed counters owned by this module.
const PROBE: &str = "ObsProbe";

#[test]
fn global_sink_counts_entity_events() {
    let sink = GlobalMetricsSink;

    sink.record(MetricsEvent::BuilderOpened { entity: PROBE });
    sink.record(MetricsEvent::ConditionAdded {
        entity: PROBE,
        op: EngineOp::BetweenInt,
    });
    sink.record(MetricsEvent::ConditionAdded {
        entity: PROBE,
        op: EngineOp::EqualText,
    });
    sink.record(MetricsEvent::EngineRejected {
        entity: PROBE,
        op: EngineOp::InInt64,
    });
    sink.record(MetricsEvent::QueryCompiled { entity: PROBE });

    let report = metrics_report();
    let counters = report.entities.get(PROBE).unwrap();

    assert_eq!(
        counters,
        &EntityCounters {
            builders_opened: 1,
            conditions_added: 2,
            queries_compiled: 1,
            engine_rejections: 1,
        }
    );
    assert!(report.conditions.get("between_int").copied().unwrap_or(0) >= 1);
    assert!(report.ops.conditions_added >= 2);
}

#[test]
fn report_serializes_to_json() {
    let report = EventReport::default();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["ops"]["builders_opened"], 0);
    assert!(json["entities"].as_object().unwrap().is_empty());
}
