//! Integration tests for evaluation tracing

use weft_runtime::{EvalConfig, TraceConfig, TraceEvent};

use crate::common::summing_program;

#[test]
fn tracing_is_off_by_default() {
    let (mut program, _) = summing_program(EvalConfig::default());
    program.load_string("main.w", "1");
    program.evaluate().unwrap();
    assert!(program.tracer().is_empty());
}

#[test]
fn evaluation_is_traced_in_order() {
    let config = EvalConfig::new().with_trace(TraceConfig::new().enabled());
    let (mut program, _) = summing_program(config);
    program.load_string("main.w", "1 x");
    program.evaluate().unwrap();

    let kinds: Vec<_> = program
        .tracer()
        .records()
        .map(|r| r.event.event_type())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "global_bound",
            "global_bound",
            "module_loaded",
            "module_initialized",
            "segment_shifted",
            "segment_shifted",
            "unresolved",
        ]
    );

    let shifted: Vec<_> = program
        .tracer()
        .records()
        .filter(|r| matches!(r.event, TraceEvent::SegmentShifted { .. }))
        .collect();
    assert_eq!(shifted[0].step, 1);
    assert_eq!(shifted[1].step, 2);
    assert_eq!(
        shifted[1].event,
        TraceEvent::SegmentShifted {
            module: 1,
            operator: "sum".to_string(),
            key: "int".to_string(),
            start: 0,
            end: 3,
            nodes: 1,
        }
    );
}

#[test]
fn tracer_can_be_toggled() {
    let (mut program, _) = summing_program(EvalConfig::default());
    program.tracer_mut().enable();
    program.load_string("main.w", "1");
    program.tracer_mut().disable();
    program.evaluate().unwrap();

    assert_eq!(program.tracer().len(), 1);
}
