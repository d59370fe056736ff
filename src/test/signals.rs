use crate::net::{Address, Signal, SignalRecorder, SignalSink};
use crate::sim::{RoutingSpec, SimTime};
use crate::topo::{build_scenario, default_ring_scenario};

#[test]
fn recorder_keeps_only_summaries_by_default() {
    let mut rec = SignalRecorder::default();
    assert!(!rec.keeps_records());
    for (i, v) in [3.0, 1.0, 2.0].into_iter().enumerate() {
        rec.emit(SimTime(i as u64), Address(1), Signal::HopCount, v);
    }

    assert!(rec.records().is_empty());
    assert!(rec.values(Address(1), Signal::HopCount).is_empty());
    let sum = rec.summary(Signal::HopCount).expect("summary");
    assert_eq!(sum.count, 3);
    assert_eq!(sum.min, 1.0);
    assert_eq!(sum.max, 3.0);
    assert_eq!(sum.mean(), Some(2.0));
}

#[test]
fn recorder_with_records_keeps_every_emit_in_order() {
    let mut rec = SignalRecorder::with_records();
    rec.emit(SimTime(5), Address(2), Signal::Drop, 64.0);
    rec.emit(SimTime(7), Address(3), Signal::OutputIf, -1.0);
    rec.emit(SimTime(9), Address(2), Signal::Drop, 128.0);

    assert_eq!(rec.records().len(), 3);
    assert_eq!(
        rec.values(Address(2), Signal::Drop),
        vec![(SimTime(5), 64.0), (SimTime(9), 128.0)]
    );
    assert_eq!(rec.summary(Signal::Drop).map(|s| s.sum), Some(192.0));
}

#[test]
fn long_run_without_records_holds_no_per_packet_data() {
    let spec = default_ring_scenario(6, 1, RoutingSpec::default());
    let (mut sim, mut world) = build_scenario(&spec).expect("build");
    sim.run_until(SimTime::from_secs(20), &mut world).expect("run");

    let net = &world.net;
    assert!(net.stats.delivered_pkts > 0);
    assert!(net.signals.records().is_empty());
    // 汇总照常累计
    let hops = net.signals.summary(Signal::HopCount).expect("hop summary");
    assert_eq!(hops.count, net.stats.delivered_pkts);
    let out = net.signals.summary(Signal::OutputIf).expect("outputIf summary");
    assert_eq!(out.count, net.stats.delivered_pkts + net.stats.forwarded_pkts);
}
