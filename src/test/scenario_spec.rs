use crate::app::DistSpec;
use crate::net::{Address, Signal};
use crate::sim::{RoutingMode, ScenarioSpec, SimError, SimTime, TopologySpec};
use crate::topo::{build_scenario, edges, node_seed};

fn parse(json: &str) -> ScenarioSpec {
    serde_json::from_str(json).expect("scenario json")
}

const LINE_WITH_DEFAULTS: &str = r#"{
    "schema_version": 1,
    "seed": 7,
    "topology": { "kind": "line", "n": 3 },
    "link_latency_us": 250,
    "defaults": {
        "traffic": {
            "dest_addresses": [2],
            "sleep_time": { "kind": "const", "value": 1.0 },
            "burst_time": { "kind": "const", "value": 0.5 },
            "send_ia_time": { "kind": "const", "value": 0.1 },
            "packet_length": { "kind": "uniform", "min": 64, "max": 128 }
        }
    },
    "nodes": [
        { "index": 1, "name": "mid", "idle": true },
        { "index": 2, "address": 2, "idle": true, "collect_statistics": true }
    ]
}"#;

#[test]
fn parses_minimal_scenario_with_defaults() {
    let spec = parse(r#"{ "schema_version": 1, "topology": { "kind": "ring", "n": 4 } }"#);
    assert_eq!(spec.seed, 0);
    assert_eq!(spec.routing.mode, RoutingMode::Distributed);
    assert_eq!(spec.routing.central_address, 0);
    assert!(spec.defaults.is_none());
    assert!(spec.nodes.is_empty());
    assert_eq!(spec.topology.num_nodes(), 4);
}

#[test]
fn parses_routing_and_node_overrides() {
    let spec = parse(
        r#"{
            "schema_version": 1,
            "routing": { "mode": "centralized", "central_address": 3 },
            "topology": { "kind": "links", "n": 4, "links": [[0, 1], [1, 3], [3, 2]] },
            "nodes": [ { "index": 2, "type": "Host", "address": 12 } ]
        }"#,
    );
    assert_eq!(spec.routing.mode, RoutingMode::Centralized);
    assert_eq!(spec.routing.central_address, 3);
    assert_eq!(spec.nodes[0].type_name.as_deref(), Some("Host"));
    assert_eq!(spec.nodes[0].address, Some(12));
    assert!(!spec.nodes[0].idle);
    assert_eq!(edges(&spec.topology), vec![(0, 1), (1, 3), (3, 2)]);
}

#[test]
fn unknown_routing_mode_fails_to_parse() {
    let res = serde_json::from_str::<ScenarioSpec>(
        r#"{ "schema_version": 1, "routing": { "mode": "flooding" },
             "topology": { "kind": "line", "n": 2 } }"#,
    );
    assert!(res.is_err());
}

#[test]
fn edge_shapes() {
    assert_eq!(edges(&TopologySpec::Line { n: 1 }), Vec::<(usize, usize)>::new());
    assert_eq!(edges(&TopologySpec::Line { n: 3 }), vec![(0, 1), (1, 2)]);
    assert_eq!(edges(&TopologySpec::Ring { n: 1 }), Vec::<(usize, usize)>::new());
    assert_eq!(edges(&TopologySpec::Ring { n: 2 }), vec![(0, 1)]);
    assert_eq!(
        edges(&TopologySpec::Ring { n: 4 }),
        vec![(0, 1), (1, 2), (2, 3), (3, 0)]
    );
}

#[test]
fn build_applies_defaults_and_overrides() {
    let spec = parse(LINE_WITH_DEFAULTS);
    let (mut sim, mut world) = build_scenario(&spec).expect("build");

    let names: Vec<&str> = world.net.nodes().map(|n| n.name()).collect();
    assert_eq!(names, vec!["node0", "mid", "node2"]);
    let generators: Vec<bool> = world.net.nodes().map(|n| n.app().is_generator()).collect();
    assert_eq!(generators, vec![true, false, false]);

    // 中间节点有两个接口，端点各一个
    let ifaces: Vec<usize> = world.net.nodes().map(|n| n.interfaces().len()).collect();
    assert_eq!(ifaces, vec![1, 2, 1]);

    world.net.signals.keep_records(true);
    sim.run_until(SimTime::from_secs(2), &mut world).expect("run");
    let delays = world.net.signals.values(Address(2), Signal::EndToEndDelay);
    assert!(!delays.is_empty());
    for (_, d) in delays {
        assert!((d - 0.0005).abs() < 1e-12, "two hops of 250us, got {d}");
    }
    for (_, len) in world.net.signals.values(Address(2), Signal::OutputIf) {
        assert_eq!(len, -1.0);
    }
    assert_eq!(world.net.stats.dropped_pkts, 0);
}

#[test]
fn empty_destination_list_is_a_config_error() {
    let spec = parse(
        r#"{
            "schema_version": 1,
            "topology": { "kind": "line", "n": 2 },
            "nodes": [ { "index": 0, "traffic": {
                "dest_addresses": [],
                "sleep_time": { "kind": "const", "value": 1.0 },
                "burst_time": { "kind": "const", "value": 1.0 },
                "send_ia_time": { "kind": "const", "value": 1.0 },
                "packet_length": { "kind": "const", "value": 10 }
            } } ]
        }"#,
    );
    assert!(matches!(build_scenario(&spec), Err(SimError::Config(_))));
}

#[test]
fn invalid_scenarios_are_rejected() {
    let cases = [
        // 重复地址
        r#"{ "schema_version": 1, "topology": { "kind": "line", "n": 2 },
             "nodes": [ { "index": 1, "address": 0 } ] }"#,
        // 链路端点越界
        r#"{ "schema_version": 1, "topology": { "kind": "links", "n": 2, "links": [[0, 2]] } }"#,
        // 自环
        r#"{ "schema_version": 1, "topology": { "kind": "links", "n": 2, "links": [[1, 1]] } }"#,
        // 重复链路
        r#"{ "schema_version": 1, "topology": { "kind": "links", "n": 2, "links": [[0, 1], [1, 0]] } }"#,
        // 覆盖下标越界
        r#"{ "schema_version": 1, "topology": { "kind": "line", "n": 2 }, "nodes": [ { "index": 5 } ] }"#,
        // 同一下标覆盖两次
        r#"{ "schema_version": 1, "topology": { "kind": "line", "n": 2 },
             "nodes": [ { "index": 1 }, { "index": 1 } ] }"#,
        // 中心节点不存在
        r#"{ "schema_version": 1, "routing": { "mode": "centralized", "central_address": 9 },
             "topology": { "kind": "line", "n": 2 } }"#,
    ];
    for json in cases {
        let res = build_scenario(&parse(json));
        assert!(matches!(res, Err(SimError::Config(_))), "accepted: {json}");
    }
}

#[test]
fn invalid_distribution_is_rejected() {
    let mut spec = parse(LINE_WITH_DEFAULTS);
    if let Some(t) = spec.defaults.as_mut().and_then(|d| d.traffic.as_mut()) {
        t.send_ia_time = DistSpec::Exponential { mean: 0.0 };
    }
    assert!(matches!(build_scenario(&spec), Err(SimError::Config(_))));
}

#[test]
fn node_seed_is_stable_and_address_dependent() {
    assert_eq!(node_seed(1, Address(3)), node_seed(1, Address(3)));
    assert_ne!(node_seed(1, Address(3)), node_seed(1, Address(4)));
    assert_ne!(node_seed(1, Address(3)), node_seed(2, Address(3)));
}

#[test]
fn same_seed_reproduces_the_run() {
    let run = |seed: u64| {
        let mut spec = parse(LINE_WITH_DEFAULTS);
        spec.seed = seed;
        let (mut sim, mut world) = build_scenario(&spec).expect("build");
        world.net.signals.keep_records(true);
        sim.run_until(SimTime::from_secs(5), &mut world).expect("run");
        (world.net.signals.records().to_vec(), world.net.stats.delivered_bytes)
    };
    assert_eq!(run(7), run(7));
}
