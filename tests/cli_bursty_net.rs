use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "routesim-rs-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(dir: &PathBuf, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

fn bursty_net(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bursty_net"))
        .args(args)
        .output()
        .expect("run bursty_net")
}

fn read_report(path: &PathBuf) -> Value {
    let raw = fs::read_to_string(path).expect("read signals json");
    serde_json::from_str(&raw).expect("parse signals json")
}

const LINE_SCENARIO: &str = r#"
{
    "schema_version": 1,
    "seed": 3,
    "topology": { "kind": "line", "n": 3 },
    "nodes": [
        {
            "index": 0,
            "name": "A",
            "address": 1,
            "traffic": {
                "dest_addresses": [3],
                "sleep_time": { "kind": "const", "value": 10 },
                "burst_time": { "kind": "const", "value": 5 },
                "send_ia_time": { "kind": "const", "value": 2 },
                "packet_length": { "kind": "const", "value": 100 }
            }
        },
        { "index": 1, "name": "B", "address": 2 },
        { "index": 2, "name": "C", "address": 3 }
    ]
}
"#;

#[test]
fn bursty_net_runs_scenario_and_writes_report() {
    let dir = unique_temp_dir("bursty-net-line");
    let scenario = write_file(&dir, "scenario.json", LINE_SCENARIO);
    let out_json = dir.join("signals.json");

    let output = bursty_net(&[
        "--scenario",
        scenario.to_str().unwrap(),
        "--until-s",
        "30",
        "--signals-json",
        out_json.to_str().unwrap(),
        "--with-records",
    ]);
    assert!(
        output.status.success(),
        "bursty_net failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("node 1 (A) phase=sleeping sent:6 received:0"));
    assert!(stdout.contains("node 3 (C) phase=init sent:0 received:6"));
    assert!(stdout.contains("delivered_pkts=6"));

    let v = read_report(&out_json);
    assert_eq!(v["stats"]["generated_pkts"].as_u64(), Some(6));
    assert_eq!(v["stats"]["forwarded_pkts"].as_u64(), Some(12));
    assert_eq!(v["stats"]["dropped_pkts"].as_u64(), Some(0));
    assert_eq!(v["summaries"]["hopCount"]["count"].as_u64(), Some(6));
    assert_eq!(v["summaries"]["hopCount"]["min"].as_f64(), Some(2.0));
    assert_eq!(v["summaries"]["hopCount"]["max"].as_f64(), Some(2.0));

    let nodes = v["nodes"].as_array().expect("nodes array");
    assert_eq!(nodes.len(), 3);
    for n in nodes {
        assert_eq!(n["routes"].as_u64(), Some(2), "node {n}");
    }
    let records = v["records"].as_array().expect("records array");
    assert!(
        records
            .iter()
            .any(|r| r["signal"] == "outputIf" && r["node"] == 3 && r["value"] == -1.0)
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn bursty_net_centralized_routing_matches_distributed() {
    let dir = unique_temp_dir("bursty-net-central");
    let dist_json = dir.join("dist.json");
    let central_json = dir.join("central.json");

    for (mode, path) in [("distributed", &dist_json), ("centralized", &central_json)] {
        let output = bursty_net(&[
            "--nodes",
            "5",
            "--seed",
            "11",
            "--routing",
            mode,
            "--until-s",
            "2",
            "--signals-json",
            path.to_str().unwrap(),
        ]);
        assert!(
            output.status.success(),
            "bursty_net --routing {mode} failed: stderr={}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let dist = read_report(&dist_json);
    let central = read_report(&central_json);
    assert_eq!(dist["stats"], central["stats"]);
    assert_eq!(dist["summaries"], central["summaries"]);
    for n in central["nodes"].as_array().expect("nodes array") {
        assert_eq!(n["routes"].as_u64(), Some(4), "node {n}");
    }
    assert!(dist.get("records").is_none());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn bursty_net_rejects_unknown_routing_mode() {
    let output = bursty_net(&["--routing", "flooding", "--until-s", "0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    // clap 拒绝取值并列出可选项
    assert!(stderr.contains("invalid value 'flooding'"), "stderr={stderr}");
    assert!(stderr.contains("distributed"), "stderr={stderr}");
    assert!(stderr.contains("centralized"), "stderr={stderr}");
}

#[test]
fn bursty_net_rejects_invalid_scenario() {
    let dir = unique_temp_dir("bursty-net-invalid");
    let scenario = write_file(
        &dir,
        "scenario.json",
        r#"{ "schema_version": 1, "topology": { "kind": "links", "n": 2, "links": [[0, 0]] } }"#,
    );
    let output = bursty_net(&["--scenario", scenario.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid link"), "stderr={stderr}");

    let _ = fs::remove_dir_all(&dir);
}
