/// End-to-end pipeline tests: fixture log in, DOT / JSON document out.
use std::fs::File;
use std::io::{BufReader, Write};

use gategraph::domain::callgraph::CallGraph;
use gategraph::domain::edge::{extract_edges, sort_by_lineno, Edge};
use gategraph::domain::parser::LogParser;
use gategraph::ports::dot_exporter::DotExporter;
use gategraph::ports::json_exporter::JsonExporter;
use gategraph::ports::OutputExporter;

/// One top-level request, one nested child request, one response to the
/// top-level request, plus a foreign-component line and a blank line.
const FIXTURE: &str = "\
13:24:51.071 INFO ProxyContext 821224/proxy REQ 10.0.2.15:46968 diku GET /instance-storage/instances limit=30
13:24:51.073 INFO PostgresClient connection pool ready
13:24:51.102 INFO ProxyContext 821224/proxy;421001/inventory REQ 10.0.2.15:46968 diku GET /inventory/items

13:24:51.388 INFO ProxyContext 821224/proxy RES 200 145571us -
";

fn fixture_edges() -> Vec<Edge> {
    let records = LogParser::new()
        .parse(FIXTURE.as_bytes())
        .expect("fixture parses");
    let graph = CallGraph::build(records);
    let mut edges = extract_edges(&graph);
    sort_by_lineno(&mut edges);
    edges
}

#[test]
fn fixture_edge_counts() {
    let edges = fixture_edges();
    assert_eq!(edges.iter().filter(|e| e.to.is_none()).count(), 3);
    assert_eq!(edges.iter().filter(|e| e.to.is_some()).count(), 2);
}

#[test]
fn fixture_produces_pinned_dot_output() {
    let edges = fixture_edges();
    let mut out = Vec::new();
    DotExporter::new().export(&edges, &mut out).unwrap();
    let dot = String::from_utf8(out).unwrap();

    let expected = r#"digraph G {
    node [shape=record,fontname="Helvetica-Bold",fontcolor=white];
    rankdir=LR;
    ordering=out;

    "[ 5 ]\n13:24:51.388 INFO\n821224/proxy\nRES 200 ( 146 ms )\n-" [color=cornflowerblue,fontcolor=white,style=filled];
    "[ 3 ]\n13:24:51.102 INFO\n821224/proxy;421001/inventory\nREQ 10.0.2.15:46968 diku\nGET /inventory/items" [color=forestgreen,fontcolor=white,style=filled];
    "[ 1 ]\n13:24:51.071 INFO\n821224/proxy\nREQ 10.0.2.15:46968 diku\nGET /instance-storage/instances\nlimit=30" [color=forestgreen,fontcolor=white,style=filled];
    edge [color=forestgreen,style=bold];
    "[ 1 ]\n13:24:51.071 INFO\n821224/proxy\nREQ 10.0.2.15:46968 diku\nGET /instance-storage/instances\nlimit=30" -> "[ 3 ]\n13:24:51.102 INFO\n821224/proxy;421001/inventory\nREQ 10.0.2.15:46968 diku\nGET /inventory/items" [arrowhead=normal];
    edge [color=cornflowerblue,style=bold];
    "[ 1 ]\n13:24:51.071 INFO\n821224/proxy\nREQ 10.0.2.15:46968 diku\nGET /instance-storage/instances\nlimit=30" -> "[ 5 ]\n13:24:51.388 INFO\n821224/proxy\nRES 200 ( 146 ms )\n-" [arrowhead=odot];
}
"#;
    assert_eq!(dot, expected);
}

#[test]
fn fixture_output_is_reproducible() {
    let first = DotExporter::new().to_dot(&fixture_edges());
    let second = DotExporter::new().to_dot(&fixture_edges());
    assert_eq!(first, second);
}

#[test]
fn slow_threshold_flips_response_node_to_alert() {
    let edges = fixture_edges();
    // 145571 us is over a 100 ms threshold but under 250 ms.
    let slow = DotExporter::with_slow_threshold(100).to_dot(&edges);
    assert!(slow.contains("[color=maroon,fontcolor=white,style=filled];"));
    let fast = DotExporter::with_slow_threshold(250).to_dot(&edges);
    assert!(!fast.contains("maroon"));
}

#[test]
fn json_export_matches_dot_graph() {
    let edges = fixture_edges();
    let mut out = Vec::new();
    JsonExporter.export(&edges, &mut out).unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();

    let nodes = doc["nodes"].as_array().unwrap();
    let relations = doc["edges"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(relations.len(), 2);

    // Every parsed record appears exactly once as a node.
    let mut linenos: Vec<u64> = nodes.iter().map(|n| n["lineno"].as_u64().unwrap()).collect();
    linenos.sort_unstable();
    assert_eq!(linenos, vec![1, 3, 5]);

    assert_eq!(relations[0]["from"]["lineno"], 1);
    assert_eq!(relations[0]["to"]["lineno"], 3);
    assert_eq!(relations[1]["to"]["kind"], "response");
}

#[test]
fn usecase_runs_whole_pipeline() {
    let parser = LogParser::new();
    let exporter = DotExporter::new();
    let usecase = gategraph::application::CallGraphUsecase {
        parser: &parser,
        exporter: &exporter,
    };

    let mut out = Vec::new();
    usecase.run(FIXTURE.as_bytes(), &mut out).unwrap();
    let dot = String::from_utf8(out).unwrap();
    assert_eq!(dot, DotExporter::new().to_dot(&fixture_edges()));
}

#[test]
fn parses_from_a_real_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gateway.log");
    let mut file = File::create(&path).unwrap();
    file.write_all(FIXTURE.as_bytes()).unwrap();

    let records = LogParser::new()
        .parse(BufReader::new(File::open(&path).unwrap()))
        .unwrap();
    assert_eq!(records.len(), 3);
}

#[test]
fn malformed_fixture_yields_no_output() {
    let broken = FIXTURE.replace("145571us", "145x71us");
    let err = LogParser::new().parse(broken.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("line 5"));
}
