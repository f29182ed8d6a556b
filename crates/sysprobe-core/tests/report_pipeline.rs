//! End-to-end pipeline tests: raw probe transcripts through dispatch and
//! aggregation into a serialized report.

use sysprobe_common::{Error, ProbeId};
use sysprobe_core::parse::{cpu, packages, process_tree};
use sysprobe_core::{aggregate, parse_probe, ProbeRecord};

#[test]
fn core_count_end_to_end() {
    let record = parse_probe(ProbeId::CoreCount, "Total cores: 8");
    let ProbeRecord::CoreCount(core) = record else {
        panic!("wrong record variant");
    };
    assert_eq!(core.total_cores, Some(8));
}

#[test]
fn cpu_usage_end_to_end() {
    let record = parse_probe(ProbeId::CpuUsage, "CPU Usage: 3.0%\nCPU Usage: 17.5%");
    assert_eq!(
        record,
        ProbeRecord::CpuUsage(cpu::CpuUsage {
            usage_percent: Some(17.5)
        })
    );
}

#[test]
fn package_line_end_to_end() {
    let text = "apt detected: 2.4.5\ncurl/stable 7.88.1-10 amd64 [installed]";
    let ProbeRecord::PackageManagers(parsed) = parse_probe(ProbeId::PackageManagers, text) else {
        panic!("wrong record variant");
    };
    let curl = &parsed.managers["apt"].packages["curl"];
    assert_eq!(
        curl,
        &packages::PackageInfo {
            version: "7.88.1-10".to_string(),
            status: String::new(),
            repository: "stable".to_string(),
            architecture: "amd64".to_string(),
            flags: vec!["installed".to_string()],
            raw: None,
        }
    );
}

#[test]
fn process_tree_end_to_end() {
    let text = "\
1 (0) 0.0% 0.1% 1024 2 0 S(sleeping) init
    10 (1) 0.0% 0.1% 1024 2 0 S(sleeping) child
        20 (10) 0.0% 0.1% 1024 2 0 S(sleeping) grandchild
    11 (1) 0.0% 0.1% 1024 2 0 S(sleeping) sibling
2 (0) 0.0% 0.1% 1024 2 0 S(sleeping) other-root
";
    let ProbeRecord::ProcessSnapshot(snapshot) = parse_probe(ProbeId::ProcessSnapshot, text) else {
        panic!("wrong record variant");
    };
    assert_eq!(snapshot.roots.len(), 2);
    assert_eq!(snapshot.roots[0].children.len(), 2);
    assert_eq!(snapshot.roots[0].children[0].children.len(), 1);
}

#[test]
fn aggregation_is_all_settled() {
    let report = aggregate(vec![
        (ProbeId::CoreCount, Ok("Total cores: 8".to_string())),
        (
            ProbeId::PackageManagers,
            Err(Error::Execution {
                probe: ProbeId::PackageManagers,
                message: "exit status 1".to_string(),
            }),
        ),
        (ProbeId::UnameInfo, Ok("OS: Linux\nHostname: box".to_string())),
    ]);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures.contains_key(&ProbeId::PackageManagers));
    assert_eq!(report.metadata.probes_attempted, 3);
}

#[test]
fn report_serializes_with_snake_case_keys() {
    let report = aggregate(vec![(ProbeId::CoreCount, Ok("Total cores: 4".to_string()))]);
    let json = serde_json::to_value(&report).unwrap();
    assert!(json["records"]["core_count"].is_object());
    assert_eq!(json["records"]["core_count"]["kind"], "core_count");
    assert_eq!(json["records"]["core_count"]["data"]["total_cores"], 4);
    assert_eq!(json["metadata"]["probes_parsed"], 1);
}

#[test]
fn reparsing_yields_equal_records() {
    let snapshot = "\
1 (0) 0.0% 0.1% 1024 2 0 S(sleeping) init

=== Per-Process Details ===
PID 1: CPU 0.0% RAM 0.1% Files 2 Sockets 0
fd 0 -> /dev/null
";
    for probe in ProbeId::ALL {
        let first = parse_probe(*probe, snapshot);
        let second = parse_probe(*probe, snapshot);
        assert_eq!(first, second, "re-parse differs for {probe}");
    }
    let once = process_tree::parse_process_snapshot(snapshot);
    let twice = process_tree::parse_process_snapshot(snapshot);
    assert_eq!(once, twice);
}

#[test]
fn empty_input_never_fails() {
    let results: Vec<_> = ProbeId::ALL
        .iter()
        .map(|p| (*p, Ok(String::new())))
        .collect();
    let report = aggregate(results);
    assert_eq!(report.records.len(), ProbeId::ALL.len());
    assert!(report.failures.is_empty());
}
