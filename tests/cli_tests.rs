use dimuforge::driver::HistogramFile;
use dimuforge::sample::SampleKind;
use dimuforge::vars::EventRecord;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

mod common;
use common::{vbf_tight_jets, EventBuilder};

struct TestContext {
    dir: TempDir,
    manifest: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        // high-MET VBF events: only 2-jet when the MET veto is relaxed
        let signal: Vec<EventRecord> = (0..4)
            .map(|_| vbf_tight_jets(EventBuilder::new()).met(100.0).build())
            .collect();
        let background: Vec<EventRecord> = (0..10)
            .map(|i| EventBuilder::new().dimu_mass(90.0 + i as f64).dimu_pt(30.0).build())
            .collect();
        fs::write(dir.path().join("sig.json"), serde_json::to_string(&signal).unwrap()).unwrap();
        fs::write(dir.path().join("bkg.json"), serde_json::to_string(&background).unwrap()).unwrap();

        let manifest = dir.path().join("samples.json");
        fs::write(
            &manifest,
            r#"[
  {"name": "vbf", "kind": "signal", "xsec": 1.0, "n_original": 4.0, "file": "sig.json"},
  {"name": "dy", "kind": "background", "xsec": 1.0, "n_original": 10.0, "file": "bkg.json"}
]"#,
        )
        .unwrap();

        Self { dir, manifest }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dimuforge"))
        .args(args)
        .output()
        .expect("Failed to execute binary")
}

/// category -> (signal, background, data)
fn read_yields(path: &PathBuf) -> HashMap<String, (f64, f64, f64)> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let mut out = HashMap::new();
    for record in reader.records() {
        let r = record.unwrap();
        let num = |i: usize| r[i].parse::<f64>().unwrap();
        out.insert(r[0].to_string(), (num(1), num(2), num(3)));
    }
    out
}

#[test]
fn test_cli_categorize_writes_yields() {
    let ctx = TestContext::new();
    let yields = ctx.path("yields.csv");

    let output = run(&[
        "categorize",
        "--samples",
        ctx.manifest.to_str().unwrap(),
        "--categorizer",
        "run1",
        "--lumi",
        "1.0",
        "--yields",
        yields.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let table = read_yields(&yields);
    let all = table["c_ALL"];
    assert!((all.0 - 1.0).abs() < 1e-9);
    assert!((all.1 - 1.0).abs() < 1e-9);
    assert_eq!(table["c_2_Jet_VBF_Tight"].0, 0.0);
    assert!(!table.contains_key("c_BB"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("c_01_Jet_Tight_BB"));
}

#[test]
fn test_cli_categorize_saves_histograms() {
    let ctx = TestContext::new();
    let histos = ctx.path("histos.json");

    let output = run(&[
        "categorize",
        "--samples",
        ctx.manifest.to_str().unwrap(),
        "--lumi",
        "1.0",
        "--trigger-sf",
        "0.5",
        "--histograms",
        histos.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let file = HistogramFile::load(&histos).unwrap();
    assert_eq!(file.luminosity, 1.0);
    let names: Vec<&str> = file.samples.iter().map(|s| s.sample.as_str()).collect();
    assert_eq!(names, vec!["vbf", "dy"]);

    let vbf = &file.samples[0];
    assert_eq!(vbf.kind, SampleKind::Signal);
    assert_eq!(vbf.events_processed, 4);
    let all = vbf.get("c_ALL").unwrap();
    assert_eq!(all.name, "c_ALL_dimu_mass_vbf");
    assert!((all.integral() - 0.5).abs() < 1e-9);

    let (_, net) = file.net.iter().find(|(k, _)| k == "c_ALL").unwrap();
    assert_eq!(net.signal.as_ref().unwrap().name, "c_ALL_Net_Signal");
    assert_eq!(net.background.as_ref().unwrap().name, "c_ALL_Net_Bkg");
    assert!(net.data.is_none());
    assert!((net.yield_of(SampleKind::Background) - 0.5).abs() < 1e-9);

    // the raw JSON carries the same names for non-Rust readers
    let raw = fs::read_to_string(&histos).unwrap();
    assert!(raw.contains("\"c_ALL_Net_Signal\""));
}

#[test]
fn test_cli_cuts_file_and_override() {
    let ctx = TestContext::new();
    let cuts = ctx.path("cuts.json");
    fs::write(&cuts, r#"{ "run1": { "met_max": 1000.0 } }"#).unwrap();

    let relaxed = ctx.path("relaxed.csv");
    let output = run(&[
        "categorize",
        "--samples",
        ctx.manifest.to_str().unwrap(),
        "--cuts-file",
        cuts.to_str().unwrap(),
        "--lumi",
        "1.0",
        "--yields",
        relaxed.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!((read_yields(&relaxed)["c_2_Jet_VBF_Tight"].0 - 1.0).abs() < 1e-9);

    // a flag typed on the command line beats the file
    let strict = ctx.path("strict.csv");
    let output = run(&[
        "categorize",
        "--samples",
        ctx.manifest.to_str().unwrap(),
        "--cuts-file",
        cuts.to_str().unwrap(),
        "--met-max",
        "40",
        "--lumi",
        "1.0",
        "--yields",
        strict.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert_eq!(read_yields(&strict)["c_2_Jet_VBF_Tight"].0, 0.0);
}

#[test]
fn test_cli_tree_without_file_fails() {
    let ctx = TestContext::new();
    let output = run(&[
        "categorize",
        "--samples",
        ctx.manifest.to_str().unwrap(),
        "--categorizer",
        "tree",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_bad_manifest_fails() {
    let ctx = TestContext::new();
    let bad = ctx.path("bad.json");
    fs::write(&bad, "[]").unwrap();
    let output = run(&["categorize", "--samples", bad.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_cli_inspect_event() {
    let ctx = TestContext::new();
    let event = ctx.path("event.json");
    let e = EventBuilder::new().dimu_pt(30.0).muon_etas(1.0, 2.0).build();
    fs::write(&event, serde_json::to_string(&e).unwrap()).unwrap();

    let output = run(&[
        "inspect",
        "--categorizer",
        "run2",
        "--event",
        event.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("    c_0b_nonVlH_01j_gF_Tight_OE: 1"));
    assert!(stdout.contains("    c_Preselection_Fail: 0"));
}
