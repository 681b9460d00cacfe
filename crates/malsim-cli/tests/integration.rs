use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn malsim(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("malsim").unwrap();
    cmd.current_dir(dir.path()).env("MALSIM_ROOT", dir.path());
    cmd
}

fn jsonl_kinds(dir: &TempDir) -> Vec<String> {
    let data = std::fs::read_to_string(dir.path().join("logs/sim.jsonl")).unwrap();
    data.lines()
        .map(|line| {
            let v: serde_json::Value = serde_json::from_str(line).unwrap();
            v["kind"].as_str().unwrap().to_string()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// malsim init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree_and_seeds() {
    let dir = TempDir::new().unwrap();
    malsim(&dir).arg("init").assert().success();

    assert!(dir.path().join("user_files").is_dir());
    assert!(dir.path().join("system_boot").is_dir());
    assert!(dir.path().join("strategic_locations").is_dir());
    assert!(dir.path().join("logs").is_dir());
    assert!(dir.path().join("quarantine").is_dir());
    assert!(dir.path().join("user_files/doc1.txt").is_file());
    assert!(dir.path().join("user_files/doc5.txt").is_file());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    malsim(&dir).arg("init").assert().success();
    std::fs::write(dir.path().join("user_files/doc1.txt"), b"edited").unwrap();
    malsim(&dir).arg("init").assert().success();

    // Already-seeded content is never regenerated.
    assert_eq!(
        std::fs::read_to_string(dir.path().join("user_files/doc1.txt")).unwrap(),
        "edited"
    );
}

// ---------------------------------------------------------------------------
// individual actions
// ---------------------------------------------------------------------------

#[test]
fn persistence_writes_entry_and_logs() {
    let dir = TempDir::new().unwrap();
    malsim(&dir)
        .arg("persistence")
        .assert()
        .success()
        .stdout(predicate::str::contains("autostart_entry.txt"));

    assert!(dir.path().join("system_boot/autostart_entry.txt").is_file());
    assert!(jsonl_kinds(&dir).contains(&"PERSISTENCE_SIMULATED".to_string()));
}

#[test]
fn duplicate_honors_copies_flag() {
    let dir = TempDir::new().unwrap();
    malsim(&dir)
        .args(["duplicate", "--copies", "2"])
        .assert()
        .success();

    let copies = std::fs::read_dir(dir.path().join("strategic_locations"))
        .unwrap()
        .count();
    assert_eq!(copies, 2);

    let kinds = jsonl_kinds(&dir);
    assert_eq!(
        kinds.iter().filter(|k| *k == "DUPLICATION_SIMULATED").count(),
        2
    );
}

#[test]
fn duplicate_zero_copies_is_legal() {
    let dir = TempDir::new().unwrap();
    malsim(&dir)
        .args(["duplicate", "--copies", "0"])
        .assert()
        .success();

    assert_eq!(
        std::fs::read_dir(dir.path().join("strategic_locations"))
            .unwrap()
            .count(),
        0
    );
    let kinds = jsonl_kinds(&dir);
    assert!(kinds.contains(&"PAYLOAD_STUB_CREATED".to_string()));
    assert!(!kinds.contains(&"DUPLICATION_SIMULATED".to_string()));
}

#[test]
fn scan_reports_seeded_files() {
    let dir = TempDir::new().unwrap();
    malsim(&dir)
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("scanned 5 file(s)"));

    let kinds = jsonl_kinds(&dir);
    assert_eq!(kinds.iter().filter(|k| *k == "FILE_FOUND").count(), 5);
}

// ---------------------------------------------------------------------------
// lock / unlock round trip
// ---------------------------------------------------------------------------

#[test]
fn lock_then_unlock_round_trip() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("user_files")).unwrap();
    std::fs::write(dir.path().join("user_files/doc1.txt"), b"important notes").unwrap();

    malsim(&dir).arg("lock").assert().success();
    assert!(dir.path().join("user_files/doc1.txt.locked").is_file());
    assert!(!dir.path().join("user_files/doc1.txt").exists());
    assert!(dir.path().join("user_files/LOCKED.txt").is_file());

    malsim(&dir).arg("unlock").assert().success();
    assert_eq!(
        std::fs::read(dir.path().join("user_files/doc1.txt")).unwrap(),
        b"important notes"
    );
    // The note was excluded from locking, so it has no marker to strip.
    assert!(dir.path().join("user_files/LOCKED.txt").is_file());
}

#[test]
fn unlock_collision_lands_in_quarantine() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("user_files")).unwrap();
    std::fs::write(dir.path().join("user_files/doc1.txt"), b"old").unwrap();

    malsim(&dir).arg("lock").assert().success();
    std::fs::write(dir.path().join("user_files/doc1.txt"), b"new").unwrap();

    malsim(&dir)
        .arg("unlock")
        .assert()
        .success()
        .stdout(predicate::str::contains("quarantined 1"));

    assert_eq!(
        std::fs::read(dir.path().join("user_files/doc1.txt")).unwrap(),
        b"new"
    );
    let quarantined: Vec<_> = std::fs::read_dir(dir.path().join("quarantine"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(quarantined.len(), 1);
    assert_eq!(std::fs::read(&quarantined[0]).unwrap(), b"old");
    assert!(jsonl_kinds(&dir).contains(&"UNDO_CONFLICT_MOVED_TO_QUARANTINE".to_string()));
}

// ---------------------------------------------------------------------------
// propagation and full scenario
// ---------------------------------------------------------------------------

#[test]
fn propagate_logs_the_fixed_trace() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "pause_min_ms: 0\npause_max_ms: 0\n",
    )
    .unwrap();
    malsim(&dir)
        .arg("propagate")
        .assert()
        .success()
        .stdout(predicate::str::contains("CLEANUP"));

    let kinds = jsonl_kinds(&dir);
    assert_eq!(
        kinds,
        vec![
            "PROPAGATION_GRAPH",
            "PROPAGATION_STATE",
            "PROPAGATION_TRANSITION",
            "PROPAGATION_TRANSITION",
            "PROPAGATION_TRANSITION",
            "PROPAGATION_TRANSITION",
            "PROPAGATION_DONE",
        ]
    );
}

#[test]
fn run_brackets_the_scenario() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "pause_min_ms: 0\npause_max_ms: 0\n",
    )
    .unwrap();
    malsim(&dir).arg("run").assert().success();

    let kinds = jsonl_kinds(&dir);
    assert_eq!(kinds.first().unwrap(), "SCENARIO_START");
    assert_eq!(kinds.last().unwrap(), "SCENARIO_END");
    assert!(kinds.contains(&"RANSOM_NOTE_CREATED".to_string()));
    assert!(kinds.contains(&"PROPAGATION_DONE".to_string()));
}

// ---------------------------------------------------------------------------
// log tailing
// ---------------------------------------------------------------------------

#[test]
fn log_tail_shows_recent_events() {
    let dir = TempDir::new().unwrap();
    malsim(&dir).arg("persistence").assert().success();
    malsim(&dir)
        .args(["log", "--tail", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PERSISTENCE_SIMULATED"));
}

#[test]
fn log_json_emits_parsed_events() {
    let dir = TempDir::new().unwrap();
    malsim(&dir).arg("persistence").assert().success();
    malsim(&dir)
        .args(["--json", "log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"PERSISTENCE_SIMULATED\""));
}

// ---------------------------------------------------------------------------
// calc
// ---------------------------------------------------------------------------

#[test]
fn calc_evaluates_expressions() {
    let dir = TempDir::new().unwrap();
    malsim(&dir)
        .args(["calc", "12*3+4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("40"));
}

#[test]
fn calc_rejects_illegal_characters() {
    let dir = TempDir::new().unwrap();
    malsim(&dir)
        .args(["calc", "1 + x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("illegal character"));
}
