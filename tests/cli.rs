#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn write_roster(dir: &std::path::Path, count: usize) -> std::path::PathBuf {
    let mut content = String::from("name\n");
    for i in 0..count {
        content.push_str(&format!("p{i:02}\n"));
    }
    let path = dir.join("roster.csv");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn generate_writes_calendar_stats_and_plan() {
    let dir = tempdir().unwrap();
    let roster = write_roster(dir.path(), 30);
    let calendar = dir.path().join("calendar.csv");
    let stats = dir.path().join("stats.csv");
    let plan = dir.path().join("plan.json");

    Command::cargo_bin("roulement-cli")
        .unwrap()
        .args([
            "generate",
            "--roster",
            roster.to_str().unwrap(),
            "--start-date",
            "2026-01-05",
            "--weeks",
            "2",
            "--seed",
            "7",
            "--out-calendar",
            calendar.to_str().unwrap(),
            "--out-stats",
            stats.to_str().unwrap(),
            "--plan",
            plan.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("week 0"));

    assert!(calendar.exists());
    assert!(stats.exists());

    Command::cargo_bin("roulement-cli")
        .unwrap()
        .args(["show", "--plan", plan.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("week 1"));
}

#[test]
fn generate_rejects_small_roster() {
    let dir = tempdir().unwrap();
    let roster = write_roster(dir.path(), 29);

    Command::cargo_bin("roulement-cli")
        .unwrap()
        .args([
            "generate",
            "--roster",
            roster.to_str().unwrap(),
            "--start-date",
            "2026-01-05",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("roster too small"));
}

#[test]
fn infeasible_run_exits_with_warning_code_and_partial_output() {
    let dir = tempdir().unwrap();
    let roster = write_roster(dir.path(), 30);
    let calendar = dir.path().join("calendar.csv");

    // 8 personnes éligibles au week-end pour 5 gardes : la semaine 1
    // tombe en carence.
    let excluded = (8..30)
        .map(|i| format!("p{i:02}"))
        .collect::<Vec<_>>()
        .join(",");

    Command::cargo_bin("roulement-cli")
        .unwrap()
        .args([
            "generate",
            "--roster",
            roster.to_str().unwrap(),
            "--start-date",
            "2026-01-05",
            "--weeks",
            "2",
            "--seed",
            "3",
            "--exclude-weekend",
            excluded.as_str(),
            "--out-calendar",
            calendar.to_str().unwrap(),
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("infeasible at week 1"));

    // Le calendrier partiel (semaine 0) est tout de même exporté.
    let content = fs::read_to_string(&calendar).unwrap();
    assert!(content.contains("2026-01-05"));
    assert!(!content.contains("2026-01-12"));
}
