use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONTRACT: &str = "中華電信MOD服務契約\n\
    申請日期：114/04/11\n\
    適用方案：家庭特選餐(3,792元)，合約期間2年。\n\
    MOD影劇館未租滿12個月者，解約金398元；\n\
    每日優惠金額：100M/40M 13.5元\n";

fn termcalc(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("termcalc").unwrap();
    // keep the user's real configuration out of the tests
    cmd.arg("-c").arg(dir.join("config.json"));
    cmd
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("contract.txt"), CONTRACT).unwrap();
    fs::write(dir.path().join("config.json"), "{}").unwrap();
    dir
}

#[test]
fn test_extract_plain_text() {
    let dir = setup();

    termcalc(dir.path())
        .arg("extract")
        .arg(dir.path().join("contract.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("家庭特選餐(3,792元)"));
}

#[test]
fn test_extract_missing_file() {
    let dir = setup();

    termcalc(dir.path())
        .arg("extract")
        .arg(dir.path().join("missing.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_parse_outputs_fields() {
    let dir = setup();

    let output = termcalc(dir.path())
        .arg("parse")
        .arg(dir.path().join("contract.txt"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let fields: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(fields["package_amounts"]["家庭特選餐"], 3792);
    assert_eq!(fields["contract_days"], 730);
    assert_eq!(fields["dates"][0], "2025-04-11");
    assert_eq!(fields["mod_specific"]["under_12_months"], 398);
    // clause groups sit beside the other fields
    assert!(fields["mod"][0]["text"].as_str().is_some_and(|t| t.contains("解約金398元")));
}

#[test]
fn test_parse_text_format() {
    let dir = setup();

    termcalc(dir.path())
        .args(["parse", "--format", "text"])
        .arg(dir.path().join("contract.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Contract days: 730"))
        .stdout(predicate::str::contains("家庭特選餐: 3792 元"));
}

#[test]
fn test_parse_then_calc_from_fields() {
    let dir = setup();
    let fields_path = dir.path().join("fields.json");

    termcalc(dir.path())
        .arg("parse")
        .arg(dir.path().join("contract.txt"))
        .arg("-o")
        .arg(&fields_path)
        .assert()
        .success();
    assert!(fields_path.exists());

    let output = termcalc(dir.path())
        .arg("calc")
        .arg("--fields")
        .arg(&fields_path)
        .args([
            "--start", "2025-04-06", "--end", "2025-05-05", "--cycle", "2", "--new-rent", "1299",
            "--old-rent", "999", "--package", "家庭特選餐",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["usage_days"], 29);
    assert_eq!(result["rent_adjustment"]["total_amount"], 300);
    assert_eq!(result["channel_penalty"]["amount"], 145);
    assert_eq!(result["channel_penalty"]["package"]["strategy"], "exact");
    assert_eq!(result["mod_penalty"]["amount"], 398);
    assert_eq!(result["subsidy_clawback"]["amount"], 9464);
    assert_eq!(result["total_fee"], 10307);
}

#[test]
fn test_calc_from_contract_csv() {
    let dir = setup();

    termcalc(dir.path())
        .arg("calc")
        .arg("--contract")
        .arg(dir.path().join("contract.txt"))
        .args([
            "--start", "2025-04-06", "--end", "2025-05-05", "--cycle", "2", "--new-rent", "1299",
            "--old-rent", "999", "--format", "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("component,label,days,amount"))
        .stdout(predicate::str::contains("total,,,10307"));
}

#[test]
fn test_calc_rejects_malformed_date() {
    let dir = setup();

    termcalc(dir.path())
        .arg("calc")
        .arg("--contract")
        .arg(dir.path().join("contract.txt"))
        .args([
            "--start", "2025/13/40", "--end", "2025-05-05", "--cycle", "2", "--new-rent", "1299",
            "--old-rent", "999",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date format"));
}

#[test]
fn test_calc_rejects_unknown_cycle() {
    let dir = setup();

    termcalc(dir.path())
        .arg("calc")
        .arg("--contract")
        .arg(dir.path().join("contract.txt"))
        .args([
            "--start", "2025-04-06", "--end", "2025-05-05", "--cycle", "7", "--new-rent", "1299",
            "--old-rent", "999",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown billing cycle 7"));
}

#[test]
fn test_calc_requires_a_source() {
    let dir = setup();

    termcalc(dir.path())
        .args([
            "calc", "--start", "2025-04-06", "--end", "2025-05-05", "--cycle", "2", "--new-rent",
            "1299", "--old-rent", "999",
        ])
        .assert()
        .failure();
}

#[test]
fn test_batch_writes_summary() {
    let dir = setup();
    fs::write(dir.path().join("empty.txt"), "").unwrap();
    let summary = dir.path().join("summary.csv");
    let pattern = dir.path().join("*.txt");

    termcalc(dir.path())
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2 files"));

    let csv = fs::read_to_string(&summary).unwrap();
    assert!(csv.starts_with("filename,status,format"));
    assert!(csv.contains("contract.txt,success,plain text,no,730,家庭特選餐=3792,2025-04-11,398,"));
    assert!(csv.contains("empty.txt,success"));
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();

    termcalc(dir.path())
        .args(["config", "init"])
        .assert()
        .success();

    termcalc(dir.path())
        .args(["config", "set", "calculation.days_per_month", "31"])
        .assert()
        .success();

    termcalc(dir.path())
        .args(["config", "get", "calculation.days_per_month"])
        .assert()
        .success()
        .stdout(predicate::str::diff("31\n"));

    termcalc(dir.path())
        .args(["config", "get", "calculation.missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = setup();

    termcalc(dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
