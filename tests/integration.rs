use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const BASKETS: &str = "Id,Items\n1,\"A, B\"\n2,\"A, B, C\"\n3,A\n4,\"B, C\"\n";

/// Binary with `--config` pointing into `dir`, so no user config leaks in.
fn cargo_bin(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_basket-miner"));
    cmd.arg("--config").arg(dir.join("config.toml"));
    cmd
}

fn write_dataset(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn find_record<'a>(json: &'a serde_json::Value, items: &[&str]) -> Option<&'a serde_json::Value> {
    json["frequent_itemsets"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["itemset"] == serde_json::json!(items))
}

#[test]
fn mine_worked_example() {
    let dir = tempfile::TempDir::new().unwrap();
    let data = write_dataset(dir.path(), "baskets.csv", BASKETS);

    let output = cargo_bin(dir.path())
        .args(["mine", "--input", data.to_str().unwrap()])
        .args(["--min-support", "50", "--min-confidence", "50"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("invalid JSON");
    assert_eq!(json["dataset"]["transactions"], 4);
    assert_eq!(json["dataset"]["hash"].as_str().unwrap().len(), 64);
    assert_eq!(json["min_support"], 50.0);

    assert_eq!(json["frequent_itemsets"].as_array().unwrap().len(), 5);
    assert_eq!(find_record(&json, &["A"]).unwrap()["support"], 75.0);
    assert_eq!(find_record(&json, &["A", "B"]).unwrap()["frequency"], 2);
    assert!(find_record(&json, &["A", "C"]).is_none());

    let rules = json["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 4);
    let rule = rules
        .iter()
        .find(|r| r["antecedent"] == serde_json::json!(["B", "C"]) && r["consequent"] == serde_json::json!(["C"]))
        .expect("rule {B, C} -> {C}");
    assert_eq!(rule["confidence"], 100.0);
}

#[test]
fn mine_named_dataset() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("datasets")).unwrap();
    write_dataset(&dir.path().join("datasets"), "costco.csv", BASKETS);

    let output = cargo_bin(dir.path())
        .args(["mine", "--dataset", "costco", "-s", "50", "-c", "50"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["dataset"]["source"].as_str().unwrap().ends_with("costco.csv"));
}

#[test]
fn mine_uses_config_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[mining]\nmin_support = 75.0\nmin_confidence = 90.0\n",
    )
    .unwrap();
    let data = write_dataset(dir.path(), "baskets.csv", BASKETS);

    let output = cargo_bin(dir.path())
        .args(["mine", "--input", data.to_str().unwrap()])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["min_support"], 75.0);
    assert_eq!(json["frequent_itemsets"].as_array().unwrap().len(), 2);
    assert!(json["rules"].as_array().unwrap().is_empty());
}

#[test]
fn malformed_row_is_data_format_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let data = write_dataset(dir.path(), "bad.csv", "Id,Items\n1,\"A, B\"\n2,\"A, , C\"\n");

    let output = cargo_bin(dir.path())
        .args(["mine", "--input", data.to_str().unwrap()])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["error"]["code"], "DATA_FORMAT_ERROR");
    assert!(json["error"]["message"].as_str().unwrap().contains("Row 1"));
}

#[test]
fn out_of_range_threshold_is_invalid_parameter() {
    let dir = tempfile::TempDir::new().unwrap();
    let data = write_dataset(dir.path(), "baskets.csv", BASKETS);

    for (flag, value) in [("--min-support", "-5"), ("--min-confidence", "150")] {
        let output = cargo_bin(dir.path())
            .args(["mine", "--input", data.to_str().unwrap(), flag, value])
            .output()
            .expect("failed to run");
        assert!(!output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["error"]["code"], "INVALID_PARAMETER", "{flag} {value}");
    }
}

#[test]
fn missing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let output = cargo_bin(dir.path())
        .args(["mine", "--input", "nonexistent.csv"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["error"]["code"], "FILE_NOT_FOUND");
}

#[test]
fn missing_dataset_selector() {
    let dir = tempfile::TempDir::new().unwrap();
    let output = cargo_bin(dir.path())
        .args(["mine"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["error"]["code"], "INVALID_REQUEST");
}

#[test]
fn compare_with_agreeing_reference() {
    let dir = tempfile::TempDir::new().unwrap();
    let data = write_dataset(dir.path(), "baskets.csv", BASKETS);
    let reference = write_dataset(
        dir.path(),
        "reference.json",
        r#"{
            "frequent_itemsets": [
                {"itemsets": ["A"], "support": 0.75},
                {"itemsets": ["B"], "support": 0.75},
                {"itemsets": ["C"], "support": 0.5},
                {"itemsets": ["A", "B"], "support": 0.5},
                {"itemsets": ["B", "C"], "support": 0.5}
            ],
            "rules": [
                {"antecedents": ["A"], "consequents": ["B"], "support": 0.5, "confidence": 0.6666666666666666},
                {"antecedents": ["B"], "consequents": ["A"], "support": 0.5, "confidence": 0.6666666666666666},
                {"antecedents": ["B"], "consequents": ["C"], "support": 0.5, "confidence": 0.6666666666666666},
                {"antecedents": ["C"], "consequents": ["B"], "support": 0.5, "confidence": 1.0}
            ]
        }"#,
    );

    let output = cargo_bin(dir.path())
        .args(["compare", "--input", data.to_str().unwrap()])
        .args(["--reference", reference.to_str().unwrap()])
        .args(["--min-support", "50", "--min-confidence", "50"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["agrees"], true, "{json}");
    assert_eq!(json["itemsets"]["matched"], 5);
    assert_eq!(json["rules"]["matched"], 4);
}

#[test]
fn session_ndjson() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut child = cargo_bin(dir.path())
        .arg("session")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn");

    let stdin = child.stdin.as_mut().unwrap();
    writeln!(
        stdin,
        r#"{{"command":"mine","transactions":[["A","B"],["A","B","C"],["A"],["B","C"]],"min_support":50,"min_confidence":50}}"#
    )
    .unwrap();
    writeln!(stdin, r#"{{"command":"mine","transactions":[["A"]],"min_support":101}}"#).unwrap();
    writeln!(stdin, r#"{{"command":"mine"}}"#).unwrap();
    writeln!(stdin, "not json").unwrap();
    drop(child.stdin.take());

    let output = child.wait_with_output().expect("failed to wait");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("invalid NDJSON line"))
        .collect();
    assert_eq!(lines.len(), 4);

    assert_eq!(lines[0]["dataset"]["source"], "inline");
    assert_eq!(lines[0]["frequent_itemsets"].as_array().unwrap().len(), 5);
    assert_eq!(lines[1]["error"]["code"], "INVALID_PARAMETER");
    assert_eq!(lines[2]["error"]["code"], "INVALID_REQUEST");
    assert_eq!(lines[3]["error"]["code"], "INVALID_REQUEST");
}

#[test]
fn batch_mine_keeps_order_and_reports_errors() {
    let dir = tempfile::TempDir::new().unwrap();
    let first = write_dataset(dir.path(), "first.csv", BASKETS);
    let second = write_dataset(dir.path(), "second.csv", "Items\nX\n\"X, Y\"\n");
    let inputs = format!(
        "{},{},{}",
        first.display(),
        dir.path().join("missing.csv").display(),
        second.display()
    );

    let output = cargo_bin(dir.path())
        .args(["mine", "--inputs", &inputs, "-s", "50", "-c", "50"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["dataset"]["transactions"], 4);
    assert_eq!(lines[1]["error"]["code"], "FILE_NOT_FOUND");
    assert_eq!(lines[2]["dataset"]["transactions"], 2);
}

#[test]
fn batch_inputs_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let data = write_dataset(dir.path(), "baskets.csv", BASKETS);
    let list = write_dataset(
        dir.path(),
        "inputs.txt",
        &format!("{}\n\n{}\n", data.display(), data.display()),
    );

    let output = cargo_bin(dir.path())
        .args(["mine", "--inputs-file", list.to_str().unwrap()])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 2);
}

#[test]
fn compact_output_default() {
    let dir = tempfile::TempDir::new().unwrap();
    let data = write_dataset(dir.path(), "baskets.csv", BASKETS);

    let output = cargo_bin(dir.path())
        .args(["mine", "--input", data.to_str().unwrap()])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim().lines().count(), 1);
}

#[test]
fn pretty_output_flag() {
    let dir = tempfile::TempDir::new().unwrap();
    let data = write_dataset(dir.path(), "baskets.csv", BASKETS);

    let output = cargo_bin(dir.path())
        .args(["mine", "--input", data.to_str().unwrap(), "--pretty"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.trim().lines().count() > 1);
    let _: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON");
}

#[test]
fn init_writes_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let target = dir.path().join("nested").join("config.toml");

    let output = cargo_bin(dir.path())
        .args(["init", "--path", target.to_str().unwrap()])
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let content = std::fs::read_to_string(&target).unwrap();
    assert!(content.contains("[mining]"));
    assert!(content.contains("min_support = 10.0"));
}
