use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const BILL_TEXT: &str = "CPFL Paulista\nTotal a pagar R$ 150,00\nVencimento: 15/03/2025\n";

fn contas() -> Command {
    Command::cargo_bin("contas").unwrap()
}

#[test]
fn test_parse_text_file_json() {
    let dir = tempdir().unwrap();
    let text_path = dir.path().join("bill.txt");
    std::fs::write(&text_path, BILL_TEXT).unwrap();

    contas()
        .args(["parse", text_path.to_str().unwrap(), "--reference-date", "2025-02-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\": 150.0"))
        .stdout(predicate::str::contains("\"dueDate\": \"2025-03-15\""))
        .stdout(predicate::str::contains("\"company\": \"CPFL\""))
        .stdout(predicate::str::contains("\"billType\": \"ELECTRICITY\""));
}

#[test]
fn test_parse_stdin_text_format() {
    contas()
        .args(["parse", "-", "-f", "text", "--reference-date", "2025-02-01"])
        .write_stdin(BILL_TEXT)
        .assert()
        .success()
        .stdout(predicate::str::contains("Conta de Luz - Março"))
        .stdout(predicate::str::contains("R$ 150,00"));
}

#[test]
fn test_parse_missing_file() {
    contas()
        .args(["parse", "/nonexistent/bill.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_process_with_text_file_and_unreadable_image() {
    let dir = tempdir().unwrap();
    let image_path = dir.path().join("bill.png");
    let text_path = dir.path().join("bill.txt");
    std::fs::write(&image_path, b"not really a png").unwrap();
    std::fs::write(&text_path, BILL_TEXT).unwrap();

    contas()
        .args([
            "process",
            image_path.to_str().unwrap(),
            "--text-file",
            text_path.to_str().unwrap(),
            "--reference-date",
            "2025-02-01",
            "-f",
            "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("CPFL,ELECTRICITY,150.00,2025-03-15"));
}

#[test]
fn test_process_missing_input() {
    contas()
        .args(["process", "/nonexistent/bill.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_reminders_plan() {
    contas()
        .args(["reminders", "2025-03-15", "--created-at", "2025-03-13T08:00:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ONE_DAY_BEFORE").and(predicate::str::contains("2025-03-14 09:00")))
        .stdout(predicate::str::contains("DUE_DATE"))
        .stdout(predicate::str::contains("THREE_DAYS_BEFORE").not());
}

#[test]
fn test_config_init_get_set() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("contas").join("config.json");
    let config_arg = config_path.to_str().unwrap();

    contas()
        .args(["config", "init", "--output", config_arg])
        .assert()
        .success();
    assert!(config_path.exists());

    contas()
        .args(["--config", config_arg, "config", "get", "ocr.language"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"por\""));

    contas()
        .args(["--config", config_arg, "config", "set", "extraction.min_value", "10.5"])
        .assert()
        .success();

    contas()
        .args(["--config", config_arg, "config", "get", "extraction.min_value"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10.5"));

    contas()
        .args(["config", "init", "--output", config_arg])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_set_unknown_key() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    contas()
        .args(["--config", config_path.to_str().unwrap(), "config", "set", "ocr.nope", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_min_value_from_config_applies_to_parse() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    let text_path = dir.path().join("bill.txt");
    std::fs::write(&config_path, r#"{"extraction": {"min_value": 200.0}}"#).unwrap();
    std::fs::write(&text_path, BILL_TEXT).unwrap();

    contas()
        .args(["--config", config_path.to_str().unwrap(), "parse", text_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\"").not());
}

#[test]
fn test_config_set_rejects_inverted_bounds() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    contas()
        .args(["--config", config_path.to_str().unwrap(), "config", "set", "extraction.max_value", "1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be below"));
    assert!(!config_path.exists());
}
