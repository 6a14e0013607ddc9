use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use intake_test_utils::{RecordedRequest, StubResponse, StubServer};
use serde_json::json;

fn write_config(dir: &TempDir, server_url: &str) -> std::path::PathBuf {
    let config = dir.child("intake.toml");
    config
        .write_str(&format!(
            r#"
[tme]
token = "tok"
secret = "sec"
api_url = "{server_url}"
timeout_secs = 5

[partkeepr]
url = "{server_url}"
user = "admin"
password = "pwd"
timeout_secs = 5
"#
        ))
        .unwrap();
    config.path().to_path_buf()
}

fn intake_cmd(config: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("intake").unwrap();
    cmd.arg("--config").arg(config).arg("--no-cue");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// TME knows "ABC", PartKeepr knows nothing.
fn empty_inventory(req: &RecordedRequest) -> StubResponse {
    match req.path() {
        "/Products/GetProducts.json" => StubResponse::json(json!({
            "Status": "OK",
            "Data": { "ProductList": [{ "Symbol": "ABC", "Description": "Test part" }] }
        })),
        "/Products/GetParameters.json" => StubResponse::json(json!({
            "Status": "OK",
            "Data": { "ProductList": [{ "Symbol": "ABC", "ParameterList": [] }] }
        })),
        "/Products/GetProductsFiles.json" => StubResponse::json(json!({
            "Status": "OK",
            "Data": { "ProductList": [{ "Symbol": "ABC", "Files": { "DocumentList": [] } }] }
        })),
        "/api/parts" if req.method == "GET" => StubResponse::json(json!({ "hydra:member": [] })),
        "/api/parts" if req.method == "POST" => {
            StubResponse::status(201, r#"{"@id": "/api/parts/1"}"#)
        }
        _ => StubResponse::status(404, "{}"),
    }
}

#[test]
fn unknown_part_is_created_and_run_ends_cleanly() {
    let server = StubServer::start(empty_inventory);
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, server.url());

    let assert = intake_cmd(&config)
        .write_stdin("QTY:1 PN:ABC MFR:M MPN:M1 PO:1 tme.eu/x\n\n")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("Looking for part: ABC"), "{stdout}");
    assert!(
        stdout.contains("Part ABC (1 new units) loaded to PartKeepr"),
        "{stdout}"
    );
    assert!(stdout.contains("bye !"), "{stdout}");

    let creates: Vec<_> = server
        .requests()
        .into_iter()
        .filter(|r| r.method == "POST" && r.path() == "/api/parts")
        .collect();
    assert_eq!(creates.len(), 1);
    let doc = creates[0].json();
    assert_eq!(doc["name"], "ABC");
    assert_eq!(doc["description"], "Test part");
    assert_eq!(doc["stockLevels"][0]["stockLevel"], 1);
    assert_eq!(doc["footprint"], serde_json::Value::Null);
}

#[test]
fn known_part_gets_stock() {
    let server = StubServer::start(|req| match req.path() {
        "/api/parts" => StubResponse::json(json!({
            "hydra:member": [{ "@id": "/api/parts/5", "name": "ABC" }]
        })),
        "/api/parts/5/addStock" => StubResponse::json(json!({ "@id": "/api/parts/5" })),
        _ => empty_inventory(req),
    });
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, server.url());

    let assert = intake_cmd(&config)
        .write_stdin("QTY:4 PN:ABC MFR:M MPN:M1 PO:77 tme.eu/x\n")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(
        stdout.contains("ABC - Increased stock in 4 units"),
        "{stdout}"
    );

    let requests = server.requests();
    let add_stock: Vec<_> = requests.iter().filter(|r| r.method == "PUT").collect();
    assert_eq!(add_stock.len(), 1);
    assert_eq!(add_stock[0].form_param("quantity").as_deref(), Some("4"));
    assert_eq!(add_stock[0].form_param("comment").as_deref(), Some("77"));
    let created = requests
        .iter()
        .any(|r| r.method == "POST" && r.path() == "/api/parts");
    assert!(!created);
}

#[test]
fn empty_input_says_bye() {
    let server = StubServer::start(empty_inventory);
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, server.url());

    let assert = intake_cmd(&config).write_stdin("").assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert_eq!(stdout.trim(), "bye !");
    assert!(server.requests().is_empty());
}

#[test]
fn unrecognized_input_fails() {
    let server = StubServer::start(empty_inventory);
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, server.url());

    let assert = intake_cmd(&config)
        .write_stdin("4006381333931\n")
        .assert()
        .failure()
        .code(1);

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("unrecognized raw data format"), "{stderr}");
    assert!(server.requests().is_empty());
}

#[test]
fn inventory_error_fails() {
    let server = StubServer::start(|req| match req.path() {
        "/api/parts" => StubResponse::status(500, "database down"),
        _ => empty_inventory(req),
    });
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, server.url());

    let assert = intake_cmd(&config)
        .write_stdin("QTY:1 PN:ABC MFR:M MPN:M1 PO:1 tme.eu/x\n\n")
        .assert()
        .failure()
        .code(1);

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("database down"), "{stderr}");
}

#[test]
fn input_file_option() {
    let server = StubServer::start(empty_inventory);
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, server.url());
    let scans = dir.child("scans.txt");
    scans
        .write_str("QTY:2 PN:ABC MFR:M MPN:M1 PO:1 tme.eu/x\n")
        .unwrap();

    intake_cmd(&config)
        .arg("--input")
        .arg(scans.path())
        .assert()
        .success();

    let created = server
        .requests()
        .into_iter()
        .find(|r| r.method == "POST" && r.path() == "/api/parts")
        .unwrap();
    assert_eq!(created.json()["stockLevels"][0]["stockLevel"], 2);
}

#[test]
fn missing_config_fails() {
    let dir = TempDir::new().unwrap();

    let assert = intake_cmd(&dir.path().join("nope.toml"))
        .write_stdin("")
        .assert()
        .failure()
        .code(1);

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("Failed to read config file"), "{stderr}");
}
