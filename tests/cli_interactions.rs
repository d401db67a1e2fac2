//! CLI interaction tests
//!
//! Every command runs in an empty temporary directory with the configuration
//! variables cleared, so a developer's own .env or shell settings never leak in.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const CONFIG_VARS: &[&str] = &[
    "SUI_NETWORK",
    "RPC_ENDPOINTS",
    "CUSTOM_RPC_ENDPOINTS",
    "EXCLUDE_RPC_ENDPOINTS",
    "ROUNDS",
    "WARMUP_ROUNDS",
    "PROBE_KIND",
    "TIMEOUT_SECONDS",
    "MAX_CONCURRENCY",
    "ENABLE_COLOR",
];

/// Command isolated from the caller's environment and working directory
fn create_test_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rlr").unwrap();
    cmd.current_dir(dir.path());
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Mock node with a healthy route and a failing route
fn start_mock_node(rt: &tokio::runtime::Runtime) -> MockServer {
    rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fast"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "jsonrpc": "2.0", "id": 1, "result": [] }))
                    .set_delay(Duration::from_millis(5)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        server
    })
}

#[test]
fn test_help_lists_options() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--add-endpoint"))
        .stdout(predicate::str::contains("--rounds"))
        .stdout(predicate::str::contains("--init-env"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_list_endpoints_with_selection_flags() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args([
            "--list-endpoints",
            "--endpoint", "https://a.example",
            "--endpoint", "https://b.example",
            "--add-endpoint", "https://c.example",
            "--exclude", "https://a.example",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ] https://a.example"))
        .stdout(predicate::str::contains("[x] https://b.example"))
        .stdout(predicate::str::contains("[x] https://c.example"));
}

#[test]
fn test_list_endpoints_for_network() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--list-endpoints", "--network", "localnet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://127.0.0.1:9000"));
}

#[test]
fn test_dotenv_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".env"),
        "SUI_NETWORK=testnet\nCUSTOM_RPC_ENDPOINTS=https://mine.example\n",
    )
    .unwrap();

    create_test_cmd(&dir)
        .arg("--list-endpoints")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://fullnode.testnet.sui.io"))
        .stdout(predicate::str::contains("[x] https://mine.example"));
}

#[test]
fn test_cli_overrides_environment() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .env("SUI_NETWORK", "devnet")
        .args(["--list-endpoints", "--network", "localnet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("127.0.0.1:9000"))
        .stdout(predicate::str::contains("devnet").not());
}

#[test]
fn test_rounds_out_of_range_is_rejected() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir).args(["--rounds", "1"]).assert().failure();
    create_test_cmd(&dir).args(["--rounds", "101"]).assert().failure();
}

#[test]
fn test_warmup_must_leave_measured_rounds() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--rounds", "3", "--warmup", "3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--warmup"));
}

#[test]
fn test_invalid_env_value_is_config_error() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .env("ROUNDS", "plenty")
        .arg("--list-endpoints")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ROUNDS"));
}

#[test]
fn test_single_round_from_env_is_rejected() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .env("ROUNDS", "1")
        .env("WARMUP_ROUNDS", "0")
        .arg("--list-endpoints")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("at least 2"));
}

#[test]
fn test_excluding_everything_is_config_error() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--endpoint", "https://a.example", "--exclude", "https://a.example"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No endpoints left"));
}

#[test]
fn test_init_env_writes_example_once() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("example.env");

    create_test_cmd(&dir)
        .arg("--init-env")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote example configuration"));

    let content = fs::read_to_string(&target).unwrap();
    assert!(content.contains("CUSTOM_RPC_ENDPOINTS="));
    assert!(content.contains("PROBE_KIND="));

    create_test_cmd(&dir)
        .arg("--init-env")
        .arg(&target)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_env_help() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--env-help")
        .assert()
        .success()
        .stdout(predicate::str::contains("EXCLUDE_RPC_ENDPOINTS"))
        .stdout(predicate::str::contains("Configuration Priority"));
}

#[test]
fn test_probe_run_json_output() {
    let dir = TempDir::new().unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = start_mock_node(&rt);
    let fast = format!("{}/fast", server.uri());
    let down = format!("{}/down", server.uri());

    let output = create_test_cmd(&dir)
        .args(["--endpoint", &down, "--endpoint", &fast, "--rounds", "3", "--timeout", "5", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0]["endpoint"], fast.as_str());
    assert_eq!(rows[0]["error"], false);
    assert!(rows[0]["average"].as_f64().unwrap() >= 5.0);

    assert_eq!(rows[1]["endpoint"], down.as_str());
    assert_eq!(rows[1]["error"], true);
    assert!(rows[1]["p90"].is_null());
}

#[test]
fn test_probe_run_table_output() {
    let dir = TempDir::new().unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = start_mock_node(&rt);

    create_test_cmd(&dir)
        .args(["--no-color", "--rounds", "2", "--timeout", "5"])
        .arg("--endpoint")
        .arg(format!("{}/fast", server.uri()))
        .arg("--endpoint")
        .arg(format!("{}/down", server.uri()))
        .assert()
        .success()
        .stdout(predicate::str::contains("ENDPOINT"))
        .stdout(predicate::str::contains("Error"))
        .stdout(predicate::str::contains("ABOUT"))
        .stdout(predicate::str::contains("1 sui_multiGetObjects requests"));
}

#[test]
fn test_all_endpoints_failing_still_exits_zero() {
    let dir = TempDir::new().unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = start_mock_node(&rt);

    create_test_cmd(&dir)
        .args(["--json", "--rounds", "2", "--timeout", "5"])
        .arg("--endpoint")
        .arg(format!("{}/down", server.uri()))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"error\": true"));
}
