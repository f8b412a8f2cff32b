//! Integration tests for the n8nctl binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A command with an isolated config file and no ambient overrides.
fn n8nctl(config: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("n8nctl"));
    cmd.env("N8NCTL_CONFIG", config)
        .env_remove("N8NCTL_INSTANCE")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn init_instance(config: &Path, name: &str, url: &str) {
    n8nctl(config)
        .args(["config", "init", "--name", name, "--url", url])
        .args(["--api-key", "secret-key-1234"])
        .assert()
        .success();
}

fn serve_workflow(server: &MockServer, id: &str, name: &str, calls: Option<&str>) {
    let nodes = match calls {
        Some(target) => json!([{
            "name": "Call",
            "type": "n8n-nodes-base.executeWorkflow",
            "parameters": {"workflowId": target}
        }]),
        None => json!([]),
    };
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/api/v1/workflows/{}", id))
            .header("X-N8N-API-KEY", "secret-key-1234");
        then.status(200).json_body(json!({
            "id": id,
            "name": name,
            "active": false,
            "nodes": nodes,
            "connections": {},
            "settings": {}
        }));
    });
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("n8nctl"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("n8n workflows"))
        .stdout(predicate::str::contains("workflow"))
        .stdout(predicate::str::contains("config"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("n8nctl"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_unknown_subcommand_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("n8nctl"));
    cmd.arg("frobnicate");
    cmd.assert().failure();
    Ok(())
}

#[test]
fn cli_config_init_then_list() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = temp.path().join("config.json");

    n8nctl(&config)
        .args(["config", "init", "--name", "prod"])
        .args(["--url", "https://n8n.example.com/", "--api-key", "secret-key-1234"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Added instance 'prod'"));

    let saved: Value = serde_json::from_str(&fs::read_to_string(&config)?)?;
    assert_eq!(saved["currentInstance"], "prod");
    assert_eq!(saved["instances"]["prod"]["url"], "https://n8n.example.com");

    n8nctl(&config)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prod"))
        .stdout(predicate::str::contains("****1234"))
        .stdout(predicate::str::contains("secret-key").not());
    Ok(())
}

#[test]
fn cli_config_list_json_omits_keys() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = temp.path().join("config.json");
    init_instance(&config, "prod", "https://n8n.example.com");

    let output = n8nctl(&config).args(["config", "list", "--json"]).output()?;
    assert!(output.status.success());

    let listed: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(listed[0]["name"], "prod");
    assert_eq!(listed[0]["current"], true);
    assert!(listed[0].get("apiKey").is_none());
    Ok(())
}

#[test]
fn cli_config_init_reads_prompt_answers_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = temp.path().join("config.json");

    n8nctl(&config)
        .args(["config", "init"])
        .env("N8NCTL_PROMPT_NAME", "staging")
        .env("N8NCTL_PROMPT_URL", "https://staging.example.com")
        .env("N8NCTL_PROMPT_API_KEY", "staging-key")
        .assert()
        .success();

    let saved: Value = serde_json::from_str(&fs::read_to_string(&config)?)?;
    assert_eq!(saved["instances"]["staging"]["apiKey"], "staging-key");
    Ok(())
}

#[test]
fn cli_config_use_unknown_instance_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = temp.path().join("config.json");
    init_instance(&config, "prod", "https://n8n.example.com");

    n8nctl(&config)
        .args(["config", "use", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Instance 'nope' not found"));
    Ok(())
}

#[test]
fn cli_config_remove_switches_current() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = temp.path().join("config.json");
    init_instance(&config, "dev", "https://dev.example.com");
    init_instance(&config, "prod", "https://n8n.example.com");

    n8nctl(&config)
        .args(["config", "remove", "dev", "--yes"])
        .assert()
        .success();

    let saved: Value = serde_json::from_str(&fs::read_to_string(&config)?)?;
    assert_eq!(saved["currentInstance"], "prod");
    assert!(saved["instances"].get("dev").is_none());
    Ok(())
}

#[test]
fn cli_workflow_command_without_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = temp.path().join("missing.json");

    n8nctl(&config)
        .args(["workflow", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("n8nctl config init"));
    Ok(())
}

#[test]
fn cli_push_directory_without_manifest_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = temp.path().join("config.json");
    let dir = temp.path().join("empty");
    fs::create_dir_all(&dir)?;

    n8nctl(&config)
        .args(["workflow", "push"])
        .arg(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No manifest.json"));
    Ok(())
}

#[test]
fn cli_pull_recursive_then_push_create() -> Result<(), Box<dyn std::error::Error>> {
    let source = MockServer::start();
    serve_workflow(&source, "A", "Main", Some("B"));
    serve_workflow(&source, "B", "Sub", None);

    let target = MockServer::start();
    let create_sub = target.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/workflows")
            .body_includes(r#""name":"Sub""#);
        then.status(200)
            .json_body(json!({"id": "new-b", "name": "Sub", "nodes": [], "connections": {}}));
    });
    let create_main = target.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/workflows")
            .body_includes(r#""name":"Main""#)
            .body_includes(r#""workflowId":"new-b""#);
        then.status(200)
            .json_body(json!({"id": "new-a", "name": "Main", "nodes": [], "connections": {}}));
    });

    let temp = TempDir::new()?;
    let config = temp.path().join("config.json");
    let out = temp.path().join("pulled");
    init_instance(&config, "source", &source.base_url());
    init_instance(&config, "target", &target.base_url());

    n8nctl(&config)
        .args(["workflow", "pull", "A", "--recursive", "--instance", "source", "--dir"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Pulled 2 workflows"));

    assert!(out.join("Main.json").is_file());
    assert!(out.join("Sub.json").is_file());
    let manifest: Value = serde_json::from_str(&fs::read_to_string(out.join("manifest.json"))?)?;
    assert_eq!(manifest["rootWorkflow"], "A");
    assert_eq!(manifest["instance"], "source");

    let output = n8nctl(&config)
        .args(["workflow", "push", "--create", "--json", "--instance", "target"])
        .arg(&out)
        .output()?;
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["idMapping"]["A"], "new-a");
    assert_eq!(report["idMapping"]["B"], "new-b");

    create_sub.assert();
    create_main.assert();
    Ok(())
}

#[test]
fn cli_var_get_prints_value_to_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/variables")
            .header("X-N8N-API-KEY", "secret-key-1234");
        then.status(200).json_body(json!({
            "data": [{"id": "7", "key": "REGION", "value": "eu-west-1"}]
        }));
    });
    let temp = TempDir::new()?;
    let config = temp.path().join("config.json");
    init_instance(&config, "prod", &server.base_url());

    n8nctl(&config)
        .args(["var", "get", "REGION"])
        .assert()
        .success()
        .stdout("eu-west-1\n");

    n8nctl(&config)
        .args(["variable", "delete", "MISSING", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Variable 'MISSING' not found"));
    Ok(())
}

#[test]
fn cli_completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("n8nctl"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("n8nctl"));
    Ok(())
}
