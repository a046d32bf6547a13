//! Smoke tests to verify command wiring

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::Command;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use predicates::prelude::*;
use tempfile::TempDir;

fn happy(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("happy").unwrap();
    cmd.env("HAPPY_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("HAPPY_API_URL");
    cmd
}

// === Help ===

#[test]
fn test_create_help() {
    let dir = TempDir::new().unwrap();
    happy(&dir)
        .args(["create", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("API base URL"));
}

#[test]
fn test_submit_help() {
    let dir = TempDir::new().unwrap();
    happy(&dir)
        .args(["submit", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--closed-on-weekends"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("HAPPY_API_URL"));
}

#[test]
fn test_config_help() {
    let dir = TempDir::new().unwrap();
    happy(&dir)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init"));
}

// === Submit ===

#[test]
fn test_submit_dry_run_json() {
    let dir = TempDir::new().unwrap();
    happy(&dir)
        .args([
            "submit",
            "--name",
            "Lar das Meninas",
            "--latitude",
            "-22.85",
            "--longitude",
            "-47.2",
            "--image",
            "front.png",
            "--dry-run",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"open_on_weekends\""))
        .stdout(predicate::str::contains("-22.85"))
        .stdout(predicate::str::contains("image/png"));
}

#[test]
fn test_submit_dry_run_lists_parts() {
    let dir = TempDir::new().unwrap();
    happy(&dir)
        .args([
            "submit",
            "--name",
            "Lar",
            "--latitude",
            "0",
            "--longitude",
            "0",
            "--closed-on-weekends",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("POST orphanages"))
        .stdout(predicate::str::contains("false"));
}

#[test]
fn test_submit_without_position_fails() {
    let dir = TempDir::new().unwrap();
    happy(&dir)
        .args(["submit", "--name", "Lar", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("location on the map"));
}

#[test]
fn test_submit_to_unreachable_api_fails() {
    let dir = TempDir::new().unwrap();
    happy(&dir)
        .args([
            "submit",
            "--name",
            "Lar",
            "--latitude",
            "-22.85",
            "--longitude",
            "-47.2",
            "--api-url",
            "http://127.0.0.1:1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Orphanage was not created"));
}

/// Local API accepting every orphanage with 201 Created
async fn spawn_accepting_api() -> String {
    let app = Router::new().route(
        "/orphanages",
        post(|body: Bytes| async move {
            assert!(!body.is_empty());
            StatusCode::CREATED
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_submit_success_notifies_and_navigates() {
    let api_url = spawn_accepting_api().await;
    let dir = TempDir::new().unwrap();
    let image = dir.path().join("front.png");
    std::fs::write(&image, b"\x89PNG").unwrap();

    let mut cmd = happy(&dir);
    cmd.args(["submit", "--name", "Lar", "--latitude", "-22.85", "--longitude", "-47.2"])
        .arg("--image")
        .arg(&image)
        .args(["--api-url", &api_url]);

    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Cadastro realizado com Sucesso!"))
        .stdout(predicate::str::contains("→ /app"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_submit_api_url_from_env() {
    let api_url = spawn_accepting_api().await;
    let dir = TempDir::new().unwrap();

    let mut cmd = happy(&dir);
    cmd.env("HAPPY_API_URL", &api_url).args([
        "submit",
        "--name",
        "Lar",
        "--latitude",
        "-22.85",
        "--longitude",
        "-47.2",
    ]);

    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("→ /app"));
}

// === Config ===

#[test]
fn test_config_path_honors_env() {
    let dir = TempDir::new().unwrap();
    happy(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();
    happy(&dir).args(["config", "init"]).assert().success();
    assert!(dir.path().join("config.toml").exists());

    happy(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    happy(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url"));
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    happy(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("happy"));
}
