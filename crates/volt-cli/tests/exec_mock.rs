//! `volt exec` against a mock Gemini endpoint.

mod fixtures;

use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::{STREAM_PATH, error_after_text_sse, sse_response, text_sse};
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

async fn mount_stream(server: &MockServer, body: String) {
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(query_param("alt", "sse"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(sse_response(&body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_exec_streams_reply_text() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_stream(
        &server,
        text_sse(&["## Use Case Understanding\n\n", "Step 12V down to 5V."]),
    )
    .await;

    cargo_bin_cmd!("volt")
        .env("VOLT_HOME", home.path())
        .env("GEMINI_API_KEY", "test-key")
        .env("GEMINI_BASE_URL", server.uri())
        .args(["exec", "-p", "Need a voltage regulator"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "## Use Case Understanding\n\nStep 12V down to 5V.",
        ));
}

#[tokio::test]
async fn test_exec_html_renders_diagram_block() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_stream(
        &server,
        text_sse(&[
            "## Circuit Diagram\n\n```mer",
            "maid\ngraph LR\n  A --> B\n```\n",
        ]),
    )
    .await;

    cargo_bin_cmd!("volt")
        .env("VOLT_HOME", home.path())
        .env("GEMINI_API_KEY", "test-key")
        .env("GEMINI_BASE_URL", server.uri())
        .args(["exec", "--html", "-p", "Draw it"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<div class=\"message user\"><p>Draw it</p>"))
        .stdout(predicate::str::contains("<h2>Circuit Diagram</h2>"))
        .stdout(predicate::str::contains(
            "<pre class=\"mermaid\">graph LR\n  A --&gt; B\n</pre>",
        ));
}

#[tokio::test]
async fn test_exec_mid_stream_error_fails() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_stream(&server, error_after_text_sse("Partial ")).await;

    cargo_bin_cmd!("volt")
        .env("VOLT_HOME", home.path())
        .env("GEMINI_API_KEY", "test-key")
        .env("GEMINI_BASE_URL", server.uri())
        .args(["exec", "-p", "hi"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Partial"))
        .stderr(predicate::str::contains("response failed"));
}

#[tokio::test]
async fn test_exec_http_error_fails() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(wiremock::ResponseTemplate::new(400).set_body_string(
            r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#,
        ))
        .mount(&server)
        .await;

    cargo_bin_cmd!("volt")
        .env("VOLT_HOME", home.path())
        .env("GEMINI_API_KEY", "test-key")
        .env("GEMINI_BASE_URL", server.uri())
        .args(["exec", "-p", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 400: API key not valid"));
}

#[test]
fn test_missing_api_key_is_fatal() {
    let home = TempDir::new().unwrap();

    cargo_bin_cmd!("volt")
        .env("VOLT_HOME", home.path())
        .env_remove("GEMINI_API_KEY")
        .args(["exec", "-p", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}
