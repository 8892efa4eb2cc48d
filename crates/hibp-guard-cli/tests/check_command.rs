#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used)]

use predicates::prelude::*;
use serde_json::Value;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{PASSWORD_RANGE, RANDOM_RANGE, endpoint, guard_cmd, serve_range};

#[tokio::test]
async fn breached_password_exits_with_breached_code() {
    let server = MockServer::start().await;
    serve_range(&server, "5BAA6", PASSWORD_RANGE).await;

    guard_cmd()
        .args(["check", "password", "--endpoint", &endpoint(&server)])
        .assert()
        .code(10)
        .stdout(predicate::str::starts_with("FAIL 5BAA6"))
        .stdout(predicate::str::contains(
            "The password has appeared in a data leak at least 1 times",
        ))
        .stderr(predicate::str::is_empty());
}

#[tokio::test]
async fn minimum_above_count_passes() {
    let server = MockServer::start().await;
    serve_range(&server, "5BAA6", PASSWORD_RANGE).await;

    guard_cmd()
        .args(["check", "password", "--min", "4000000"])
        .args(["--endpoint", &endpoint(&server)])
        .assert()
        .success()
        .stdout("PASS 5BAA6\n");
}

#[tokio::test]
async fn service_error_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex("^/range/[0-9A-F]{5}$"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    guard_cmd()
        .args(["-q", "check", "password", "--endpoint", &endpoint(&server)])
        .assert()
        .success()
        .stdout("PASS 5BAA6\n");
}

#[tokio::test]
async fn extra_rule_parameter_is_a_usage_error() {
    let server = MockServer::start().await;

    guard_cmd()
        .args(["check", "password", "--rule", "hibp:min=1,max=1"])
        .args(["--endpoint", &endpoint(&server)])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            r#"only accepts one argument ("min"), more were provided"#,
        ));
}

#[tokio::test]
async fn unknown_rule_parameter_is_a_usage_error() {
    let server = MockServer::start().await;

    guard_cmd()
        .args(["check", "password", "--rule", "hibp:foo=1"])
        .args(["--endpoint", &endpoint(&server)])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("something different provided: foo=1"));
}

#[tokio::test]
async fn stdin_batch_shares_one_range_fetch() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/range/5BAA6"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PASSWORD_RANGE))
        .expect(1)
        .mount(&server)
        .await;
    serve_range(&server, "CECB7", RANDOM_RANGE).await;

    let input = "password\npassword\njJv1zT7c]}L>G?R7=f^WFoA5M+-cVJeU:C._MEWCLpjs6y5o6uRfk39e-qAd\n";
    let output = guard_cmd()
        .args(["check", "--stdin", "--format", "json", "--attribute", "secret"])
        .args(["--endpoint", &endpoint(&server)])
        .write_stdin(input)
        .assert()
        .code(10)
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output)?;
    assert!(!stdout.contains("password"), "credential must not be echoed");
    assert!(!stdout.contains("jJv1zT7c"), "credential must not be echoed");

    let reports: Vec<Value> = stdout
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0]["safe"], Value::Bool(false));
    assert_eq!(reports[1]["safe"], Value::Bool(false));
    assert_eq!(reports[2]["safe"], Value::Bool(true));
    assert_eq!(reports[2]["prefix"], "CECB7");
    assert!(reports[2].get("message").is_none());
    Ok(())
}

#[test]
fn invalid_endpoint_is_a_usage_error() {
    guard_cmd()
        .args(["check", "password", "--endpoint", "not a url"])
        .assert()
        .code(2);
}

#[test]
fn rules_lists_the_short_name() {
    guard_cmd().arg("rules").assert().success().stdout("hibp\n");
}
