#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

#[allow(dead_code)]
pub const PASSWORD_RANGE: &str =
    include_str!("../../../hibp-guard-core/tests/fixtures/range-5BAA6.txt");
#[allow(dead_code)]
pub const RANDOM_RANGE: &str =
    include_str!("../../../hibp-guard-core/tests/fixtures/range-random.txt");

fn config_dir() -> &'static Path {
    static CONFIG_DIR: OnceLock<TempDir> = OnceLock::new();
    CONFIG_DIR
        .get_or_init(|| tempfile::tempdir().expect("failed to create config dir for tests"))
        .path()
}

/// `hibp-guard` with a config path that does not exist, so the user's own
/// config and environment never leak into a test.
pub fn guard_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hibp-guard"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("HIBP_GUARD_CONFIG", config_dir().join("absent.toml"));
    cmd.env_remove("HIBP_GUARD_ENDPOINT");
    cmd.env_remove("HIBP_GUARD_TIMEOUT_SECS");
    cmd
}

#[allow(dead_code)]
pub fn endpoint(server: &MockServer) -> String {
    format!("{}/range/", server.uri())
}

#[allow(dead_code)]
pub async fn serve_range(server: &MockServer, prefix: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/range/{prefix}")))
        .and(header("Add-Padding", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}
