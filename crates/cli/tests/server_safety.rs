mod common;

use common::crag;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn serve_http_refuses_non_loopback_without_public() {
    let temp = TempDir::new().unwrap();
    crag(temp.path())
        .args(["serve-http", "--bind", "0.0.0.0:0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Refusing to bind"));
}

#[test]
fn serve_http_public_requires_auth_token() {
    let temp = TempDir::new().unwrap();
    crag(temp.path())
        .args(["serve-http", "--public", "--bind", "0.0.0.0:0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--public requires an auth token"));
}
