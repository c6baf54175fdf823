#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const SEED: &str = r#"{
  "headlands": [
    {
      "slug": "cape-point",
      "name": "Cape Point",
      "description": "Southern tip of the peninsula",
      "sectors": [
        {
          "slug": "the-slabs",
          "name": "The Slabs",
          "description": "Sunny slabs above the car park",
          "routes": [
            {"slug": "lekker-time", "name": "Lekker Time", "routeNumber": 1, "grade": 19, "stars": 2, "info": "(T)", "tags": ["crimpy"]},
            {"slug": "the-nose", "name": "The Nose", "routeNumber": 2, "grade": "26", "info": "5B&C"}
          ]
        }
      ]
    },
    {
      "slug": "muizenberg",
      "name": "Muizenberg",
      "sectors": [
        {
          "slug": "boyes-drive",
          "name": "Boyes Drive",
          "routes": [
            {"slug": "slab-happy", "name": "Slab Happy", "routeNumber": 1, "grade": 15, "info": "S"},
            {"slug": "the-nose", "name": "The Other Nose", "grade": 20}
          ]
        }
      ]
    }
  ]
}"#;

/// The crag binary running in `dir` with no ambient configuration.
pub fn crag(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("crag");
    cmd.current_dir(dir)
        .env_remove("CRAG_DATA")
        .env_remove("CRAG_COMMENTS")
        .env_remove("CRAG_CONFIG")
        .env_remove("CRAG_AUTH_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

/// Twenty comments; every fifth one is tagged beta.
pub fn comment_pool() -> Value {
    let comments: Vec<Value> = (0..20)
        .map(|i| {
            let tags: Vec<&str> = if i % 5 == 0 { vec!["beta"] } else { vec![] };
            json!({
                "id": format!("c{i}"),
                "userId": format!("u{i}"),
                "username": format!("climber{i}"),
                "content": format!("Comment number {i}"),
                "createdAt": "2025-02-26T10:00:00Z",
                "tags": tags,
            })
        })
        .collect();
    json!({ "comments": comments })
}

/// Temp dir holding `seed.json` and `data/comments.json`, with the seed
/// imported into `data/catalog.json`.
pub fn imported() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("seed.json"), SEED).unwrap();
    fs::create_dir_all(root.join("data")).unwrap();
    fs::write(
        root.join("data/comments.json"),
        serde_json::to_string(&comment_pool()).unwrap(),
    )
    .unwrap();

    crag(root).args(["import", "seed.json"]).assert().success();
    temp
}

pub fn run_command(dir: &Path, request: &str) -> (bool, Value) {
    let output = crag(dir)
        .args(["command", "--json", request])
        .output()
        .expect("command run");

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    (output.status.success(), body)
}
