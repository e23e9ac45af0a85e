//! Runs the `get-graphql-schema` binary against saved introspection results
//! and config files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const INTROSPECTION: &str = r#"{
  "data": {
    "__schema": {
      "queryType": { "name": "Query" },
      "mutationType": null,
      "subscriptionType": null,
      "types": [
        {
          "kind": "OBJECT",
          "name": "Query",
          "description": null,
          "fields": [
            {
              "name": "hello",
              "description": null,
              "args": [],
              "type": { "kind": "SCALAR", "name": "String", "ofType": null },
              "isDeprecated": false,
              "deprecationReason": null
            }
          ],
          "inputFields": null,
          "interfaces": [],
          "enumValues": null,
          "possibleTypes": null
        },
        {
          "kind": "SCALAR",
          "name": "String",
          "description": null,
          "fields": null,
          "inputFields": null,
          "interfaces": null,
          "enumValues": null,
          "possibleTypes": null
        }
      ],
      "directives": []
    }
  }
}"#;

fn write_schema(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("introspection.json");
    fs::write(&path, INTROSPECTION).unwrap();
    path
}

fn command(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("get-graphql-schema").unwrap();
    cmd.current_dir(dir).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn prints_sdl_from_saved_introspection() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_schema(temp_dir.path());

    command(temp_dir.path())
        .arg("--from-file")
        .arg(&schema)
        .assert()
        .success()
        .stdout("type Query {\n  hello: String\n}\n");
}

#[test]
fn prints_json_data_object() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_schema(temp_dir.path());

    command(temp_dir.path())
        .arg("--from-file")
        .arg(&schema)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\n  \"__schema\": {\n    \"queryType\""))
        .stdout(predicate::str::ends_with("}\n"));
}

#[test]
fn writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_schema(temp_dir.path());
    let output = temp_dir.path().join("schema.graphql");

    command(temp_dir.path())
        .arg("--from-file")
        .arg(&schema)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema written to"));

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "type Query {\n  hello: String\n}\n"
    );
}

#[test]
fn quiet_output_file_prints_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let schema = write_schema(temp_dir.path());

    command(temp_dir.path())
        .arg("--from-file")
        .arg(&schema)
        .args(["-o", "schema.graphql", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn reads_schema_path_from_config() {
    let temp_dir = TempDir::new().unwrap();
    write_schema(temp_dir.path());
    fs::write(
        temp_dir.path().join(".graphqlrc.yml"),
        "schema: introspection.json\n",
    )
    .unwrap();

    command(temp_dir.path())
        .assert()
        .success()
        .stdout("type Query {\n  hello: String\n}\n");
}

#[test]
fn no_source_prints_usage() {
    let temp_dir = TempDir::new().unwrap();

    command(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ENDPOINT_URL"));
}

#[test]
fn invalid_config_exits_with_config_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".graphqlrc.yml"), "schema: \"\"\n").unwrap();

    command(temp_dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("empty schema path"));
}

#[test]
fn malformed_introspection_exits_with_schema_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, r#"{ "data": {} }"#).unwrap();

    command(temp_dir.path())
        .arg("--from-file")
        .arg(&path)
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("data.__schema"));
}

#[test]
fn missing_file_exits_with_io_error() {
    let temp_dir = TempDir::new().unwrap();

    command(temp_dir.path())
        .args(["--from-file", "does-not-exist.json"])
        .assert()
        .code(4);
}

#[test]
fn unreachable_endpoint_exits_with_schema_error() {
    let temp_dir = TempDir::new().unwrap();

    command(temp_dir.path())
        .args(["http://127.0.0.1:1/graphql", "--timeout", "2"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to fetch schema"));
}
