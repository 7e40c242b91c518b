use anyhow::Context as _;
use serde_json::{Value, json};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;
use unrelated_apigw_test_support::{
    INTEGRATION_CONFIG_YAML, PETSTORE_SWAGGER_JSON, write_fixture,
};

const INTEGRATION: &str = "x-amazon-apigateway-integration";

fn run_cli(home: &Path, args: &[&str]) -> anyhow::Result<Output> {
    let bin = env!("CARGO_BIN_EXE_unrelated-apigw-swagger");
    let mut cmd = Command::new(bin);
    cmd.args(args)
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("APIGW_") {
            cmd.env_remove(key);
        }
    }
    cmd.output().context("spawn unrelated-apigw-swagger")
}

#[test]
fn enriches_json_document_to_stdout() -> anyhow::Result<()> {
    let dir = tempdir().context("create temp dir")?;
    let input = write_fixture(dir.path(), "petstore.json", PETSTORE_SWAGGER_JSON)?;
    let config = write_fixture(dir.path(), "integration.yaml", INTEGRATION_CONFIG_YAML)?;

    let out = run_cli(
        dir.path(),
        &[
            "--input",
            input.to_str().context("utf-8 path")?,
            "--config",
            config.to_str().context("utf-8 path")?,
        ],
    )?;
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let doc: Value = serde_json::from_slice(&out.stdout).context("stdout is JSON")?;

    let list = &doc["paths"]["/pets"]["get"];
    assert_eq!(list[INTEGRATION]["type"], "http");
    assert_eq!(list[INTEGRATION]["httpMethod"], "GET");
    assert_eq!(
        list[INTEGRATION]["uri"],
        "https://backend.example.com/app/pets"
    );
    assert_eq!(
        list[INTEGRATION]["requestParameters"],
        json!({
            "integration.request.querystring.limit": "method.request.querystring.limit",
            "integration.request.header.X-Trace-Id": "method.request.header.X-Trace-Id",
            "integration.request.header.Authorization": "method.request.header.Authorization"
        })
    );
    let codes: Vec<&String> = list["responses"]
        .as_object()
        .context("responses object")?
        .keys()
        .collect();
    assert_eq!(codes.len(), 3);
    assert!(codes.iter().any(|c| *c == "500"));
    assert!(codes.iter().any(|c| *c == "401"));
    assert_eq!(
        list["responses"]["200"]["headers"]["Access-Control-Allow-Origin"],
        json!({ "type": "string" })
    );

    let synthesized = &doc["paths"]["/pets"]["options"];
    assert_eq!(synthesized[INTEGRATION]["type"], "mock");
    assert_eq!(
        synthesized[INTEGRATION]["responses"]["default"]["responseParameters"]
            ["method.response.header.Access-Control-Allow-Origin"],
        "'*'"
    );
    assert_eq!(synthesized["consumes"], json!(["application/json", "text/json"]));

    let declared = &doc["paths"]["/pets/{petId}"]["options"];
    assert!(declared.get("operationId").is_none());

    assert_eq!(doc["info"]["title"], "Petstore");
    Ok(())
}

#[test]
fn writes_yaml_output_file_with_base_url_override() -> anyhow::Result<()> {
    let dir = tempdir().context("create temp dir")?;
    let input = write_fixture(dir.path(), "petstore.json", PETSTORE_SWAGGER_JSON)?;
    let config = write_fixture(dir.path(), "integration.yaml", INTEGRATION_CONFIG_YAML)?;
    let output = dir.path().join("out.yaml");

    let out = run_cli(
        dir.path(),
        &[
            "-i",
            input.to_str().context("utf-8 path")?,
            "-c",
            config.to_str().context("utf-8 path")?,
            "-o",
            output.to_str().context("utf-8 path")?,
            "--backend-base-url",
            "http://10.0.0.5:8080",
            "--no-preflight",
        ],
    )?;
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(out.stdout.is_empty());

    let text = std::fs::read_to_string(&output).context("read output")?;
    let doc: Value = serde_yaml::from_str(&text).context("output is YAML")?;
    assert_eq!(
        doc["paths"]["/pets/{petId}"]["get"][INTEGRATION]["uri"],
        "http://10.0.0.5:8080/pets/{petId}"
    );
    assert!(doc["paths"]["/pets"].get("options").is_none());
    Ok(())
}

#[test]
fn fails_without_backend_base_url() -> anyhow::Result<()> {
    let dir = tempdir().context("create temp dir")?;
    let input = write_fixture(dir.path(), "petstore.json", PETSTORE_SWAGGER_JSON)?;

    let out = run_cli(dir.path(), &["--input", input.to_str().context("utf-8 path")?])?;
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("backend base URL"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn rejects_openapi_3_documents() -> anyhow::Result<()> {
    let dir = tempdir().context("create temp dir")?;
    let input = write_fixture(
        dir.path(),
        "v3.json",
        r#"{ "openapi": "3.0.3", "info": { "title": "t", "version": "1" }, "paths": {} }"#,
    )?;

    let out = run_cli(
        dir.path(),
        &[
            "--input",
            input.to_str().context("utf-8 path")?,
            "--backend-base-url",
            "https://backend.example.com",
        ],
    )?;
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("3.0.3"), "stderr: {stderr}");
    Ok(())
}
