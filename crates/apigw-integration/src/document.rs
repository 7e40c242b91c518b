//! Document-level driver: parse, transform every operation, render.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::{IntegrationError, Result};
use crate::model::{Document, HttpMethod, Operation, Response, SWAGGER_VERSION};
use crate::settings::IntegrationSettings;
use crate::transform::OperationTransform;

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml` / `.yml` -> YAML, anything else -> JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// What [`apply_to_document`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformSummary {
    pub http_operations: usize,
    pub preflight_operations: usize,
    pub synthesized_preflights: usize,
}

/// Parse a Swagger 2.0 document (JSON, falling back to YAML).
///
/// # Errors
///
/// Returns an error if the text is neither JSON nor YAML, if it is not a Swagger 2.0 document,
/// or if it does not match the document model.
pub fn parse_document(text: &str, location: &str) -> Result<Document> {
    let mut value: Value = serde_json::from_str(text)
        .or_else(|_| serde_yaml::from_str(text))
        .map_err(|source| IntegrationError::Parse {
            location: location.to_string(),
            source,
        })?;

    // YAML reads an unquoted `swagger: 2.0` as a number.
    let version = match value.get("swagger") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => value
            .get("openapi")
            .and_then(Value::as_str)
            .map_or_else(|| "<missing>".to_string(), str::to_string),
    };
    if version != SWAGGER_VERSION {
        return Err(IntegrationError::UnsupportedVersion(version));
    }
    value["swagger"] = Value::String(version);

    Ok(serde_json::from_value(value)?)
}

/// Read and parse a document from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_document(path: &Path) -> Result<Document> {
    let text = std::fs::read_to_string(path).map_err(|source| IntegrationError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    parse_document(&text, &path.display().to_string())
}

/// Render a document as pretty JSON or YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_document(doc: &Document, format: DocumentFormat) -> Result<String> {
    Ok(match format {
        DocumentFormat::Json => {
            let mut out = serde_json::to_string_pretty(doc)?;
            out.push('\n');
            out
        }
        DocumentFormat::Yaml => serde_yaml::to_string(doc)?,
    })
}

/// OPTIONS operation inserted for paths that do not declare one.
#[must_use]
pub fn preflight_stub() -> Operation {
    let mut operation = Operation::default();
    operation
        .responses
        .insert("200".to_string(), Response::new("200"));
    operation
}

/// Run [`OperationTransform`] over every operation of `doc`.
///
/// Paths are visited in document order and verbs in [`HttpMethod::ALL`] order. When preflight
/// synthesis is enabled, every path with at least one operation but no `options` operation gets
/// [`preflight_stub`] first. Operation parameters referencing `#/parameters/<name>` are resolved
/// against the document's top-level `parameters`.
///
/// # Errors
///
/// Returns [`IntegrationError::Operation`] for the first operation that fails. Operations
/// visited before it stay transformed.
pub fn apply_to_document(
    doc: &mut Document,
    settings: &IntegrationSettings,
) -> Result<TransformSummary> {
    let transform = OperationTransform::new(settings).with_shared_parameters(&doc.parameters);
    let mut summary = TransformSummary::default();

    for (path, item) in &mut doc.paths {
        if item.has_no_operations() {
            tracing::debug!(path = %path, "path item has no operations; skipping");
            continue;
        }

        if settings.synthesize_preflight() && item.options.is_none() {
            item.options = Some(preflight_stub());
            summary.synthesized_preflights += 1;
        }

        for (method, operation) in item.operations_mut() {
            transform
                .apply(method, path, operation)
                .map_err(|e| IntegrationError::Operation {
                    method: method.to_string(),
                    path: path.clone(),
                    source: Box::new(e),
                })?;
            if method == HttpMethod::Options {
                summary.preflight_operations += 1;
            } else {
                summary.http_operations += 1;
            }
        }
    }

    tracing::info!(
        http_operations = summary.http_operations,
        preflight_operations = summary.preflight_operations,
        synthesized_preflights = summary.synthesized_preflights,
        "applied API Gateway integrations"
    );
    Ok(summary)
}
