use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use url::Url;

use crate::error::{IntegrationError, Result};
use crate::model::{Parameter, Response};
use crate::settings::{AccessControl, IntegrationSettings};

/// File configuration for the integration filter (YAML or JSON).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationConfig {
    /// Backend the gateway proxies to. May be overridden at load time.
    #[serde(default)]
    pub backend_base_url: Option<String>,

    /// Add a mock `OPTIONS` operation to paths that do not declare one.
    #[serde(default = "default_true")]
    pub synthesize_preflight: bool,

    /// Responses added to every operation that does not declare the code itself.
    /// A `null` value registers an empty response.
    #[serde(default)]
    pub extra_responses: IndexMap<String, Option<Response>>,

    /// Parameters appended to every operation. `null` entries are ignored.
    #[serde(default)]
    pub global_parameters: Vec<Option<Parameter>>,

    /// CORS response headers injected by the gateway.
    #[serde(default)]
    pub cors: AccessControl,
}

fn default_true() -> bool {
    true
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            backend_base_url: None,
            synthesize_preflight: true,
            extra_responses: IndexMap::new(),
            global_parameters: Vec::new(),
            cors: AccessControl::default(),
        }
    }
}

impl IntegrationConfig {
    /// Parse a configuration (JSON, falling back to YAML).
    ///
    /// # Errors
    ///
    /// Returns an error if the text is neither JSON nor YAML, or does not match the schema.
    pub fn parse(text: &str, location: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_str(text)
            .or_else(|_| serde_yaml::from_str(text))
            .map_err(|source| IntegrationError::Parse {
                location: location.to_string(),
                source,
            })?;
        // `~` / `null`
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| {
            IntegrationError::Config(format!("invalid configuration '{location}': {e}"))
        })
    }

    /// Build settings, replaying every entry through the [`IntegrationSettings`] API.
    ///
    /// `base_url_override` wins over `backendBaseUrl`.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::Config`] if no usable backend base URL is configured, and
    /// [`IntegrationError::InvalidArgument`] for a blank extra response code.
    pub fn into_settings(self, base_url_override: Option<&str>) -> Result<IntegrationSettings> {
        let raw = base_url_override
            .map(str::to_string)
            .or(self.backend_base_url)
            .ok_or_else(|| IntegrationError::Config("backend base URL is not set".to_string()))?;

        let mut settings = IntegrationSettings::new(parse_backend_base_url(&raw)?);
        settings.set_synthesize_preflight(self.synthesize_preflight);

        for (code, response) in self.extra_responses {
            settings.insert_response_if_absent(&code, response)?;
        }
        for parameter in self.global_parameters.into_iter().flatten() {
            settings.append_global_parameter(parameter);
        }
        *settings.access_control_mut() = self.cors;

        Ok(settings)
    }
}

/// Validate a backend base URL: absolute, `http` or `https`, no query or fragment.
///
/// # Errors
///
/// Returns [`IntegrationError::Config`] if the URL is unusable as a backend base.
pub fn parse_backend_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        IntegrationError::Config(format!("invalid backend base URL '{raw}': {e}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(IntegrationError::Config(format!(
            "backend base URL '{raw}' must use http or https",
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(IntegrationError::Config(format!(
            "backend base URL '{raw}' must not carry a query or fragment",
        )));
    }
    Ok(url)
}

/// Read and parse a configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<IntegrationConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| IntegrationError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    IntegrationConfig::parse(&text, &path.display().to_string())
}
