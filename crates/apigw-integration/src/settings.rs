//! Integration settings shared by every per-operation transform.
//!
//! Settings are built once (programmatically or via [`crate::config`]) and then only borrowed
//! immutably by [`crate::transform::OperationTransform`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{IntegrationError, Result};
use crate::model::{Parameter, Response};

/// The three CORS response headers the gateway can inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorsControl {
    AllowOrigin,
    AllowMethods,
    AllowHeaders,
}

impl CorsControl {
    /// Canonical emission order, used for both regular and preflight operations.
    pub const ORDER: [CorsControl; 3] = [
        CorsControl::AllowOrigin,
        CorsControl::AllowMethods,
        CorsControl::AllowHeaders,
    ];

    #[must_use]
    pub fn header_name(self) -> &'static str {
        match self {
            CorsControl::AllowOrigin => "Access-Control-Allow-Origin",
            CorsControl::AllowMethods => "Access-Control-Allow-Methods",
            CorsControl::AllowHeaders => "Access-Control-Allow-Headers",
        }
    }
}

/// CORS policy. A control is enabled iff it carries a literal value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControl {
    #[serde(default)]
    pub allow_origin: Option<String>,
    #[serde(default)]
    pub allow_methods: Option<String>,
    #[serde(default)]
    pub allow_headers: Option<String>,
}

impl AccessControl {
    /// Enable `Access-Control-Allow-Origin` with a literal value (e.g. `*`).
    pub fn allow_origin(&mut self, value: impl Into<String>) -> &mut Self {
        self.allow_origin = Some(value.into());
        self
    }

    /// Enable `Access-Control-Allow-Methods` with a literal value (e.g. `GET,POST,OPTIONS`).
    pub fn allow_methods(&mut self, value: impl Into<String>) -> &mut Self {
        self.allow_methods = Some(value.into());
        self
    }

    /// Enable `Access-Control-Allow-Headers` with a literal value
    /// (e.g. `Content-Type,X-Amz-Date,Authorization,X-Api-Key`).
    pub fn allow_headers(&mut self, value: impl Into<String>) -> &mut Self {
        self.allow_headers = Some(value.into());
        self
    }

    pub fn disable(&mut self, control: CorsControl) -> &mut Self {
        *self.slot_mut(control) = None;
        self
    }

    #[must_use]
    pub fn value(&self, control: CorsControl) -> Option<&str> {
        match control {
            CorsControl::AllowOrigin => self.allow_origin.as_deref(),
            CorsControl::AllowMethods => self.allow_methods.as_deref(),
            CorsControl::AllowHeaders => self.allow_headers.as_deref(),
        }
    }

    fn slot_mut(&mut self, control: CorsControl) -> &mut Option<String> {
        match control {
            CorsControl::AllowOrigin => &mut self.allow_origin,
            CorsControl::AllowMethods => &mut self.allow_methods,
            CorsControl::AllowHeaders => &mut self.allow_headers,
        }
    }

    /// Enabled controls with their values, in [`CorsControl::ORDER`].
    pub fn enabled(&self) -> impl Iterator<Item = (CorsControl, &str)> {
        CorsControl::ORDER
            .into_iter()
            .filter_map(|c| self.value(c).map(|v| (c, v)))
    }

    /// Header names of the enabled controls, in [`CorsControl::ORDER`].
    pub fn enabled_headers(&self) -> impl Iterator<Item = &'static str> {
        self.enabled().map(|(c, _)| c.header_name())
    }

    /// Gateway response-parameter mapping:
    /// `method.response.header.<Header>` -> `'<value>'`.
    #[must_use]
    pub fn response_parameters(&self) -> IndexMap<String, String> {
        self.enabled()
            .map(|(c, v)| {
                (
                    format!("method.response.header.{}", c.header_name()),
                    format!("'{v}'"),
                )
            })
            .collect()
    }
}

/// Settings applied to every operation of a document.
#[derive(Debug, Clone)]
pub struct IntegrationSettings {
    backend_base_url: Url,
    extra_responses: IndexMap<String, Response>,
    global_parameters: Vec<Parameter>,
    access_control: AccessControl,
    synthesize_preflight: bool,
}

impl IntegrationSettings {
    /// Empty settings proxying to `backend_base_url`.
    ///
    /// Preflight synthesis is enabled by default.
    #[must_use]
    pub fn new(backend_base_url: Url) -> Self {
        Self {
            backend_base_url,
            extra_responses: IndexMap::new(),
            global_parameters: Vec::new(),
            access_control: AccessControl::default(),
            synthesize_preflight: true,
        }
    }

    /// Register a response added to every operation that does not declare `code` itself.
    ///
    /// A `None` response registers an empty [`Response`]. Registering a code twice keeps the
    /// first registration.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::InvalidArgument`] if `code` is empty or whitespace.
    pub fn insert_response_if_absent(
        &mut self,
        code: &str,
        response: Option<Response>,
    ) -> Result<&mut Self> {
        if code.trim().is_empty() {
            return Err(IntegrationError::InvalidArgument(
                "response code can not be empty".to_string(),
            ));
        }

        if self.extra_responses.contains_key(code) {
            tracing::debug!(code, "extra response already registered; keeping the first");
        } else {
            self.extra_responses
                .insert(code.to_string(), response.unwrap_or_default());
        }
        Ok(self)
    }

    /// Append a parameter added to every operation. No de-duplication.
    pub fn append_global_parameter(&mut self, parameter: Parameter) -> &mut Self {
        self.global_parameters.push(parameter);
        self
    }

    /// The CORS policy, for further configuration.
    pub fn access_control_mut(&mut self) -> &mut AccessControl {
        &mut self.access_control
    }

    pub fn set_synthesize_preflight(&mut self, enabled: bool) -> &mut Self {
        self.synthesize_preflight = enabled;
        self
    }

    #[must_use]
    pub fn access_control(&self) -> &AccessControl {
        &self.access_control
    }

    #[must_use]
    pub fn extra_responses(&self) -> &IndexMap<String, Response> {
        &self.extra_responses
    }

    #[must_use]
    pub fn global_parameters(&self) -> &[Parameter] {
        &self.global_parameters
    }

    #[must_use]
    pub fn backend_base_url(&self) -> &Url {
        &self.backend_base_url
    }

    #[must_use]
    pub fn synthesize_preflight(&self) -> bool {
        self.synthesize_preflight
    }

    /// Backend URL for a relative operation path:
    /// `{base without trailing '/'}/{path without leading '/' and query string}`.
    #[must_use]
    pub fn backend_uri(&self, path: &str) -> String {
        let base = self.backend_base_url.as_str().trim_end_matches('/');
        let path = path.split_once('?').map_or(path, |(p, _)| p);
        format!("{base}/{}", path.trim_start_matches('/'))
    }
}
