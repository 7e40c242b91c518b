//! Per-operation gateway integration transform.
//!
//! Regular operations get the configured extra responses and global parameters, CORS response
//! headers, and an `http` integration proxying to the backend. `OPTIONS` operations become a
//! `mock` CORS preflight answered by the gateway.

use indexmap::IndexMap;

use crate::error::{IntegrationError, Result};
use crate::integration::{
    DEFAULT_RESPONSE, GatewayIntegration, HttpIntegration, INTEGRATION_EXTENSION,
    IntegrationResponse, MockIntegration, PassthroughBehavior,
};
use crate::model::{
    Header, HttpMethod, Operation, OperationParameter, Parameter, ParameterLocation,
};
use crate::settings::IntegrationSettings;

const PREFLIGHT_CONSUMES: [&str; 2] = ["application/json", "text/json"];
const PREFLIGHT_TEMPLATE_TYPE: &str = "application/json";
const PREFLIGHT_TEMPLATE: &str = "{\"statusCode\": 200}";

pub struct OperationTransform<'a> {
    settings: &'a IntegrationSettings,
    shared_parameters: Option<&'a IndexMap<String, Parameter>>,
}

impl<'a> OperationTransform<'a> {
    #[must_use]
    pub fn new(settings: &'a IntegrationSettings) -> Self {
        Self {
            settings,
            shared_parameters: None,
        }
    }

    /// Resolve `#/parameters/<name>` references against the document's shared definitions.
    #[must_use]
    pub fn with_shared_parameters(mut self, shared: &'a IndexMap<String, Parameter>) -> Self {
        self.shared_parameters = Some(shared);
        self
    }

    /// Enrich `operation` (the `method` operation on `path`) in place.
    ///
    /// Must run once per operation: regular operations accumulate global parameters on every
    /// call, and preflight operations reject CORS headers they already carry.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::DuplicateHeader`] if a preflight response already declares an
    /// enabled CORS header. The operation is left untouched in that case.
    pub fn apply(&self, method: HttpMethod, path: &str, operation: &mut Operation) -> Result<()> {
        if method == HttpMethod::Options {
            return self.apply_preflight(operation);
        }

        tracing::debug!(%method, path, "applying http integration");

        for (code, response) in self.settings.extra_responses() {
            if !operation.responses.contains_key(code) {
                operation.responses.insert(code.clone(), response.clone());
            }
        }

        operation
            .parameters
            .get_or_insert_with(Vec::new)
            .extend(
                self.settings
                    .global_parameters()
                    .iter()
                    .cloned()
                    .map(OperationParameter::Inline),
            );

        let access_control = self.settings.access_control();
        for (code, response) in &mut operation.responses {
            response.description.clone_from(code);
            let headers = response.headers_mut();
            for name in access_control.enabled_headers() {
                if !headers.contains_key(name) {
                    headers.insert(name.to_string(), Header::string());
                }
            }
        }

        let no_shared = IndexMap::new();
        let integration = GatewayIntegration::Http(HttpIntegration {
            http_method: method.as_upper().to_string(),
            uri: self.settings.backend_uri(path),
            responses: self.integration_responses(operation),
            request_parameters: request_parameters(
                operation.parameters.as_deref().unwrap_or_default(),
                self.shared_parameters.unwrap_or(&no_shared),
            ),
        });
        operation
            .extensions
            .insert(INTEGRATION_EXTENSION.to_string(), integration.to_value()?);
        Ok(())
    }

    fn apply_preflight(&self, operation: &mut Operation) -> Result<()> {
        tracing::debug!(
            operation_id = operation.operation_id.as_deref(),
            "applying mock preflight integration"
        );

        let access_control = self.settings.access_control();
        for (code, response) in &operation.responses {
            if let Some(name) = access_control
                .enabled_headers()
                .find(|name| response.has_header(name))
            {
                return Err(IntegrationError::DuplicateHeader {
                    code: code.clone(),
                    header: name.to_string(),
                });
            }
        }

        for response in operation.responses.values_mut() {
            let headers = response.headers_mut();
            for name in access_control.enabled_headers() {
                headers.insert(name.to_string(), Header::string());
            }
        }

        operation
            .consumes
            .extend(PREFLIGHT_CONSUMES.iter().map(ToString::to_string));
        operation.operation_id = None;

        let mut request_templates = IndexMap::new();
        request_templates.insert(
            PREFLIGHT_TEMPLATE_TYPE.to_string(),
            PREFLIGHT_TEMPLATE.to_string(),
        );

        let mut responses = IndexMap::new();
        responses.insert(
            DEFAULT_RESPONSE.to_string(),
            IntegrationResponse::new("200", access_control.response_parameters()),
        );

        let integration = GatewayIntegration::Mock(MockIntegration {
            responses,
            passthrough_behavior: PassthroughBehavior::WhenNoMatch,
            request_templates,
        });
        operation
            .extensions
            .insert(INTEGRATION_EXTENSION.to_string(), integration.to_value()?);
        Ok(())
    }

    /// One entry per declared response code, plus `default` mapped to `200`.
    ///
    /// A `default` response declared by the operation is still mapped to `200`.
    fn integration_responses(&self, operation: &Operation) -> IndexMap<String, IntegrationResponse> {
        let response_parameters = self.settings.access_control().response_parameters();
        let mut responses: IndexMap<String, IntegrationResponse> = operation
            .responses
            .keys()
            .map(|code| {
                (
                    code.clone(),
                    IntegrationResponse::new(code.clone(), response_parameters.clone()),
                )
            })
            .collect();
        responses.insert(
            DEFAULT_RESPONSE.to_string(),
            IntegrationResponse::new("200", response_parameters),
        );
        responses
    }
}

/// Map query and header parameters from the method request onto the integration request.
///
/// `path`, `body` and `formData` parameters are not mapped. References are looked up in
/// `shared`; those that do not resolve are skipped.
#[must_use]
pub fn request_parameters(
    parameters: &[OperationParameter],
    shared: &IndexMap<String, Parameter>,
) -> IndexMap<String, String> {
    parameters
        .iter()
        .filter_map(|entry| {
            let Some(p) = entry.resolve(shared) else {
                tracing::debug!(?entry, "unresolved parameter reference; not mapped");
                return None;
            };
            let kind = match p.location {
                ParameterLocation::Query => "querystring",
                ParameterLocation::Header => "header",
                ParameterLocation::Path | ParameterLocation::Body | ParameterLocation::FormData => {
                    return None;
                }
            };
            Some((
                format!("integration.request.{kind}.{}", p.name),
                format!("method.request.{kind}.{}", p.name),
            ))
        })
        .collect()
}
