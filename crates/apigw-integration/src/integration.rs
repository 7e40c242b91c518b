//! `x-amazon-apigateway-integration` descriptors.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Vendor-extension key consumed by the gateway's import tooling.
pub const INTEGRATION_EXTENSION: &str = "x-amazon-apigateway-integration";

/// Key of the catch-all integration response.
pub const DEFAULT_RESPONSE: &str = "default";

/// The integration attached to one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GatewayIntegration {
    /// Proxy the request to a backend HTTP endpoint.
    Http(HttpIntegration),
    /// Answer from the gateway itself (CORS preflight).
    Mock(MockIntegration),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpIntegration {
    pub http_method: String,
    pub uri: String,
    pub responses: IndexMap<String, IntegrationResponse>,
    pub request_parameters: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockIntegration {
    pub responses: IndexMap<String, IntegrationResponse>,
    pub passthrough_behavior: PassthroughBehavior,
    pub request_templates: IndexMap<String, String>,
}

/// Maps a backend status onto a method response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationResponse {
    pub status_code: String,
    pub response_parameters: IndexMap<String, String>,
}

impl IntegrationResponse {
    pub fn new(status_code: impl Into<String>, response_parameters: IndexMap<String, String>) -> Self {
        Self {
            status_code: status_code.into(),
            response_parameters,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassthroughBehavior {
    WhenNoMatch,
}

impl GatewayIntegration {
    /// Serialize into the JSON value stored under [`INTEGRATION_EXTENSION`].
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_integration_wire_shape() {
        let mut templates = IndexMap::new();
        templates.insert(
            "application/json".to_string(),
            "{\"statusCode\": 200}".to_string(),
        );
        let mut responses = IndexMap::new();
        responses.insert(
            DEFAULT_RESPONSE.to_string(),
            IntegrationResponse::new("200", IndexMap::new()),
        );

        let value = GatewayIntegration::Mock(MockIntegration {
            responses,
            passthrough_behavior: PassthroughBehavior::WhenNoMatch,
            request_templates: templates,
        })
        .to_value()
        .unwrap();

        assert_eq!(
            value,
            json!({
                "type": "mock",
                "responses": {
                    "default": { "statusCode": "200", "responseParameters": {} }
                },
                "passthroughBehavior": "when_no_match",
                "requestTemplates": { "application/json": "{\"statusCode\": 200}" }
            })
        );
    }

    #[test]
    fn test_http_integration_deserializes_back() {
        let value = json!({
            "type": "http",
            "httpMethod": "GET",
            "uri": "https://example.com/pets",
            "responses": {},
            "requestParameters": {
                "integration.request.querystring.limit": "method.request.querystring.limit"
            }
        });
        let parsed: GatewayIntegration = serde_json::from_value(value).unwrap();
        let GatewayIntegration::Http(http) = parsed else {
            panic!("expected http integration");
        };
        assert_eq!(http.http_method, "GET");
        assert_eq!(http.request_parameters.len(), 1);
    }
}
