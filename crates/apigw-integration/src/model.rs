//! Swagger 2.0 data model.
//!
//! Only the parts the integration filter reads or writes are typed. Everything else is kept in
//! flattened pass-through maps so a document survives a parse/render cycle without losing fields.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The only document version this crate accepts.
pub const SWAGGER_VERSION: &str = "2.0";

/// A Swagger 2.0 document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub swagger: String,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    /// Shared parameter definitions, the targets of `#/parameters/<name>` references.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Parameter>,

    /// `info`, `host`, `basePath`, `definitions`, ... (untouched).
    #[serde(flatten)]
    pub other: IndexMap<String, Value>,
}

/// All operations available on a single path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,

    /// Path-level `parameters`, `$ref` and `x-*` entries.
    #[serde(flatten)]
    pub other: IndexMap<String, Value>,
}

impl PathItem {
    /// Iterate over the declared operations in a fixed verb order.
    pub fn operations_mut(&mut self) -> impl Iterator<Item = (HttpMethod, &mut Operation)> {
        [
            (HttpMethod::Get, &mut self.get),
            (HttpMethod::Put, &mut self.put),
            (HttpMethod::Post, &mut self.post),
            (HttpMethod::Delete, &mut self.delete),
            (HttpMethod::Options, &mut self.options),
            (HttpMethod::Head, &mut self.head),
            (HttpMethod::Patch, &mut self.patch),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_mut().map(|op| (method, op)))
    }

    /// True if the item declares no operation (e.g. a bare `$ref`).
    #[must_use]
    pub fn has_no_operations(&self) -> bool {
        HttpMethod::ALL
            .into_iter()
            .all(|m| self.operation(m).is_none())
    }

    #[must_use]
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
        }
    }
}

/// One HTTP method on one route.
///
/// The verb and relative path are not part of the operation object in Swagger 2.0; callers pass
/// them alongside (they are the keys of the enclosing [`PathItem`] and [`Document::paths`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<OperationParameter>>,

    #[serde(default)]
    pub responses: IndexMap<String, Response>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<Value>>,

    /// Vendor extensions (`x-*`) and any other field not modeled above (e.g. `externalDocs`).
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Body,
    FormData,
}

/// An operation parameter. Identity is `(name, location)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    /// `type`, `required`, `schema`, `description`, ... (untouched by the filter).
    #[serde(flatten)]
    pub attributes: IndexMap<String, Value>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            attributes: IndexMap::new(),
        }
    }

    /// Set one pass-through attribute (e.g. `type`, `required`).
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// An entry of an operation's `parameters` list: inline, or a `$ref` to a shared definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationParameter {
    Reference {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Inline(Parameter),
}

impl OperationParameter {
    /// Resolve against the document's shared `parameters`.
    ///
    /// Only local `#/parameters/<name>` references resolve; anything else yields `None`.
    #[must_use]
    pub fn resolve<'p>(&'p self, shared: &'p IndexMap<String, Parameter>) -> Option<&'p Parameter> {
        match self {
            OperationParameter::Inline(p) => Some(p),
            OperationParameter::Reference { reference } => reference
                .strip_prefix("#/parameters/")
                .and_then(|name| shared.get(name)),
        }
    }
}

impl From<Parameter> for OperationParameter {
    fn from(p: Parameter) -> Self {
        OperationParameter::Inline(p)
    }
}

/// A response declared for one status code (`"200"`, `"default"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, Header>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Value>,

    /// Vendor extensions (`x-*`).
    ///
    /// Always present, so responses satisfy the "headers and extensions exist" invariant once
    /// [`Response::headers_mut`] has run.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Response {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Header map, created empty if the response did not declare one.
    pub fn headers_mut(&mut self) -> &mut IndexMap<String, Header> {
        self.headers.get_or_insert_with(IndexMap::new)
    }

    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.as_ref().is_some_and(|h| h.contains_key(name))
    }
}

/// A response header declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(flatten)]
    pub attributes: IndexMap<String, Value>,
}

impl Header {
    /// `{ "type": "string" }`
    #[must_use]
    pub fn string() -> Self {
        Self {
            kind: "string".to_string(),
            attributes: IndexMap::new(),
        }
    }
}

/// HTTP verbs that can appear as operations in a Swagger 2.0 path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
    ];

    /// Lower-case form, as used for path item keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
        }
    }

    /// Upper-case form, as expected by the gateway's `httpMethod`.
    #[must_use]
    pub fn as_upper(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upper())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_preserves_unknown_fields() {
        let raw = json!({
            "tags": ["pets"],
            "operationId": "listPets",
            "parameters": [
                { "name": "limit", "in": "query", "type": "integer", "format": "int32" }
            ],
            "responses": {
                "200": { "description": "ok", "schema": { "type": "array" } }
            },
            "x-custom": { "a": 1 }
        });

        let op: Operation = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(op.operation_id.as_deref(), Some("listPets"));
        let params = op.parameters.as_ref().unwrap();
        let OperationParameter::Inline(limit) = &params[0] else {
            panic!("expected inline parameter");
        };
        assert_eq!(limit.location, ParameterLocation::Query);
        assert_eq!(limit.attributes.get("format"), Some(&json!("int32")));
        assert_eq!(op.extensions.get("x-custom"), Some(&json!({ "a": 1 })));

        assert_eq!(serde_json::to_value(&op).unwrap(), raw);
    }

    #[test]
    fn test_form_data_location_is_camel_case() {
        let p: Parameter = serde_json::from_value(json!({ "name": "file", "in": "formData" })).unwrap();
        assert_eq!(p.location, ParameterLocation::FormData);
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Patch.as_str(), "patch");
    }

    #[test]
    fn test_reference_parameter_next_to_inline() {
        let op: Operation = serde_json::from_value(json!({
            "parameters": [
                { "$ref": "#/parameters/limit" },
                { "name": "q", "in": "query" }
            ],
            "responses": {}
        }))
        .unwrap();
        let params = op.parameters.as_ref().unwrap();
        assert_eq!(
            params[0],
            OperationParameter::Reference {
                reference: "#/parameters/limit".to_string()
            }
        );
        assert!(matches!(&params[1], OperationParameter::Inline(p) if p.name == "q"));

        let mut shared = IndexMap::new();
        shared.insert(
            "limit".to_string(),
            Parameter::new("limit", ParameterLocation::Query),
        );
        assert_eq!(params[0].resolve(&shared).map(|p| p.name.as_str()), Some("limit"));
        assert_eq!(params[1].resolve(&shared).map(|p| p.name.as_str()), Some("q"));

        let external = OperationParameter::Reference {
            reference: "common.json#/parameters/limit".to_string(),
        };
        assert!(external.resolve(&shared).is_none());

        // References serialize back to the bare `$ref` object.
        assert_eq!(
            serde_json::to_value(&params[0]).unwrap(),
            json!({ "$ref": "#/parameters/limit" })
        );
    }

    #[test]
    fn test_operations_mut_follows_verb_order() {
        let mut item = PathItem {
            post: Some(Operation::default()),
            get: Some(Operation::default()),
            options: Some(Operation::default()),
            ..PathItem::default()
        };
        let methods: Vec<HttpMethod> = item.operations_mut().map(|(m, _)| m).collect();
        assert_eq!(
            methods,
            vec![HttpMethod::Get, HttpMethod::Post, HttpMethod::Options]
        );
    }

    #[test]
    fn test_response_headers_mut_initializes_map() {
        let mut r = Response::new("ok");
        assert!(r.headers.is_none());
        r.headers_mut().insert("X-Test".to_string(), Header::string());
        assert!(r.has_header("X-Test"));
        assert!(!r.has_header("X-Other"));
    }
}
