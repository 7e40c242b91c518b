use anyhow::Context as _;
use std::path::{Path, PathBuf};

/// A small Swagger 2.0 document covering every parameter location.
///
/// - `/pets` has no `options` operation (a preflight gets synthesized).
/// - `/pets/{petId}` declares its own `options` operation.
/// - `/legacy` is a bare `$ref` path item without operations.
/// - `GET /pets` references the shared `traceId` header parameter.
pub const PETSTORE_SWAGGER_JSON: &str = r##"{
  "swagger": "2.0",
  "info": { "title": "Petstore", "version": "1.0.0" },
  "host": "petstore.internal",
  "basePath": "/v1",
  "paths": {
    "/pets": {
      "get": {
        "tags": ["pets"],
        "operationId": "listPets",
        "produces": ["application/json"],
        "parameters": [
          { "name": "limit", "in": "query", "type": "integer", "format": "int32" },
          { "$ref": "#/parameters/traceId" }
        ],
        "responses": {
          "200": { "description": "A list of pets", "schema": { "type": "array", "items": { "$ref": "#/definitions/Pet" } } }
        }
      },
      "post": {
        "operationId": "createPet",
        "consumes": ["application/json"],
        "parameters": [
          { "name": "pet", "in": "body", "required": true, "schema": { "$ref": "#/definitions/Pet" } }
        ],
        "responses": {
          "201": { "description": "Created" },
          "500": { "description": "Backend exploded" }
        }
      }
    },
    "/pets/{petId}": {
      "parameters": [
        { "name": "petId", "in": "path", "required": true, "type": "string" }
      ],
      "get": {
        "operationId": "showPetById",
        "parameters": [
          { "name": "X-Request-Id", "in": "header", "type": "string" }
        ],
        "responses": {
          "200": { "description": "The pet", "schema": { "$ref": "#/definitions/Pet" } }
        },
        "x-owner": "team-pets"
      },
      "options": {
        "operationId": "petOptions",
        "responses": {
          "200": { "description": "CORS" }
        }
      }
    },
    "/legacy": {
      "$ref": "#/x-legacy-paths/legacy"
    }
  },
  "parameters": {
    "traceId": { "name": "X-Trace-Id", "in": "header", "type": "string" }
  },
  "definitions": {
    "Pet": {
      "type": "object",
      "required": ["id", "name"],
      "properties": {
        "id": { "type": "integer", "format": "int64" },
        "name": { "type": "string" }
      }
    }
  }
}
"##;

/// The same document shape in YAML, with an unquoted version and unquoted status codes.
pub const PETSTORE_SWAGGER_YAML: &str = r"swagger: 2.0
info:
  title: Petstore
  version: 1.0.0
paths:
  /pets:
    get:
      operationId: listPets
      parameters:
        - name: limit
          in: query
          type: integer
      responses:
        200:
          description: A list of pets
";

/// Integration configuration enabling all three CORS controls.
pub const INTEGRATION_CONFIG_YAML: &str = r#"backendBaseUrl: https://backend.example.com/app/
extraResponses:
  "500":
    description: Internal server error
  "401": null
globalParameters:
  - name: Authorization
    in: header
    type: string
    required: true
  - null
cors:
  allowOrigin: "*"
  allowMethods: "GET,POST,DELETE,OPTIONS"
  allowHeaders: "Content-Type,X-Amz-Date,Authorization,X-Api-Key"
"#;

/// Write `contents` to `dir/name` and return the full path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
