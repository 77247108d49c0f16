#![deny(missing_docs)]

//! # Document Parsing
//!
//! Maps raw source bytes into the [`Document`] model. JSON and YAML are both
//! accepted through the YAML parser (JSON is a YAML subset).
//!
//! Parsing is two-phase: the text is first read into a raw JSON value, then
//! deserialized into the typed model. The raw value is walked afterwards to
//! collect non-fatal diagnostics about structure the model does not carry
//! (path-level parameters, path item `$ref`s). Structurally unreadable input
//! fails with `SourceParse`; a readable document with problems parses fine
//! and reports them as diagnostics, so merging never requires validity.

use crate::document::{Document, ParamLocation};
use crate::error::{AppError, AppResult};
use crate::validation::Diagnostic;
use serde_json::Value;

/// Parses raw source bytes into a document plus parse-time diagnostics.
pub fn parse_document_bytes(location: &str, bytes: &[u8]) -> AppResult<(Document, Vec<Diagnostic>)> {
    let text = std::str::from_utf8(bytes).map_err(|e| AppError::SourceParse {
        source: location.to_string(),
        reason: format!("not valid UTF-8: {}", e),
    })?;
    parse_document(location, text)
}

/// Parses JSON or YAML text into a document plus parse-time diagnostics.
pub fn parse_document(location: &str, text: &str) -> AppResult<(Document, Vec<Diagnostic>)> {
    let raw: Value = serde_yaml::from_str(text).map_err(|e| AppError::SourceParse {
        source: location.to_string(),
        reason: e.to_string(),
    })?;

    if !raw.is_object() {
        return Err(AppError::SourceParse {
            source: location.to_string(),
            reason: "document root must be an object".to_string(),
        });
    }

    let mut document: Document =
        serde_json::from_value(raw.clone()).map_err(|e| AppError::SourceParse {
            source: location.to_string(),
            reason: e.to_string(),
        })?;

    // Schemas are referenced by their component name until the merge engine
    // rewrites them.
    for (name, schema) in document.components.schemas.iter_mut() {
        schema.reference_id = name.clone();
    }

    let mut diagnostics = Vec::new();
    collect_raw_diagnostics(&raw, &mut diagnostics);
    collect_model_diagnostics(&document, &mut diagnostics);

    Ok((document, diagnostics))
}

/// Flags structure present in the raw value that the model does not carry.
fn collect_raw_diagnostics(raw: &Value, diagnostics: &mut Vec<Diagnostic>) {
    let root = match raw.as_object() {
        Some(obj) => obj,
        None => return,
    };

    if !root.contains_key("openapi") && !root.contains_key("swagger") {
        diagnostics.push(Diagnostic::new("document has no version marker"));
    }
    if !root.contains_key("info") {
        diagnostics.push(Diagnostic::new("document has no info block"));
    }

    let Some(paths) = root.get("paths").and_then(|p| p.as_object()) else {
        return;
    };
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        if item.contains_key("parameters") {
            diagnostics.push(Diagnostic::at(
                format!("paths.{}", path),
                "path-level parameters are not modeled and were dropped from merge decisions",
            ));
        }
        if item.contains_key("$ref") {
            diagnostics.push(Diagnostic::at(
                format!("paths.{}", path),
                "path item $ref is not resolved",
            ));
        }
    }
}

/// Flags gaps in the parsed model itself.
fn collect_model_diagnostics(document: &Document, diagnostics: &mut Vec<Diagnostic>) {
    for (path, method, op) in document.operations() {
        let context = format!("paths.{}.{}", path, method.as_str().to_lowercase());
        if op.operation_id.is_empty() {
            diagnostics.push(Diagnostic::at(&context, "operation has no operationId"));
        }
        for param in &op.parameters {
            if let ParamLocation::Other(other) = &param.location {
                diagnostics.push(Diagnostic::at(
                    format!("{}.parameters.{}", context, param.name),
                    format!("parameter location '{}' is not one of path/query/header/cookie", other),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HttpMethod;
    use pretty_assertions::assert_eq;

    const PETS_YAML: &str = r#"
openapi: 3.0.3
info:
  title: Pet Store
  version: "1.0"
servers:
  - url: https://pets.example.com/api
paths:
  /pets:
    get:
      operationId: listPets
      tags: [pets]
      parameters:
        - name: limit
          in: query
          description: Max number of pets
          schema: {type: integer}
      responses:
        '200':
          description: ok
          content:
            application/json: {schema: {type: array}}
components:
  schemas:
    Pet:
      type: object
      properties:
        name: {type: string}
"#;

    #[test]
    fn test_parse_yaml_document() {
        let (doc, diagnostics) = parse_document("pets.yaml", PETS_YAML).unwrap();
        assert_eq!(doc.info.title, "Pet Store");
        assert_eq!(doc.servers.len(), 1);
        assert_eq!(doc.paths.len(), 1);
        assert_eq!(doc.components.schemas["Pet"].reference_id, "Pet");
        assert_eq!(diagnostics, vec![]);

        let get = doc.paths["/pets"].operation(HttpMethod::Get).unwrap();
        assert_eq!(get.operation_id, "listPets");
        assert_eq!(get.parameters[0].name, "limit");
        assert!(get.responses["200"].content.contains_key("application/json"));
    }

    #[test]
    fn test_parse_json_document() {
        let json = r#"{
            "openapi": "3.0.3",
            "info": {"title": "Pets", "version": "1.0"},
            "paths": {"/pets": {"get": {"operationId": "listPets", "responses": {}}}}
        }"#;
        let (doc, _) = parse_document("pets.json", json).unwrap();
        assert_eq!(doc.info.title, "Pets");
    }

    #[test]
    fn test_parse_failure_names_the_source() {
        let err = parse_document("bad.yaml", ": not : valid : yaml :").unwrap_err();
        match err {
            AppError::SourceParse { source, .. } => assert_eq!(source, "bad.yaml"),
            other => panic!("expected SourceParse, got {}", other),
        }
    }

    #[test]
    fn test_scalar_root_is_a_parse_error() {
        assert!(parse_document("bad.yaml", "42").is_err());
    }

    #[test]
    fn test_missing_operation_id_is_a_diagnostic_not_an_error() {
        let yaml = r#"
openapi: 3.0.3
info: {title: Pets, version: "1.0"}
paths:
  /pets:
    get:
      responses: {'200': {description: ok}}
"#;
        let (_, diagnostics) = parse_document("pets.yaml", yaml).unwrap();
        assert!(diagnostics
            .iter()
            .any(|d| d.message.contains("no operationId")));
    }

    #[test]
    fn test_path_level_parameters_flagged() {
        let yaml = r#"
openapi: 3.0.3
info: {title: Pets, version: "1.0"}
paths:
  /pets/{id}:
    parameters:
      - name: id
        in: path
        schema: {type: string}
    get:
      operationId: getPet
      responses: {'200': {description: ok}}
"#;
        let (_, diagnostics) = parse_document("pets.yaml", yaml).unwrap();
        assert!(diagnostics
            .iter()
            .any(|d| d.message.contains("path-level parameters")));
    }
}
