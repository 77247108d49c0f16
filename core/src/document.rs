#![deny(missing_docs)]

//! # Document Model
//!
//! In-memory representation of one API description document: info block,
//! server list, path table, and component schemas.
//!
//! The model is deliberately shallow: the merge engine only interprets the
//! fields it rewrites (operation ids, tags, parameters, content-type keys,
//! path keys, server URLs, schema names). Everything else rides along in
//! opaque `extra` maps so serialization does not drop structure the engine
//! never looked at. Unmodeled top-level sections are not preserved.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Default OpenAPI version marker emitted on merged output.
fn default_openapi_version() -> String {
    "3.0.3".to_string()
}

/// An HTTP verb carrying one operation within a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// All verbs, in the fixed order path items are iterated.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// Uppercase verb name, e.g. `"GET"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The location of a parameter within a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamLocation {
    /// Path template segment.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
    /// Anything the model does not classify (e.g. legacy `body` parameters);
    /// the original spelling is kept for round-tripping.
    Other(String),
}

impl ParamLocation {
    /// The location as it appears in a document's `in` field.
    pub fn as_str(&self) -> &str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Header => "header",
            ParamLocation::Cookie => "cookie",
            ParamLocation::Other(other) => other,
        }
    }
}

impl Serialize for ParamLocation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ParamLocation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "path" => ParamLocation::Path,
            "query" => ParamLocation::Query,
            "header" => ParamLocation::Header,
            "cookie" => ParamLocation::Cookie,
            _ => ParamLocation::Other(raw),
        })
    }
}

/// A single operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name as written in the source document.
    pub name: String,
    /// Location of the parameter.
    #[serde(rename = "in")]
    pub location: ParamLocation,
    /// Human-readable description, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unmodeled parameter fields (schema, required, style, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A request body; the engine only interprets its content-type keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestBody {
    /// Media-type map keyed by content type; values are opaque.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, Value>,
    /// Unmodeled request-body fields (description, required, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// One response entry; the engine only interprets its content-type keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    /// Response description, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Media-type map keyed by content type; values are opaque.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, Value>,
    /// Unmodeled response fields (headers, links, `$ref`, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// One HTTP-verb endpoint definition within a path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    /// Operation id; unique across the merged output (enforced by the
    /// merge engine, not required of inputs). Empty when the source did
    /// not declare one.
    #[serde(
        default,
        rename = "operationId",
        skip_serializing_if = "String::is_empty"
    )]
    pub operation_id: String,
    /// Ordered tag list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Ordered parameter list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Request body, if any.
    #[serde(
        default,
        rename = "requestBody",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code (or `default` / `2XX` ranges).
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, Response>,
    /// Unmodeled operation fields (summary, description, security, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// The operations attached to one path key, at most one per verb.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// PUT operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// POST operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// DELETE operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    /// OPTIONS operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    /// HEAD operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    /// PATCH operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// TRACE operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
    /// Unmodeled path-item fields (summary, path-level parameters, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl PathItem {
    /// Returns the operation for a verb, if present.
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.slot(method).as_ref()
    }

    /// Iterates present operations in the fixed verb order of
    /// [`HttpMethod::ALL`].
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::ALL
            .into_iter()
            .filter_map(move |m| self.slot(m).as_ref().map(|op| (m, op)))
    }

    /// Iterates present operations mutably, in fixed verb order.
    pub fn operations_mut(&mut self) -> impl Iterator<Item = (HttpMethod, &mut Operation)> {
        [
            (HttpMethod::Get, self.get.as_mut()),
            (HttpMethod::Put, self.put.as_mut()),
            (HttpMethod::Post, self.post.as_mut()),
            (HttpMethod::Delete, self.delete.as_mut()),
            (HttpMethod::Options, self.options.as_mut()),
            (HttpMethod::Head, self.head.as_mut()),
            (HttpMethod::Patch, self.patch.as_mut()),
            (HttpMethod::Trace, self.trace.as_mut()),
        ]
        .into_iter()
        .filter_map(|(m, op)| op.map(|o| (m, o)))
    }

    /// Removes and returns the operation for a verb.
    pub fn remove(&mut self, method: HttpMethod) -> Option<Operation> {
        self.slot_mut(method).take()
    }

    /// True when no verb carries an operation.
    pub fn is_empty(&self) -> bool {
        self.operations().next().is_none()
    }

    /// Number of operations present.
    pub fn len(&self) -> usize {
        self.operations().count()
    }

    fn slot(&self, method: HttpMethod) -> &Option<Operation> {
        match method {
            HttpMethod::Get => &self.get,
            HttpMethod::Put => &self.put,
            HttpMethod::Post => &self.post,
            HttpMethod::Delete => &self.delete,
            HttpMethod::Options => &self.options,
            HttpMethod::Head => &self.head,
            HttpMethod::Patch => &self.patch,
            HttpMethod::Trace => &self.trace,
        }
    }

    fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Trace => &mut self.trace,
        }
    }
}

/// One server entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// Server URL.
    pub url: String,
    /// Unmodeled server fields (description, variables, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Server {
    /// Creates a server entry from a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            extra: IndexMap::new(),
        }
    }
}

/// A named component schema. The structural body is opaque to the merge
/// engine; only the name and reference id matter for dedup and renaming.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    /// The schema definition, passed through untouched.
    pub body: Value,
    /// The id this schema is referenced by. Set to the component name when
    /// parsed; rewritten by the merge engine when the name is cleaned.
    #[serde(skip)]
    pub reference_id: String,
    /// The original (pre-cleaning) reference id, recorded when the merge
    /// engine rebuilt the reference metadata.
    #[serde(skip)]
    pub external_resource: Option<String>,
}

/// Document info block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    /// Document title.
    #[serde(default)]
    pub title: String,
    /// Document version.
    #[serde(default)]
    pub version: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Component container; only schemas are modeled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    /// Named schemas in document order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, Schema>,
}

impl Components {
    /// True when the container carries nothing worth serializing.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// One API description document.
///
/// Invariants: path keys are unique within a document; schema names are
/// unique within a document. Both are guaranteed by the map representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// OpenAPI version marker.
    #[serde(default = "default_openapi_version")]
    pub openapi: String,
    /// Info block (title, version, description).
    #[serde(default)]
    pub info: Info,
    /// Ordered server list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// Path table in document order.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Component schemas.
    #[serde(default, skip_serializing_if = "Components::is_empty")]
    pub components: Components,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            openapi: default_openapi_version(),
            info: Info::default(),
            servers: Vec::new(),
            paths: IndexMap::new(),
            components: Components::default(),
        }
    }
}

impl Document {
    /// Iterates every operation in the document as `(path, method, op)`.
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations()
                .map(move |(method, op)| (path.as_str(), method, op))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_path_item_verb_iteration_order() {
        let mut item = PathItem::default();
        item.post = Some(Operation {
            operation_id: "create".into(),
            ..Operation::default()
        });
        item.get = Some(Operation {
            operation_id: "list".into(),
            ..Operation::default()
        });

        let order: Vec<HttpMethod> = item.operations().map(|(m, _)| m).collect();
        assert_eq!(order, vec![HttpMethod::Get, HttpMethod::Post]);
        assert_eq!(item.len(), 2);
        assert!(!item.is_empty());
    }

    #[test]
    fn test_path_item_remove() {
        let mut item = PathItem::default();
        item.get = Some(Operation::default());
        assert!(item.remove(HttpMethod::Get).is_some());
        assert!(item.is_empty());
        assert!(item.remove(HttpMethod::Get).is_none());
    }

    #[test]
    fn test_document_serde_round_trip_preserves_unmodeled_fields() {
        let json = serde_json::json!({
            "openapi": "3.0.3",
            "info": {"title": "Pets", "version": "1.0"},
            "paths": {
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "summary": "List the pets",
                        "responses": {
                            "200": {
                                "description": "ok",
                                "content": {"application/json": {"schema": {"type": "array"}}}
                            }
                        }
                    }
                }
            }
        });

        let doc: Document = serde_json::from_value(json.clone()).unwrap();
        let get = doc.paths["/pets"].operation(HttpMethod::Get).unwrap();
        assert_eq!(get.operation_id, "listPets");
        assert_eq!(
            get.extra.get("summary"),
            Some(&Value::String("List the pets".into()))
        );

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn test_param_location_round_trips_unknown_spellings() {
        let param: Parameter =
            serde_json::from_value(serde_json::json!({"name": "payload", "in": "body"})).unwrap();
        assert_eq!(param.location, ParamLocation::Other("body".into()));

        let back = serde_json::to_value(&param).unwrap();
        assert_eq!(back.get("in").and_then(|v| v.as_str()), Some("body"));
    }

    #[test]
    fn test_schema_is_transparent_over_its_body() {
        let body = serde_json::json!({"type": "object"});
        let schema: Schema = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(schema.reference_id, "");
        assert_eq!(serde_json::to_value(&schema).unwrap(), body);
    }
}
