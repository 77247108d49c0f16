#![deny(missing_docs)]

//! # Merge Engine
//!
//! Folds N parsed documents plus one compiled rule set into a single output
//! document. Each invocation is a pure fold over `(sources, rules)`; no
//! state survives across calls.
//!
//! Source order is a precondition of the API, not an accident of iteration:
//! it decides which occurrence keeps a colliding operation id (later ones
//! are suffixed), which schema definition survives a name collision (first
//! wins, later ones are dropped and reported), and the order of the merged
//! server list.
//!
//! Per source, the steps run in a fixed order:
//!
//! 1. operation-id de-duplication against the running global set;
//! 2. content-type stripping (before any skip decision, so stripped sets
//!    are reflected even on paths filtered later);
//! 3. operation-level skip and tag rewrite;
//! 4. path-level skip, path-key rewrite, parameter rewrite, and dropping
//!    of emptied paths;
//! 5. server resolution;
//! 6. schema merge with backtick cleaning and first-wins dedup.

use crate::document::{Components, Document, Info, PathItem, Schema, Server};
use crate::rules::CompiledRules;
use crate::source::SourceDocument;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A name collision resolved by dropping the later occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressedCollision {
    /// The colliding key as it would have appeared in the output.
    pub name: String,
    /// The source whose entry was dropped.
    pub source: String,
}

/// The merged document plus the collisions that were silently resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// The assembled output document.
    pub document: Document,
    /// Schema-name collisions dropped under the first-wins rule.
    pub suppressed_schemas: Vec<SuppressedCollision>,
    /// Path-key collisions dropped under the first-wins rule.
    pub suppressed_paths: Vec<SuppressedCollision>,
}

/// Accumulator threaded through the per-source fold.
#[derive(Debug, Default)]
struct MergeState {
    used_operation_ids: HashSet<String>,
    paths: IndexMap<String, PathItem>,
    servers: Vec<Server>,
    seen_server_urls: HashSet<String>,
    overrides_applied: bool,
    schemas: IndexMap<String, Schema>,
    suppressed_schemas: Vec<SuppressedCollision>,
    suppressed_paths: Vec<SuppressedCollision>,
}

/// Merges the given sources, in order, under the compiled rules.
///
/// Sources must already be in the caller-supplied order; see the module
/// documentation for why that order is load-bearing. Collisions never fail
/// the merge; they are resolved deterministically and reported on the
/// outcome.
pub fn merge_documents(sources: &[SourceDocument], rules: &CompiledRules) -> MergeOutcome {
    let mut state = MergeState::default();
    for source in sources {
        state = fold_source(state, source, rules);
    }

    let document = Document {
        info: Info {
            title: rules.output_info.title.clone(),
            version: rules.output_info.version.clone(),
            description: rules.output_info.description.clone(),
        },
        servers: state.servers,
        paths: state.paths,
        components: Components {
            schemas: state.schemas,
        },
        ..Document::default()
    };

    MergeOutcome {
        document,
        suppressed_schemas: state.suppressed_schemas,
        suppressed_paths: state.suppressed_paths,
    }
}

/// Folds one source into the accumulator. The source's document is cloned;
/// originals are never mutated.
fn fold_source(mut state: MergeState, source: &SourceDocument, rules: &CompiledRules) -> MergeState {
    let mut doc = source.document.clone();

    assign_unique_operation_ids(&mut doc, &mut state.used_operation_ids);
    strip_content_types(&mut doc, rules);
    apply_operation_rules(&mut doc, rules);
    collect_paths(&mut state, doc.paths, rules, &source.location);
    merge_servers(&mut state, &doc.servers, &source.file_name, rules);
    merge_schemas(&mut state, doc.components.schemas, &source.location);

    state
}

/// Step 1: suffixes colliding operation ids with the smallest free positive
/// integer, then records the accepted id in the running set. Operations
/// without an id are left alone.
fn assign_unique_operation_ids(doc: &mut Document, used: &mut HashSet<String>) {
    for item in doc.paths.values_mut() {
        for (_, op) in item.operations_mut() {
            if op.operation_id.is_empty() {
                continue;
            }
            if used.contains(&op.operation_id) {
                let mut suffix = 1u32;
                loop {
                    let proposed = format!("{}{}", op.operation_id, suffix);
                    if !used.contains(&proposed) {
                        op.operation_id = proposed;
                        break;
                    }
                    suffix += 1;
                }
            }
            used.insert(op.operation_id.clone());
        }
    }
}

/// Step 2: strips configured content types from every request body and
/// response. Runs before skip decisions.
fn strip_content_types(doc: &mut Document, rules: &CompiledRules) {
    if rules.remove_content_types.is_empty() {
        return;
    }
    for item in doc.paths.values_mut() {
        for (_, op) in item.operations_mut() {
            if let Some(body) = op.request_body.as_mut() {
                body.content
                    .retain(|ct, _| !rules.remove_content_types.contains(&ct.to_lowercase()));
            }
            for response in op.responses.values_mut() {
                response
                    .content
                    .retain(|ct, _| !rules.remove_content_types.contains(&ct.to_lowercase()));
            }
        }
    }
}

/// Step 3: removes skip-listed operations (matched against the possibly
/// suffixed id) and applies the tag rewrite.
///
/// The tag rewrite is unconditional once any tag matches: every tag on the
/// operation is renamed to the value mapped from the first matching tag,
/// not just the matching one.
fn apply_operation_rules(doc: &mut Document, rules: &CompiledRules) {
    for item in doc.paths.values_mut() {
        let skipped: Vec<_> = item
            .operations()
            .filter(|(_, op)| {
                rules
                    .skip_operation_ids
                    .contains(&op.operation_id.to_lowercase())
            })
            .map(|(method, _)| method)
            .collect();
        for method in skipped {
            item.remove(method);
        }

        for (_, op) in item.operations_mut() {
            let new_name = op
                .tags
                .iter()
                .find_map(|tag| rules.tag_rewrite.get(&tag.to_lowercase()))
                .cloned();
            if let Some(new_name) = new_name {
                for tag in op.tags.iter_mut() {
                    *tag = new_name.clone();
                }
            }
        }
    }
}

/// Step 4: drops skip-listed paths, rewrites surviving path keys and
/// parameters, and folds non-empty paths into the accumulator.
fn collect_paths(
    state: &mut MergeState,
    paths: IndexMap<String, PathItem>,
    rules: &CompiledRules,
    source: &str,
) {
    for (key, mut item) in paths {
        if rules.skip_paths.contains(&key.to_lowercase()) {
            continue;
        }

        let new_key = rules.rewrite_segments(&key);
        rewrite_parameters(&mut item, rules);

        // A path emptied by operation skipping is never emitted.
        if item.is_empty() {
            continue;
        }

        if state.paths.contains_key(&new_key) {
            state.suppressed_paths.push(SuppressedCollision {
                name: new_key,
                source: source.to_string(),
            });
        } else {
            state.paths.insert(new_key, item);
        }
    }
}

/// Renames configured parameters and substitutes the old name for the new
/// one inside descriptions. The description substitution is a literal
/// replacement of the parameter's original spelling.
fn rewrite_parameters(item: &mut PathItem, rules: &CompiledRules) {
    if rules.parameter_rewrite.is_empty() {
        return;
    }
    for (_, op) in item.operations_mut() {
        for param in op.parameters.iter_mut() {
            let Some(new_name) = rules.parameter_rewrite.get(&param.name.to_lowercase()) else {
                continue;
            };
            if let Some(description) = param.description.as_mut() {
                *description = description.replace(param.name.as_str(), new_name);
            }
            param.name = new_name.clone();
        }
    }
}

/// Step 5: resolves servers for one source into the accumulated list.
///
/// With overrides, the output list is set exactly once; later sources are
/// no-ops. Without overrides, each source's discovered servers are rewritten
/// and appended; a source with no servers contributes a placeholder
/// synthesized from its file name. The list keeps first-seen order and is
/// deduplicated by exact URL only.
fn merge_servers(
    state: &mut MergeState,
    servers: &[Server],
    file_name: &str,
    rules: &CompiledRules,
) {
    if !rules.server_overrides.is_empty() {
        if !state.overrides_applied {
            for url in &rules.server_overrides {
                push_server(state, Server::new(url.clone()));
            }
            state.overrides_applied = true;
        }
        return;
    }

    if servers.is_empty() {
        let url = rules.rewrite_segments(file_name);
        push_server(state, Server::new(url));
        return;
    }

    for server in servers {
        let mut server = server.clone();
        server.url = rules.rewrite_segments(&server.url);
        push_server(state, server);
    }
}

fn push_server(state: &mut MergeState, server: Server) {
    if state.seen_server_urls.insert(server.url.clone()) {
        state.servers.push(server);
    }
}

/// Step 6: merges schemas under cleaned names, first wins.
///
/// A name containing backticks is cleaned, the reference is rebuilt with the
/// cleaned id, and the original id is recorded as the external resource
/// reference. Later collisions on the cleaned name are dropped and reported.
fn merge_schemas(state: &mut MergeState, schemas: IndexMap<String, Schema>, source: &str) {
    for (name, mut schema) in schemas {
        let cleaned = name.replace('`', "");

        if cleaned != name || schema.reference_id.contains('`') {
            schema.external_resource = Some(schema.reference_id.clone());
            schema.reference_id = schema.reference_id.replace('`', "");
        }

        if state.schemas.contains_key(&cleaned) {
            state.suppressed_schemas.push(SuppressedCollision {
                name: cleaned,
                source: source.to_string(),
            });
        } else {
            state.schemas.insert(cleaned, schema);
        }
    }
}
