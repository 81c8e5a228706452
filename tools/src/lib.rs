//! Inspection and validation tools for saved project files.
//!
//! This crate provides utilities for understanding project text without
//! a live host:
//!
//! - Summarize a file's entities, tree sizes, and type tags
//! - Check a file against the decode limits before shipping it
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand what a saved file holds.

use std::collections::BTreeMap;

use graph::DecodeLimits;
use history::{ProjectError, ProjectResult, ProjectSnapshot};
use serde::Serialize;
use value::{ArgNode, Node};

/// Summary of one entity tree in a project file.
#[derive(Debug, Clone, Serialize)]
pub struct EntityReport {
    /// The entity's key in the project.
    pub key: String,
    /// Type tag of the root node, when the root is a typed object.
    pub tag: Option<String>,
    /// Total nodes in the tree.
    pub nodes: usize,
    /// Maximum nesting depth.
    pub depth: usize,
    /// Largest property count on any single node.
    pub max_properties: usize,
}

/// Summary of a whole project file.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    /// Format marker found in the file.
    pub format: String,
    /// Format version found in the file.
    pub version: u32,
    /// Registry fingerprint recorded at save time.
    pub registry_fingerprint: u64,
    /// Number of entities.
    pub entity_count: usize,
    /// Per-entity tree summaries, in the file's entity order.
    pub entities: Vec<EntityReport>,
    /// Occurrences of each type tag across all entity trees.
    pub tag_histogram: BTreeMap<String, usize>,
}

/// Summary produced by a successful validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    /// Number of entities checked.
    pub entities: usize,
    /// Total nodes across all entity trees.
    pub total_nodes: usize,
}

/// Parses project text and summarizes it.
///
/// Inspection deliberately skips the decode limits so oversized files
/// can still be examined; only unparseable text is an error.
pub fn inspect_project(text: &str) -> ProjectResult<InspectReport> {
    let snapshot: ProjectSnapshot =
        serde_json::from_str(text).map_err(|err| ProjectError::Parse(err.to_string()))?;

    let mut entities = Vec::new();
    let mut tag_histogram = BTreeMap::new();
    for key in &snapshot.entity_order {
        let Some(node) = snapshot.entities.get(key) else {
            continue;
        };
        let stats = node.stats();
        entities.push(EntityReport {
            key: key.clone(),
            tag: root_tag(node),
            nodes: stats.nodes,
            depth: stats.depth,
            max_properties: stats.max_properties,
        });
        count_tags(node, &mut tag_histogram);
    }

    Ok(InspectReport {
        format: snapshot.format,
        version: snapshot.version,
        registry_fingerprint: snapshot.registry_fingerprint,
        entity_count: snapshot.entities.len(),
        entities,
        tag_histogram,
    })
}

/// Runs the full load-path validation against the given limits.
pub fn validate_project(text: &str, limits: &DecodeLimits) -> ProjectResult<ValidationSummary> {
    let snapshot = history::decode_project(text, limits)?;
    let total_nodes = snapshot
        .entities
        .values()
        .map(|node| node.stats().nodes)
        .sum();
    Ok(ValidationSummary {
        entities: snapshot.entities.len(),
        total_nodes,
    })
}

fn root_tag(node: &Node) -> Option<String> {
    match node {
        Node::Object(object) => Some(object.class_name.as_str().to_owned()),
        _ => None,
    }
}

fn count_tags(root: &Node, histogram: &mut BTreeMap<String, usize>) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match node {
            Node::Object(object) => {
                *histogram
                    .entry(object.class_name.as_str().to_owned())
                    .or_insert(0) += 1;
                for arg in &object.constructor_arguments {
                    if let ArgNode::Value(child) = arg {
                        stack.push(child);
                    }
                }
                stack.extend(object.properties.values());
            }
            Node::Array(array) => stack.extend(array.properties.values()),
            Node::Scalar(_) | Node::Reference(_) => {}
        }
    }
}
