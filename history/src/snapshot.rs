//! Whole-project snapshots and their text encoding.

use std::collections::BTreeMap;

use graph::{serialize_value, validate_node, DecodeLimits, GraphError, IdentityTable, LimitKind};
use registry::registry_fingerprint;
use serde::{Deserialize, Serialize};
use value::Node;

use crate::error::{ProjectError, ProjectResult};
use crate::host::{ProjectHost, Viewport};

/// Format marker written into every saved project.
pub const FORMAT_MARKER: &str = "gsnap-project";

/// Current project format version.
pub const FORMAT_VERSION: u32 = 1;

/// One full capture of a host's live state.
///
/// The same shape serves as a history stack entry and as the saved
/// project file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    /// Always [`FORMAT_MARKER`] in files this library writes.
    pub format: String,
    /// Format version, [`FORMAT_VERSION`] for files this library writes.
    pub version: u32,
    /// Fingerprint of the registry the capture was made against.
    pub registry_fingerprint: u64,
    /// Entity keys in presentation order.
    pub entity_order: Vec<String>,
    /// Serialized tree per entity key.
    pub entities: BTreeMap<String, Node>,
    /// Auxiliary view state.
    pub viewport: Viewport,
}

impl ProjectSnapshot {
    /// Captures the host's full live state.
    ///
    /// One identity table spans the whole capture, so an object shared
    /// between entities serializes once and every later occurrence becomes
    /// a reference into the earlier tree. Entities that opt out of
    /// serialization are left out entirely.
    #[must_use]
    pub fn capture(host: &dyn ProjectHost) -> Self {
        let mut entity_order = Vec::new();
        let mut entities = BTreeMap::new();
        let mut table = IdentityTable::new();
        for key in host.entity_order() {
            let Some(entity) = host.entity(&key) else {
                continue;
            };
            let Some(node) = serialize_value(&entity, &mut table) else {
                continue;
            };
            entity_order.push(key.clone());
            entities.insert(key, node);
        }
        Self {
            format: FORMAT_MARKER.to_owned(),
            version: FORMAT_VERSION,
            registry_fingerprint: registry_fingerprint(host.registry()),
            entity_order,
            entities,
            viewport: host.viewport(),
        }
    }

    /// Checks the format marker, version, and decode limits.
    pub fn validate(&self, limits: &DecodeLimits) -> ProjectResult<()> {
        if self.format != FORMAT_MARKER {
            return Err(ProjectError::UnrecognizedFormat {
                found: self.format.clone(),
            });
        }
        if self.version > FORMAT_VERSION {
            return Err(ProjectError::UnsupportedVersion {
                found: self.version,
            });
        }
        if self.entities.len() > limits.max_entities {
            return Err(ProjectError::Limits(GraphError::LimitExceeded {
                kind: LimitKind::Entities,
                limit: limits.max_entities,
                actual: self.entities.len(),
            }));
        }
        for node in self.entities.values() {
            validate_node(node, limits)?;
        }
        Ok(())
    }
}

/// Renders a snapshot as project text.
pub fn encode_project(snapshot: &ProjectSnapshot) -> ProjectResult<String> {
    serde_json::to_string_pretty(snapshot).map_err(|err| ProjectError::Encode(err.to_string()))
}

/// Parses and validates project text.
///
/// Validation runs in full before anything is returned, so callers can
/// discard live state only once the file is known to be usable.
pub fn decode_project(text: &str, limits: &DecodeLimits) -> ProjectResult<ProjectSnapshot> {
    let snapshot: ProjectSnapshot =
        serde_json::from_str(text).map_err(|err| ProjectError::Parse(err.to_string()))?;
    snapshot.validate(limits)?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use value::{Scalar, SerialId};

    fn minimal_snapshot() -> ProjectSnapshot {
        let mut entities = BTreeMap::new();
        entities.insert("e1".to_owned(), Node::Scalar(Scalar::Int(1)));
        ProjectSnapshot {
            format: FORMAT_MARKER.to_owned(),
            version: FORMAT_VERSION,
            registry_fingerprint: 0,
            entity_order: vec!["e1".to_owned()],
            entities,
            viewport: Viewport::default(),
        }
    }

    #[test]
    fn text_roundtrip() {
        let snapshot = minimal_snapshot();
        let text = encode_project(&snapshot).unwrap();
        let parsed = decode_project(&text, &DecodeLimits::default()).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn rejects_wrong_format_marker() {
        let mut snapshot = minimal_snapshot();
        snapshot.format = "other-tool".to_owned();
        let text = encode_project(&snapshot).unwrap();
        let err = decode_project(&text, &DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, ProjectError::UnrecognizedFormat { .. }));
    }

    #[test]
    fn rejects_future_version() {
        let mut snapshot = minimal_snapshot();
        snapshot.version = FORMAT_VERSION + 1;
        let text = encode_project(&snapshot).unwrap();
        let err = decode_project(&text, &DecodeLimits::default()).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::UnsupportedVersion {
                found
            } if found == FORMAT_VERSION + 1
        ));
    }

    #[test]
    fn rejects_too_many_entities() {
        let limits = DecodeLimits::for_testing();
        let mut snapshot = minimal_snapshot();
        for i in 0..=limits.max_entities {
            snapshot
                .entities
                .insert(format!("extra-{i}"), Node::Scalar(Scalar::Null));
        }
        let err = snapshot.validate(&limits).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Limits(GraphError::LimitExceeded {
                kind: LimitKind::Entities,
                ..
            })
        ));
    }

    #[test]
    fn rejects_oversized_entity_tree() {
        let limits = DecodeLimits::for_testing();
        let mut deep = Node::Scalar(Scalar::Null);
        for i in 0..limits.max_depth + 1 {
            let mut array = value::ArrayNode::new(SerialId::nth(i as u64 + 1));
            array.push_entry("0", deep);
            deep = Node::Array(array);
        }
        let mut snapshot = minimal_snapshot();
        snapshot.entities.insert("deep".to_owned(), deep);
        assert!(matches!(
            snapshot.validate(&limits),
            Err(ProjectError::Limits(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = decode_project("{\"format\": ", &DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, ProjectError::Parse(_)));
    }
}
