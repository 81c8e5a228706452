//! Limits for load-path validation.

use value::Node;

use crate::error::{GraphError, GraphResult, LimitKind};

/// Resource limits enforced when validating a node tree read from text.
///
/// These protect the load path from pathological input; they play no part
/// in serializing live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum number of nodes in one entity tree.
    pub max_nodes: usize,
    /// Maximum nesting depth of one entity tree.
    pub max_depth: usize,
    /// Maximum number of properties on a single node.
    pub max_properties_per_node: usize,
    /// Maximum number of entities in a project snapshot.
    pub max_entities: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_nodes: 262_144,
            max_depth: 96,
            max_properties_per_node: 4096,
            max_entities: 4096,
        }
    }
}

impl DecodeLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_nodes: 256,
            max_depth: 16,
            max_properties_per_node: 32,
            max_entities: 16,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_nodes: usize::MAX,
            max_depth: usize::MAX,
            max_properties_per_node: usize::MAX,
            max_entities: usize::MAX,
        }
    }
}

/// Validates one node tree against the limits.
pub fn validate_node(node: &Node, limits: &DecodeLimits) -> GraphResult<()> {
    let stats = node.stats();
    if stats.nodes > limits.max_nodes {
        return Err(GraphError::LimitExceeded {
            kind: LimitKind::Nodes,
            limit: limits.max_nodes,
            actual: stats.nodes,
        });
    }
    if stats.depth > limits.max_depth {
        return Err(GraphError::LimitExceeded {
            kind: LimitKind::Depth,
            limit: limits.max_depth,
            actual: stats.depth,
        });
    }
    if stats.max_properties > limits.max_properties_per_node {
        return Err(GraphError::LimitExceeded {
            kind: LimitKind::PropertiesPerNode,
            limit: limits.max_properties_per_node,
            actual: stats.max_properties,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use value::{ArrayNode, Scalar, SerialId};

    fn deep_node(depth: usize) -> Node {
        let mut node = Node::Scalar(Scalar::Int(0));
        for i in 0..depth {
            let mut array = ArrayNode::new(SerialId::nth(i as u64 + 1));
            array.push_entry("0", node);
            node = Node::Array(array);
        }
        node
    }

    #[test]
    fn default_limits_are_reasonable() {
        let limits = DecodeLimits::default();
        assert!(limits.max_nodes >= 1024);
        assert!(limits.max_depth >= 32);
    }

    #[test]
    fn testing_limits_smaller() {
        let test_limits = DecodeLimits::for_testing();
        let default_limits = DecodeLimits::default();
        assert!(test_limits.max_nodes < default_limits.max_nodes);
        assert!(test_limits.max_depth < default_limits.max_depth);
    }

    #[test]
    fn shallow_tree_validates() {
        let node = deep_node(4);
        assert!(validate_node(&node, &DecodeLimits::for_testing()).is_ok());
    }

    #[test]
    fn deep_tree_rejected() {
        let node = deep_node(20);
        let err = validate_node(&node, &DecodeLimits::for_testing()).unwrap_err();
        assert!(matches!(
            err,
            GraphError::LimitExceeded {
                kind: LimitKind::Depth,
                ..
            }
        ));
    }

    #[test]
    fn wide_node_rejected() {
        let mut array = ArrayNode::new(SerialId::nth(1));
        for i in 0..40 {
            array.push_entry(i.to_string(), Node::Scalar(Scalar::Int(i)));
        }
        let err = validate_node(&Node::Array(array), &DecodeLimits::for_testing()).unwrap_err();
        assert!(matches!(
            err,
            GraphError::LimitExceeded {
                kind: LimitKind::PropertiesPerNode,
                ..
            }
        ));
    }

    #[test]
    fn unlimited_accepts_anything_shallow_enough_to_build() {
        let node = deep_node(64);
        assert!(validate_node(&node, &DecodeLimits::unlimited()).is_ok());
    }
}
