//! Host Capability Probe
//!
//! Pure classification of host nodes. Nothing in this module mutates the
//! tree.
//!
//! ## Root element
//!
//! The *root element* of a container is the node that server-rendered
//! markup would start at:
//!
//! ```text
//! container is a document  ->  document.documentElement
//! anything else            ->  container.firstChild
//! ```

use crate::node::{NodeId, NodeType};
use crate::tree::HostTree;

/// Node-type classification of a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeClass {
	/// The node is a document.
	pub is_document: bool,
	/// The node is an element.
	pub is_element: bool,
	/// The node is a comment.
	pub is_comment: bool,
}

/// Classifies a node by its type. Unknown nodes classify as nothing.
pub fn classify(tree: &HostTree, node: NodeId) -> NodeClass {
	let node_type = tree.node_type(node);
	NodeClass {
		is_document: node_type == Some(NodeType::Document),
		is_element: node_type == Some(NodeType::Element),
		is_comment: node_type == Some(NodeType::Comment),
	}
}

/// Returns the root element of a container.
pub fn root_element(tree: &HostTree, container: NodeId) -> Option<NodeId> {
	if classify(tree, container).is_document {
		tree.document_element(container)
	} else {
		tree.first_child(container)
	}
}

/// Whether the container's root element is an element carrying `marker`.
pub fn has_root_marker(tree: &HostTree, container: NodeId, marker: &str) -> bool {
	root_element(tree, container).is_some_and(|root| {
		tree.node_type(root) == Some(NodeType::Element) && tree.has_attribute(root, marker)
	})
}

/// Whether a node can host a render root.
///
/// Elements, documents and document fragments always qualify. A comment
/// qualifies only when its value equals `mount_point_comment`.
pub fn is_valid_container(tree: &HostTree, node: NodeId, mount_point_comment: &str) -> bool {
	match tree.node_type(node) {
		Some(NodeType::Element | NodeType::Document | NodeType::DocumentFragment) => true,
		Some(NodeType::Comment) => tree.node_value(node).as_deref() == Some(mount_point_comment),
		Some(NodeType::Text) | None => false,
	}
}

/// Whether the container holds content produced by this runtime without
/// being marked as a root itself.
pub fn hosts_foreign_content(tree: &HostTree, container: NodeId) -> bool {
	tree.first_child(container)
		.is_some_and(|child| tree.instance_from_node(child).is_some())
		&& !tree.is_marked_as_root(container)
}
