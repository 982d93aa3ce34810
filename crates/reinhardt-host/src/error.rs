//! Host tree errors.

use crate::node::NodeId;

/// Errors produced by host tree mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
	/// The node does not exist in this tree.
	#[error("host node {0} not found")]
	NodeNotFound(NodeId),
	/// The node is not a child of the given parent.
	#[error("host node {child} is not a child of {parent}")]
	NotAChild {
		/// Expected parent.
		parent: NodeId,
		/// Node that was supposed to be a child.
		child: NodeId,
	},
	/// The operation is not supported by this kind of node.
	#[error("operation not supported on host node {0}")]
	UnsupportedNode(NodeId),
	/// The insertion would produce an invalid hierarchy.
	#[error("cannot insert {child} into {parent}")]
	HierarchyRequest {
		/// Target parent.
		parent: NodeId,
		/// Node being inserted.
		child: NodeId,
	},
}
