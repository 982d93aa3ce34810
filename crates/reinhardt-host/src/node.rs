//! Host node identity and classification.

use core::fmt;

/// Identity of a node inside a [`HostTree`](crate::HostTree).
///
/// Ids are allocated by the tree that owns the node and are never reused.
/// Detached nodes stay in the tree's arena, so an id keeps resolving for as
/// long as the tree lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
	pub(crate) fn from_raw(raw: u64) -> Self {
		Self(raw)
	}

	/// Returns the raw numeric id.
	pub fn as_u64(self) -> u64 {
		self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Opaque key a reconciler uses to register the instance that produced a
/// host node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceKey(pub u64);

/// Kind of host node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
	/// An element such as `<div>`.
	Element,
	/// A text node.
	Text,
	/// A comment node.
	Comment,
	/// A document.
	Document,
	/// A document fragment.
	DocumentFragment,
}

impl NodeType {
	/// Returns the numeric `nodeType` code used by the DOM.
	pub fn code(self) -> u16 {
		match self {
			Self::Element => 1,
			Self::Text => 3,
			Self::Comment => 8,
			Self::Document => 9,
			Self::DocumentFragment => 11,
		}
	}

	/// Whether nodes of this type may have children.
	pub fn can_have_children(self) -> bool {
		matches!(self, Self::Element | Self::Document | Self::DocumentFragment)
	}
}
