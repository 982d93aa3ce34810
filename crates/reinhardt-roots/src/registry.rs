//! Root Registry
//!
//! Identity-keyed side table from host container to its [`RootBinding`].
//! The container is owned by the host environment, so the registry holds a
//! back-reference keyed by [`NodeId`] rather than storing anything in the
//! node itself.

use core::cell::RefCell;
use std::collections::HashMap;

use reinhardt_host::{HostTree, NodeId};

use crate::binding::RootBinding;

/// Container to root binding association.
#[derive(Debug)]
pub struct RootRegistry<T> {
	tree: HostTree,
	bindings: RefCell<HashMap<NodeId, RootBinding<T>>>,
}

impl<T> RootRegistry<T> {
	/// Creates an empty registry for containers of `tree`.
	pub fn new(tree: HostTree) -> Self {
		Self {
			tree,
			bindings: RefCell::new(HashMap::new()),
		}
	}

	/// Returns the binding of a container.
	pub fn lookup(&self, container: NodeId) -> Option<RootBinding<T>> {
		self.bindings.borrow().get(&container).cloned()
	}

	/// Associates a binding with its container, returning any binding it
	/// replaced.
	pub fn bind(&self, binding: RootBinding<T>) -> Option<RootBinding<T>> {
		self.bindings
			.borrow_mut()
			.insert(binding.container(), binding)
	}

	/// Clears the binding of a container and its root marking in the host
	/// tree. Returns whether a binding existed.
	pub fn unbind(&self, container: NodeId) -> bool {
		let removed = self.bindings.borrow_mut().remove(&container).is_some();
		self.tree.unmark_as_root(container);
		removed
	}

	/// Number of bound containers.
	pub fn len(&self) -> usize {
		self.bindings.borrow().len()
	}

	/// Whether no container is bound.
	pub fn is_empty(&self) -> bool {
		self.bindings.borrow().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_bind_lookup_unbind() {
		let tree = HostTree::new();
		let registry = RootRegistry::new(tree.clone());
		let container = tree.create_element("div");
		tree.mark_as_root(container);

		assert!(registry.lookup(container).is_none());

		let binding = RootBinding::new(container, 7_u32, false);
		assert!(registry.bind(binding.clone()).is_none());
		let found = registry.lookup(container).unwrap();
		assert!(found.ptr_eq(&binding));
		assert_eq!(registry.len(), 1);

		assert!(registry.unbind(container));
		assert!(registry.lookup(container).is_none());
		assert!(!tree.is_marked_as_root(container));
		assert!(registry.is_empty());
	}

	#[rstest]
	fn test_unbind_unknown_container() {
		let tree = HostTree::new();
		let registry: RootRegistry<u32> = RootRegistry::new(tree.clone());
		let container = tree.create_element("div");
		assert!(!registry.unbind(container));
		assert!(registry.is_empty());
	}

	#[rstest]
	fn test_bindings_are_per_container() {
		let tree = HostTree::new();
		let registry = RootRegistry::new(tree.clone());
		let a = tree.create_element("div");
		let b = tree.create_element("div");
		registry.bind(RootBinding::new(a, 1_u32, false));
		registry.bind(RootBinding::new(b, 2_u32, true));

		assert_eq!(*registry.lookup(a).unwrap().internal_root(), 1);
		assert!(registry.lookup(b).unwrap().is_hydrate());

		registry.unbind(a);
		assert!(registry.lookup(a).is_none());
		assert!(registry.lookup(b).is_some());
	}
}
