//! Root Factory

use reinhardt_host::{HostTree, NodeId, NodeType};
use tracing::{debug, warn};

use crate::binding::RootBinding;
use crate::bridge::{Reconciler, RootOptions};
use crate::config::MountConfig;
use crate::error::MountError;

/// Creates a root bound to `container`.
///
/// Without hydration the container's children are removed last to first
/// before the internal root is created; with hydration they are left for
/// the reconciler to reuse. The container is marked as a root only once
/// the reconciler has produced the internal root.
pub fn create_root<R: Reconciler>(
	tree: &HostTree,
	reconciler: &R,
	container: NodeId,
	should_hydrate: bool,
	config: &MountConfig,
) -> Result<RootBinding<R::InternalRoot>, MountError<R::Error>> {
	if !should_hydrate {
		clear_container(tree, container, config)?;
	}

	let internal_root = reconciler
		.create_container(
			container,
			RootOptions {
				hydrate: should_hydrate,
			},
		)
		.map_err(MountError::Reconciler)?;
	tree.mark_as_root(container);

	debug!(container = %container, hydrate = should_hydrate, "created root");
	Ok(RootBinding::new(container, internal_root, should_hydrate))
}

fn clear_container(
	tree: &HostTree,
	container: NodeId,
	config: &MountConfig,
) -> Result<(), reinhardt_host::HostError> {
	while let Some(child) = tree.last_child(container) {
		if config.diagnostics()
			&& tree.node_type(child) == Some(NodeType::Element)
			&& tree.has_attribute(child, config.root_attribute())
		{
			warn!(
				container = %container,
				"render(): target node has server-rendered markup that will be discarded; use hydrate() to attach to it"
			);
		}
		tree.remove_child(container, child)?;
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::TextReconciler;
	use rstest::rstest;

	#[rstest]
	fn test_fresh_root_clears_children() {
		let tree = HostTree::new();
		let reconciler = TextReconciler::new(tree.clone());
		let container = tree.create_element("div");
		for text in ["a", "b", "c"] {
			let node = tree.create_text(text);
			tree.append_child(container, node).unwrap();
		}

		let binding =
			create_root(&tree, &reconciler, container, false, &MountConfig::default()).unwrap();

		assert_eq!(tree.child_count(container), 0);
		assert!(!binding.is_hydrate());
		assert_eq!(binding.container(), container);
		assert!(tree.is_marked_as_root(container));
		assert_eq!(reconciler.is_hydrating(*binding.internal_root()), Some(false));
	}

	#[rstest]
	fn test_hydrating_root_keeps_children() {
		let tree = HostTree::new();
		let reconciler = TextReconciler::new(tree.clone());
		let container = tree.create_element("div");
		let markup = tree.create_element("span");
		tree.append_child(container, markup).unwrap();

		let binding =
			create_root(&tree, &reconciler, container, true, &MountConfig::default()).unwrap();

		assert_eq!(tree.children(container), vec![markup]);
		assert!(binding.is_hydrate());
		assert_eq!(reconciler.is_hydrating(*binding.internal_root()), Some(true));
	}

	#[rstest]
	fn test_reconciler_failure_leaves_container_unmarked() {
		let tree = HostTree::new();
		let reconciler = TextReconciler::new(tree.clone());
		reconciler.fail_next_create();
		let container = tree.create_element("div");

		let result = create_root(&tree, &reconciler, container, false, &MountConfig::default());

		assert!(matches!(result, Err(MountError::Reconciler(_))));
		assert!(!tree.is_marked_as_root(container));
	}
}
