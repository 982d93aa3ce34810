//! Hydration Heuristic
//!
//! Server-rendered markup is detected structurally: a container whose root
//! element carries the root marker attribute is hydrated even when the
//! caller did not ask for it, so the markup is reused instead of being
//! rendered a second time.

use reinhardt_host::{HostTree, NodeId, probe};
use tracing::warn;

use crate::config::MountConfig;

/// Decides whether a new root on `container` should attach to its existing
/// children.
pub fn should_hydrate(
	tree: &HostTree,
	container: NodeId,
	force_hydrate: bool,
	config: &MountConfig,
) -> bool {
	if force_hydrate {
		return true;
	}
	let marked = probe::has_root_marker(tree, container, config.root_attribute());
	if marked && config.diagnostics() {
		warn!(
			container = %container,
			attribute = config.root_attribute(),
			"render() found server-rendered markup and is hydrating it; call hydrate() explicitly to attach to server markup"
		);
	}
	marked
}
