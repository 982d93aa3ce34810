//! Root lifecycle errors.

use reinhardt_host::{HostError, NodeId};

/// Errors raised by root lifecycle operations.
///
/// Validation failures are raised before any registry mutation. Reconciler
/// failures propagate unmodified.
#[derive(Debug, thiserror::Error)]
pub enum MountError<E>
where
	E: std::error::Error + 'static,
{
	/// The target is not a node that can host a root.
	#[error("target container {0} is not a valid host container")]
	InvalidContainer(NodeId),
	/// The parent scope of a subtree render is not a live component instance.
	#[error("parent scope must be a mounted component instance")]
	InvalidParentScope,
	/// Host tree mutation failed while preparing the container.
	#[error(transparent)]
	Host(#[from] HostError),
	/// The reconciler failed while creating or updating the root.
	#[error(transparent)]
	Reconciler(E),
}

/// Errors raised while loading a [`MountConfig`](crate::MountConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The TOML document could not be parsed.
	#[error("invalid mount configuration: {0}")]
	Parse(#[from] toml::de::Error),
}
