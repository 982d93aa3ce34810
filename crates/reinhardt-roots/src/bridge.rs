//! Reconciliation Bridge
//!
//! The render-tree engine is an external collaborator. [`Reconciler`] is the
//! whole surface the root lifecycle needs from it: create an internal root,
//! apply content to it, run work outside the batching boundary, and read
//! back public instances.

use reinhardt_host::NodeId;

/// One-shot completion signal handed to the reconciler.
///
/// The reconciler invokes it exactly once, after the update it was passed
/// with has committed.
pub type Completion = Box<dyn FnOnce()>;

/// Caller-supplied completion callback.
///
/// Receives the root's public instance as observed after the commit.
pub type Callback<I> = Box<dyn FnOnce(Option<PublicInstance<I>>)>;

/// Options used when creating an internal root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RootOptions {
	/// Reuse the container's existing children as host instances.
	pub hydrate: bool,
}

/// Externally observable handle to a root's top-level content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicInstance<I> {
	/// The top-level content is a host node.
	Host(NodeId),
	/// The top-level content is a component instance.
	Component(I),
}

/// Operations the root lifecycle invokes on the render-tree engine.
///
/// `update_container` with `None` content is the teardown sentinel: the
/// reconciler detaches everything rendered into the root.
pub trait Reconciler: 'static {
	/// Content applied to a root.
	type Content;
	/// Handle to the reconciler-owned root state.
	type InternalRoot: Clone + 'static;
	/// Component instance handle.
	type Instance: Clone + 'static;
	/// Failures raised while creating or updating roots.
	type Error: std::error::Error + 'static;

	/// Creates the internal root for a host container.
	fn create_container(
		&self,
		container: NodeId,
		options: RootOptions,
	) -> Result<Self::InternalRoot, Self::Error>;

	/// Applies `content` to a root, nested under `parent` when given.
	///
	/// Batched implementations may defer the work; `completion` then fires
	/// when the deferred work commits.
	fn update_container(
		&self,
		content: Option<Self::Content>,
		root: &Self::InternalRoot,
		parent: Option<&Self::Instance>,
		completion: Option<Completion>,
	) -> Result<(), Self::Error>;

	/// Runs `f` outside the batching boundary.
	///
	/// Updates issued inside `f` commit before this call returns. Must be
	/// reentrant.
	fn unbatched_updates<T, F>(&self, f: F) -> T
	where
		F: FnOnce() -> T;

	/// Returns the public instance of the root's committed content.
	fn public_root_instance(&self, root: &Self::InternalRoot)
	-> Option<PublicInstance<Self::Instance>>;

	/// Returns the nearest host node produced by an instance.
	fn find_host_instance(&self, instance: &Self::Instance) -> Option<NodeId>;

	/// Whether `candidate` is a live instance tracked by this reconciler.
	fn is_instance(&self, candidate: &Self::Instance) -> bool;
}
