//! Lifecycle Orchestrator
//!
//! [`LegacyRoots`] decides, per call, whether a container gets a new root,
//! an update on its existing root, a hydration attach, or a teardown.
//!
//! ## State machine (per container)
//!
//! ```text
//!            render / hydrate                     render / hydrate
//! Unbound ─────────────────────▶ Bound/Fresh ◀───────────────────┐
//!    ▲     (marker or forced) ─▶ Bound/Hydrating ────────────────┘
//!    │                                 │
//!    └──── unmount: unbatched teardown, completion unbinds ◀─────┘
//! ```
//!
//! The first render of a container runs inside
//! [`Reconciler::unbatched_updates`] so it is never coalesced with other
//! pending work. Later renders use the ordinary batched path, which means
//! the value they return may lag behind the content just passed in; the
//! completion callback is the authoritative signal.
//!
//! A container whose first render fails is released again: it ends up
//! unbound and unmarked, so the next render starts from scratch.

use std::rc::Rc;

use reinhardt_host::{HostTree, NodeId, probe};
use tracing::{debug, warn};

use crate::binding::RootBinding;
use crate::bridge::{Callback, Completion, PublicInstance, Reconciler};
use crate::config::MountConfig;
use crate::error::MountError;
use crate::factory;
use crate::hydration;
use crate::registry::RootRegistry;

/// Result of a render call: the root's public instance, if any.
pub type MountResult<R> = Result<
	Option<PublicInstance<<R as Reconciler>::Instance>>,
	MountError<<R as Reconciler>::Error>,
>;

/// Root lifecycle over one host tree and one reconciler.
pub struct LegacyRoots<R: Reconciler> {
	tree: HostTree,
	reconciler: Rc<R>,
	registry: Rc<RootRegistry<R::InternalRoot>>,
	config: MountConfig,
}

impl<R: Reconciler> LegacyRoots<R> {
	/// Creates a lifecycle with the default [`MountConfig`].
	pub fn new(tree: HostTree, reconciler: Rc<R>) -> Self {
		Self::with_config(tree, reconciler, MountConfig::default())
	}

	/// Creates a lifecycle with an explicit configuration.
	pub fn with_config(tree: HostTree, reconciler: Rc<R>, config: MountConfig) -> Self {
		let registry = Rc::new(RootRegistry::new(tree.clone()));
		Self {
			tree,
			reconciler,
			registry,
			config,
		}
	}

	/// Host tree the roots attach to.
	pub fn tree(&self) -> &HostTree {
		&self.tree
	}

	/// Reconciler driving the roots.
	pub fn reconciler(&self) -> &Rc<R> {
		&self.reconciler
	}

	/// Active configuration.
	pub fn config(&self) -> &MountConfig {
		&self.config
	}

	/// Returns the binding currently attached to `container`.
	pub fn root_binding(&self, container: NodeId) -> Option<RootBinding<R::InternalRoot>> {
		self.registry.lookup(container)
	}

	/// Number of containers with a live root.
	pub fn bound_count(&self) -> usize {
		self.registry.len()
	}

	/// Renders `content` into `container`, creating the root on first use.
	///
	/// Server-rendered markup carrying the root marker is hydrated even
	/// though hydration was not requested.
	///
	/// # Errors
	///
	/// [`MountError::InvalidContainer`] when `container` cannot host a root.
	/// Reconciler failures propagate unchanged.
	pub fn render(
		&self,
		content: R::Content,
		container: NodeId,
		callback: Option<Callback<R::Instance>>,
	) -> MountResult<R> {
		self.ensure_valid_container(container)?;
		if self.config.diagnostics() {
			self.warn_on_top_level_misuse(container, "render");
		}
		self.dispatch(None, Some(content), container, false, callback)
	}

	/// Renders `content` into `container`, attaching to its existing markup
	/// when the root does not exist yet.
	///
	/// On a container that already has a root this behaves like
	/// [`render`](Self::render); the root keeps its original mode.
	///
	/// # Errors
	///
	/// Same as [`render`](Self::render).
	pub fn hydrate(
		&self,
		content: R::Content,
		container: NodeId,
		callback: Option<Callback<R::Instance>>,
	) -> MountResult<R> {
		self.ensure_valid_container(container)?;
		if self.config.diagnostics() {
			self.warn_on_top_level_misuse(container, "hydrate");
		}
		self.dispatch(None, Some(content), container, true, callback)
	}

	/// Renders `content` into `container` nested under `parent`'s context.
	///
	/// # Errors
	///
	/// [`MountError::InvalidParentScope`] unless `parent` is a live instance,
	/// then the same conditions as [`render`](Self::render).
	pub fn render_subtree_into_container(
		&self,
		parent: &R::Instance,
		content: R::Content,
		container: NodeId,
		callback: Option<Callback<R::Instance>>,
	) -> MountResult<R> {
		if !self.reconciler.is_instance(parent) {
			return Err(MountError::InvalidParentScope);
		}
		self.ensure_valid_container(container)?;
		if self.config.diagnostics() {
			self.warn_on_top_level_misuse(container, "render_subtree_into_container");
		}
		self.dispatch(Some(parent), Some(content), container, false, callback)
	}

	/// Tears down the root attached to `container`.
	///
	/// Returns `Ok(false)` without touching any state when the container has
	/// no root.
	///
	/// # Errors
	///
	/// [`MountError::InvalidContainer`] when `container` cannot host a root.
	pub fn unmount_component_at_node(
		&self,
		container: NodeId,
	) -> Result<bool, MountError<R::Error>> {
		self.ensure_valid_container(container)?;

		if self.registry.lookup(container).is_none() {
			if self.config.diagnostics() {
				self.warn_on_unbound_unmount(container);
			}
			debug!(container = %container, "nothing to unmount");
			return Ok(false);
		}

		let registry = Rc::clone(&self.registry);
		let on_detached: Callback<R::Instance> = Box::new(move |_| {
			registry.unbind(container);
		});
		self.reconciler
			.unbatched_updates(|| self.dispatch(None, None, container, false, Some(on_detached)))?;
		debug!(container = %container, "unmounted root");
		Ok(true)
	}

	/// Resolves the host node behind a public instance.
	///
	/// Host nodes are returned unchanged; component instances resolve to the
	/// nearest host node they produced, or `None` once unmounted.
	pub fn find_host_node(&self, target: Option<&PublicInstance<R::Instance>>) -> Option<NodeId> {
		match target? {
			PublicInstance::Host(node) => Some(*node),
			PublicInstance::Component(instance) => self.reconciler.find_host_instance(instance),
		}
	}

	fn ensure_valid_container(&self, container: NodeId) -> Result<(), MountError<R::Error>> {
		if probe::is_valid_container(&self.tree, container, self.config.mount_point_comment()) {
			Ok(())
		} else {
			Err(MountError::InvalidContainer(container))
		}
	}

	fn dispatch(
		&self,
		parent: Option<&R::Instance>,
		content: Option<R::Content>,
		container: NodeId,
		force_hydrate: bool,
		callback: Option<Callback<R::Instance>>,
	) -> MountResult<R> {
		let binding = match self.registry.lookup(container) {
			Some(binding) => {
				debug!(container = %container, teardown = content.is_none(), "updating root");
				let completion = self.wrap_callback(&binding, callback);
				self.reconciler
					.update_container(content, binding.internal_root(), parent, completion)
					.map_err(MountError::Reconciler)?;
				binding
			}
			None => {
				let should_hydrate =
					hydration::should_hydrate(&self.tree, container, force_hydrate, &self.config);
				let binding = factory::create_root(
					&self.tree,
					&*self.reconciler,
					container,
					should_hydrate,
					&self.config,
				)?;
				self.registry.bind(binding.clone());
				debug!(container = %container, hydrate = should_hydrate, "mounting root");

				let completion = self.wrap_callback(&binding, callback);
				let mounted = self.reconciler.unbatched_updates(|| {
					self.reconciler.update_container(
						content,
						binding.internal_root(),
						parent,
						completion,
					)
				});
				if let Err(err) = mounted {
					// A root whose first render failed is never left bound.
					self.registry.unbind(container);
					debug!(container = %container, "initial render failed, root released");
					return Err(MountError::Reconciler(err));
				}
				binding
			}
		};
		Ok(self.reconciler.public_root_instance(binding.internal_root()))
	}

	// The public instance is read when the completion fires, after commit.
	fn wrap_callback(
		&self,
		binding: &RootBinding<R::InternalRoot>,
		callback: Option<Callback<R::Instance>>,
	) -> Option<Completion> {
		let callback = callback?;
		let reconciler = Rc::clone(&self.reconciler);
		let root = binding.internal_root().clone();
		Some(Box::new(move || {
			callback(reconciler.public_root_instance(&root));
		}))
	}

	fn warn_on_top_level_misuse(&self, container: NodeId, method: &str) {
		match self.registry.lookup(container) {
			Some(binding) => {
				let host = self.find_host_node(
					self.reconciler
						.public_root_instance(binding.internal_root())
						.as_ref(),
				);
				let render_parent = if probe::classify(&self.tree, container).is_comment {
					self.tree.parent(container)
				} else {
					Some(container)
				};
				if let Some(host) = host {
					if self.tree.parent(host) != render_parent {
						warn!(
							container = %container,
							"{method}(): the content of this container was changed outside the root; update it through {method}() instead"
						);
					}
				}
			}
			None => {
				if self.tree.is_marked_as_root(container) {
					warn!(
						container = %container,
						"{method}(): container is already attached to a different kind of root"
					);
				} else if probe::hosts_foreign_content(&self.tree, container) {
					warn!(
						container = %container,
						"{method}(): replacing runtime-rendered children with a new root; update the existing children instead"
					);
				}
			}
		}
		if self.tree.tag_name(container).as_deref() == Some("body") {
			warn!(
				container = %container,
				"{method}(): rendering directly into <body> is discouraged; render into a dedicated container element"
			);
		}
	}

	fn warn_on_unbound_unmount(&self, container: NodeId) {
		if self.tree.is_marked_as_root(container) {
			warn!(
				container = %container,
				"unmount_component_at_node(): container is attached to a different kind of root"
			);
			return;
		}
		if !probe::hosts_foreign_content(&self.tree, container) {
			return;
		}
		let parent_is_root = self
			.tree
			.parent(container)
			.is_some_and(|parent| self.registry.lookup(parent).is_some());
		if parent_is_root {
			warn!(
				container = %container,
				"unmount_component_at_node(): node was rendered by a root and is not a top-level container; pass the root's container instead"
			);
		} else {
			warn!(
				container = %container,
				"unmount_component_at_node(): node was rendered by this runtime and is not a top-level container; have its parent re-render without it"
			);
		}
	}
}

impl<R: Reconciler> core::fmt::Debug for LegacyRoots<R> {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("LegacyRoots")
			.field("bound", &self.registry.len())
			.field("config", &self.config)
			.finish()
	}
}
