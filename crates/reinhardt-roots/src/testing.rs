//! Reference reconciler
//!
//! [`TextReconciler`] renders a single text value per root into a
//! [`HostTree`]. It is small enough to reason about in tests while still
//! honouring the scheduling contract of [`Reconciler`]:
//!
//! | Context | `update_container` |
//! |---------|--------------------|
//! | no batch open | commits immediately |
//! | inside [`TextReconciler::batched_updates`] | queued, coalesced per root, flushed when the outermost batch exits |
//! | inside [`Reconciler::unbatched_updates`] | commits immediately, even inside a batch |
//!
//! Every update is recorded in an [`UpdateRecord`] log so tests can assert
//! which path a call took.
//!
//! Committing an update that is not deferred first drains anything still
//! queued for the same root, so each root observes its updates in issue
//! order. Once a root has been torn down, further commits to it are dropped.
//!
//! ## Hydration
//!
//! A root created in hydrate mode adopts the container's root element as the
//! host node of its first render instead of creating a new text node.
//!
//! ## Comment containers
//!
//! A comment mount point cannot hold children. Content rendered into it is
//! inserted into the comment's parent, directly before the comment.

use core::cell::{Cell, RefCell};
use core::fmt;
use std::collections::HashMap;

use reinhardt_host::{HostError, HostTree, InstanceKey, NodeId, NodeType, probe};

use crate::bridge::{Completion, PublicInstance, Reconciler, RootOptions};

/// Handle to a root owned by [`TextReconciler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RootId(u64);

/// Handle to a component instance owned by [`TextReconciler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl fmt::Display for InstanceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "instance-{}", self.0)
	}
}

/// Scheduling path an update was issued on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
	/// Issued inside `unbatched_updates`.
	Unbatched,
	/// Issued on the ordinary path.
	Batched,
}

/// One `update_container` call as observed by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecord {
	/// Target root.
	pub root: RootId,
	/// Content passed, `None` for teardown.
	pub content: Option<String>,
	/// Scheduling path.
	pub mode: UpdateMode,
	/// Whether the update was queued rather than committed on the spot.
	pub deferred: bool,
}

/// Errors raised by [`TextReconciler`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextReconcilerError {
	/// A host tree mutation failed during commit.
	#[error(transparent)]
	Host(#[from] HostError),
	/// The root handle is not known to this reconciler.
	#[error("unknown root {0:?}")]
	UnknownRoot(RootId),
	/// Injected failure, see [`TextReconciler::fail_next_create`].
	#[error("root creation rejected")]
	CreateRejected,
	/// Injected failure, see [`TextReconciler::fail_next_update`].
	#[error("root update rejected")]
	UpdateRejected,
	/// A comment mount point has no parent to render into.
	#[error("mount point comment {0} is detached")]
	DetachedMountPoint(NodeId),
}

#[derive(Debug)]
struct RootState {
	container: NodeId,
	hydrate: bool,
	instance: Option<InstanceId>,
	committed: Option<String>,
	parent_scope: Option<InstanceId>,
	torn_down: bool,
}

#[derive(Debug)]
struct InstanceState {
	root: RootId,
	host_node: NodeId,
}

#[derive(Debug, Default)]
struct State {
	roots: HashMap<RootId, RootState>,
	instances: HashMap<InstanceId, InstanceState>,
	next_root: u64,
	next_instance: u64,
}

struct PendingUpdate {
	root: RootId,
	content: Option<String>,
	parent: Option<InstanceId>,
	completion: Option<Completion>,
}

/// Single-text-node reconciler over a [`HostTree`].
pub struct TextReconciler {
	tree: HostTree,
	state: RefCell<State>,
	batch_depth: Cell<usize>,
	unbatched_depth: Cell<usize>,
	pending: RefCell<Vec<PendingUpdate>>,
	log: RefCell<Vec<UpdateRecord>>,
	fail_next_create: Cell<bool>,
	fail_next_update: Cell<bool>,
}

impl TextReconciler {
	/// Creates a reconciler rendering into `tree`.
	pub fn new(tree: HostTree) -> Self {
		Self {
			tree,
			state: RefCell::new(State::default()),
			batch_depth: Cell::new(0),
			unbatched_depth: Cell::new(0),
			pending: RefCell::new(Vec::new()),
			log: RefCell::new(Vec::new()),
			fail_next_create: Cell::new(false),
			fail_next_update: Cell::new(false),
		}
	}

	/// Runs `f` with updates deferred until the outermost batch exits.
	pub fn batched_updates<T, F>(&self, f: F) -> Result<T, TextReconcilerError>
	where
		F: FnOnce() -> T,
	{
		self.batch_depth.set(self.batch_depth.get() + 1);
		let out = f();
		self.batch_depth.set(self.batch_depth.get() - 1);
		if self.batch_depth.get() == 0 && self.unbatched_depth.get() == 0 {
			self.flush()?;
		}
		Ok(out)
	}

	/// Commits every queued update.
	///
	/// Updates targeting the same root coalesce: the last content wins and
	/// every completion fires once, in issue order, after all commits.
	pub fn flush(&self) -> Result<(), TextReconcilerError> {
		let queued = core::mem::take(&mut *self.pending.borrow_mut());
		if queued.is_empty() {
			return Ok(());
		}

		let mut order: Vec<RootId> = Vec::new();
		let mut latest: HashMap<RootId, (Option<String>, Option<InstanceId>)> = HashMap::new();
		let mut completions = Vec::new();
		for update in queued {
			if !latest.contains_key(&update.root) {
				order.push(update.root);
			}
			latest.insert(update.root, (update.content, update.parent));
			if let Some(completion) = update.completion {
				completions.push(completion);
			}
		}

		for root in order {
			if let Some((content, parent)) = latest.remove(&root) {
				self.commit(root, content, parent)?;
			}
		}
		for completion in completions {
			completion();
		}
		Ok(())
	}

	/// Makes the next [`Reconciler::create_container`] call fail.
	pub fn fail_next_create(&self) {
		self.fail_next_create.set(true);
	}

	/// Makes the next [`Reconciler::update_container`] call fail before it
	/// is logged or queued.
	pub fn fail_next_update(&self) {
		self.fail_next_update.set(true);
	}

	/// Whether a root has committed its teardown.
	pub fn is_torn_down(&self, root: RootId) -> Option<bool> {
		self.state.borrow().roots.get(&root).map(|r| r.torn_down)
	}

	/// Number of queued updates.
	pub fn pending_count(&self) -> usize {
		self.pending.borrow().len()
	}

	/// Every update issued so far, oldest first.
	pub fn update_log(&self) -> Vec<UpdateRecord> {
		self.log.borrow().clone()
	}

	/// Number of roots created so far, including torn-down ones.
	pub fn root_count(&self) -> usize {
		self.state.borrow().roots.len()
	}

	/// Whether a root was created in hydrate mode.
	pub fn is_hydrating(&self, root: RootId) -> Option<bool> {
		self.state.borrow().roots.get(&root).map(|r| r.hydrate)
	}

	/// Last committed content of a root.
	pub fn committed_content(&self, root: RootId) -> Option<String> {
		self.state
			.borrow()
			.roots
			.get(&root)
			.and_then(|r| r.committed.clone())
	}

	/// Parent scope the root's content was last committed under.
	pub fn parent_scope(&self, root: RootId) -> Option<InstanceId> {
		self.state
			.borrow()
			.roots
			.get(&root)
			.and_then(|r| r.parent_scope)
	}

	/// Root that owns an instance.
	pub fn instance_root(&self, instance: InstanceId) -> Option<RootId> {
		self.state
			.borrow()
			.instances
			.get(&instance)
			.map(|i| i.root)
	}

	fn commit(
		&self,
		root: RootId,
		content: Option<String>,
		parent: Option<InstanceId>,
	) -> Result<(), TextReconcilerError> {
		let (container, hydrate, instance) = {
			let state = self.state.borrow();
			let root_state = state
				.roots
				.get(&root)
				.ok_or(TextReconcilerError::UnknownRoot(root))?;
			if root_state.torn_down {
				return Ok(());
			}
			(root_state.container, root_state.hydrate, root_state.instance)
		};

		let instance = match (&content, instance) {
			(Some(text), Some(instance)) => {
				if let Some(host) = self.find_host_instance(&instance) {
					self.tree.set_text_content(host, text)?;
				}
				Some(instance)
			}
			(Some(text), None) => {
				let adopted = if hydrate {
					probe::root_element(&self.tree, container)
				} else {
					None
				};
				let host = match adopted {
					Some(existing) => {
						if self.tree.text_content(existing).as_deref() != Some(text.as_str()) {
							self.tree.set_text_content(existing, text)?;
						}
						existing
					}
					None => {
						let node = self.tree.create_text(text.clone());
						self.insert_into(container, node)?;
						node
					}
				};
				let mut state = self.state.borrow_mut();
				let id = InstanceId(state.next_instance);
				state.next_instance += 1;
				state.instances.insert(
					id,
					InstanceState {
						root,
						host_node: host,
					},
				);
				self.tree.precache_instance(host, InstanceKey(id.0));
				Some(id)
			}
			(None, Some(instance)) => {
				let removed = self.state.borrow_mut().instances.remove(&instance);
				if let Some(removed) = removed {
					self.tree.detach_instance(removed.host_node);
					let host_parent = self
						.tree
						.parent(removed.host_node)
						.filter(|parent| self.render_parent(container) == Some(*parent));
					if let Some(parent) = host_parent {
						self.tree.remove_child(parent, removed.host_node)?;
					}
				}
				None
			}
			(None, None) => None,
		};

		let mut state = self.state.borrow_mut();
		if let Some(root_state) = state.roots.get_mut(&root) {
			root_state.torn_down = content.is_none();
			root_state.instance = instance;
			root_state.committed = content;
			root_state.parent_scope = parent;
		}
		Ok(())
	}

	// Node that rendered content of `container` is attached to.
	fn render_parent(&self, container: NodeId) -> Option<NodeId> {
		if self.tree.node_type(container) == Some(NodeType::Comment) {
			self.tree.parent(container)
		} else {
			Some(container)
		}
	}

	fn insert_into(&self, container: NodeId, node: NodeId) -> Result<(), TextReconcilerError> {
		if self.tree.node_type(container) == Some(NodeType::Comment) {
			let parent = self
				.tree
				.parent(container)
				.ok_or(TextReconcilerError::DetachedMountPoint(container))?;
			self.tree.insert_before(parent, node, Some(container))?;
		} else {
			self.tree.append_child(container, node)?;
		}
		Ok(())
	}

	// Commits everything still queued for `root`, coalesced, then fires the
	// queued completions.
	fn drain_root(&self, root: RootId) -> Result<(), TextReconcilerError> {
		let queued: Vec<PendingUpdate> = {
			let mut pending = self.pending.borrow_mut();
			let (mine, rest): (Vec<_>, Vec<_>) = core::mem::take(&mut *pending)
				.into_iter()
				.partition(|update| update.root == root);
			*pending = rest;
			mine
		};
		let mut completions = Vec::new();
		let mut latest = None;
		for update in queued {
			latest = Some((update.content, update.parent));
			if let Some(completion) = update.completion {
				completions.push(completion);
			}
		}
		if let Some((content, parent)) = latest {
			self.commit(root, content, parent)?;
		}
		for completion in completions {
			completion();
		}
		Ok(())
	}
}

impl fmt::Debug for TextReconciler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TextReconciler")
			.field("state", &self.state)
			.field("batch_depth", &self.batch_depth.get())
			.field("unbatched_depth", &self.unbatched_depth.get())
			.field("pending", &self.pending.borrow().len())
			.finish()
	}
}

impl Reconciler for TextReconciler {
	type Content = String;
	type InternalRoot = RootId;
	type Instance = InstanceId;
	type Error = TextReconcilerError;

	fn create_container(
		&self,
		container: NodeId,
		options: RootOptions,
	) -> Result<RootId, TextReconcilerError> {
		if self.fail_next_create.replace(false) {
			return Err(TextReconcilerError::CreateRejected);
		}
		let mut state = self.state.borrow_mut();
		let id = RootId(state.next_root);
		state.next_root += 1;
		state.roots.insert(
			id,
			RootState {
				container,
				hydrate: options.hydrate,
				instance: None,
				committed: None,
				parent_scope: None,
				torn_down: false,
			},
		);
		Ok(id)
	}

	fn update_container(
		&self,
		content: Option<String>,
		root: &RootId,
		parent: Option<&InstanceId>,
		completion: Option<Completion>,
	) -> Result<(), TextReconcilerError> {
		if !self.state.borrow().roots.contains_key(root) {
			return Err(TextReconcilerError::UnknownRoot(*root));
		}
		if self.fail_next_update.replace(false) {
			return Err(TextReconcilerError::UpdateRejected);
		}

		let unbatched = self.unbatched_depth.get() > 0;
		let deferred = !unbatched && self.batch_depth.get() > 0;
		self.log.borrow_mut().push(UpdateRecord {
			root: *root,
			content: content.clone(),
			mode: if unbatched {
				UpdateMode::Unbatched
			} else {
				UpdateMode::Batched
			},
			deferred,
		});

		if deferred {
			self.pending.borrow_mut().push(PendingUpdate {
				root: *root,
				content,
				parent: parent.copied(),
				completion,
			});
			return Ok(());
		}

		self.drain_root(*root)?;
		self.commit(*root, content, parent.copied())?;
		if let Some(completion) = completion {
			completion();
		}
		Ok(())
	}

	fn unbatched_updates<T, F>(&self, f: F) -> T
	where
		F: FnOnce() -> T,
	{
		self.unbatched_depth.set(self.unbatched_depth.get() + 1);
		let out = f();
		self.unbatched_depth.set(self.unbatched_depth.get() - 1);
		out
	}

	fn public_root_instance(&self, root: &RootId) -> Option<PublicInstance<InstanceId>> {
		self.state
			.borrow()
			.roots
			.get(root)
			.and_then(|r| r.instance)
			.map(PublicInstance::Component)
	}

	fn find_host_instance(&self, instance: &InstanceId) -> Option<NodeId> {
		self.state
			.borrow()
			.instances
			.get(instance)
			.map(|i| i.host_node)
	}

	fn is_instance(&self, candidate: &InstanceId) -> bool {
		self.state.borrow().instances.contains_key(candidate)
	}
}
