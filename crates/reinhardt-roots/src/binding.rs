//! Root bindings.

use core::fmt;
use std::rc::Rc;

use reinhardt_host::NodeId;

struct BindingInner<T> {
	container: NodeId,
	internal_root: T,
	hydrate: bool,
}

/// Handle associating a host container with one internal root.
///
/// Clones share the same binding; use [`RootBinding::ptr_eq`] to compare
/// identity. The hydrate flag is fixed when the binding is created.
pub struct RootBinding<T> {
	inner: Rc<BindingInner<T>>,
}

impl<T> RootBinding<T> {
	pub(crate) fn new(container: NodeId, internal_root: T, hydrate: bool) -> Self {
		Self {
			inner: Rc::new(BindingInner {
				container,
				internal_root,
				hydrate,
			}),
		}
	}

	/// Container this binding is attached to.
	pub fn container(&self) -> NodeId {
		self.inner.container
	}

	/// Reconciler-owned root state.
	pub fn internal_root(&self) -> &T {
		&self.inner.internal_root
	}

	/// Whether the root was created in hydrate mode.
	pub fn is_hydrate(&self) -> bool {
		self.inner.hydrate
	}

	/// Whether both handles refer to the same binding.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl<T> Clone for RootBinding<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for RootBinding<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RootBinding")
			.field("container", &self.inner.container)
			.field("internal_root", &self.inner.internal_root)
			.field("hydrate", &self.inner.hydrate)
			.finish()
	}
}
