//! Reinhardt Roots - legacy render-root lifecycle
//!
//! Binds host containers to render-tree roots and decides, for every call,
//! which root operation to perform.
//!
//! ## Architecture
//!
//! - [`probe`](reinhardt_host::probe): host capability checks (re-exported from `reinhardt-host`)
//! - [`hydration`]: structural detection of server-rendered markup
//! - [`factory`]: root creation, clearing stale children when not hydrating
//! - [`registry`]: container to root binding side table
//! - [`LegacyRoots`]: the mount / update / unmount orchestrator
//! - [`bridge`]: the [`Reconciler`] trait the orchestrator drives
//! - [`testing`]: a reference reconciler rendering plain text
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use reinhardt_host::HostTree;
//! use reinhardt_roots::LegacyRoots;
//! use reinhardt_roots::testing::TextReconciler;
//!
//! let tree = HostTree::new();
//! let container = tree.create_element("div");
//! let roots = LegacyRoots::new(tree.clone(), Rc::new(TextReconciler::new(tree.clone())));
//!
//! let instance = roots.render("Hello".to_string(), container, None).unwrap();
//! let host = roots.find_host_node(instance.as_ref()).unwrap();
//! assert_eq!(tree.text_content(host).as_deref(), Some("Hello"));
//!
//! assert!(roots.unmount_component_at_node(container).unwrap());
//! assert!(roots.root_binding(container).is_none());
//! ```

#![warn(missing_docs)]

pub mod binding;
pub mod bridge;
pub mod config;
pub mod error;
pub mod factory;
pub mod hydration;
pub mod legacy;
pub mod registry;
pub mod testing;

pub use binding::RootBinding;
pub use bridge::{Callback, Completion, PublicInstance, Reconciler, RootOptions};
pub use config::MountConfig;
pub use error::{ConfigError, MountError};
pub use legacy::{LegacyRoots, MountResult};
pub use registry::RootRegistry;

pub use reinhardt_host::probe;
