//! Reinhardt Host - DOM-like host tree for root mounting
//!
//! This crate models the externally owned host environment that render roots
//! attach to. It provides:
//!
//! - [`HostTree`]: an arena of document, element, text and comment nodes
//! - [`probe`]: pure classification of host nodes (container validity,
//!   root marker detection)
//! - Host-tree registration side tables: which containers are marked as
//!   roots, and which host nodes were produced by which component instance
//!
//! ## Example
//!
//! ```
//! use reinhardt_host::{HostTree, ROOT_ATTRIBUTE_NAME, probe};
//!
//! let tree = HostTree::new();
//! let container = tree.create_element("div");
//! let markup = tree.create_element("span");
//! tree.set_attribute(markup, ROOT_ATTRIBUTE_NAME, "").unwrap();
//! tree.append_child(container, markup).unwrap();
//!
//! assert!(probe::has_root_marker(&tree, container, ROOT_ATTRIBUTE_NAME));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod node;
pub mod probe;
pub mod tree;

pub use error::HostError;
pub use node::{InstanceKey, NodeId, NodeType};
pub use tree::HostTree;

/// Attribute placed on the first element of server-rendered root markup.
pub const ROOT_ATTRIBUTE_NAME: &str = "data-rh-root";

/// Comment value that turns a comment node into a valid mount point.
pub const MOUNT_POINT_COMMENT: &str = " rh-mount-point ";
