//! Host tree module.
//!
//! DOM-like host nodes that render roots attach to, together with the
//! capability probes used to classify them.
//!
//! # Examples
//!
//! ```rust
//! use reinhardt_mount::host::{HostTree, MOUNT_POINT_COMMENT, probe};
//!
//! let tree = HostTree::new();
//! let marker = tree.create_comment(MOUNT_POINT_COMMENT);
//! assert!(probe::is_valid_container(&tree, marker, MOUNT_POINT_COMMENT));
//! ```

pub use reinhardt_host::*;
