//! # Reinhardt Mount
//!
//! Legacy render-root mounting: binds an externally owned host container to a
//! render tree and decides, for each call, whether to create a root, update
//! it, hydrate pre-rendered markup, or tear it down.
//!
//! ## Feature Flags
//!
//! - `roots` (default) - Root lifecycle orchestration ([`roots`])
//!
//! The host tree ([`host`]) is always available.
//!
//! ## Example
//!
//! ```rust
//! # #[cfg(feature = "roots")]
//! # {
//! use std::rc::Rc;
//! use reinhardt_mount::host::HostTree;
//! use reinhardt_mount::roots::LegacyRoots;
//! use reinhardt_mount::roots::testing::TextReconciler;
//!
//! let tree = HostTree::new();
//! let app = tree.create_element("div");
//! let roots = LegacyRoots::new(tree.clone(), Rc::new(TextReconciler::new(tree.clone())));
//!
//! roots.render("Hello".to_string(), app, None).unwrap();
//! roots.render("World".to_string(), app, None).unwrap();
//! assert_eq!(tree.text_content(app).as_deref(), Some("World"));
//! # }
//! ```

pub mod host;
#[cfg(feature = "roots")]
pub mod roots;
