//! Root lifecycle module.
//!
//! This module provides access to reinhardt-roots:
//!
//! - **Mount / Update**: [`LegacyRoots::render`] creates a root on first use
//!   and updates it afterwards
//! - **Hydration**: [`LegacyRoots::hydrate`], plus automatic hydration of
//!   markup carrying the root marker
//! - **Teardown**: [`LegacyRoots::unmount_component_at_node`]
//! - **Bridge**: the [`Reconciler`] trait implemented by render engines

pub use reinhardt_roots::*;
