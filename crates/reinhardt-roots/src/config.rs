//! Mount configuration
//!
//! [`MountConfig`] carries the host conventions the lifecycle relies on:
//! which attribute marks server-rendered root markup, which comment value
//! turns a comment node into a mount point, and whether diagnostics are
//! emitted.
//!
//! # Examples
//!
//! ```
//! use reinhardt_roots::MountConfig;
//!
//! let config = MountConfig::from_toml_str(
//!     r#"
//!     root_attribute = "data-app-root"
//!     diagnostics = false
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.root_attribute(), "data-app-root");
//! assert!(!config.diagnostics());
//! ```

use reinhardt_host::{MOUNT_POINT_COMMENT, ROOT_ATTRIBUTE_NAME};
use serde::Deserialize;

use crate::error::ConfigError;

/// Host conventions and diagnostics switches for [`LegacyRoots`](crate::LegacyRoots).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MountConfig {
	root_attribute: String,
	mount_point_comment: String,
	diagnostics: bool,
}

impl Default for MountConfig {
	fn default() -> Self {
		Self {
			root_attribute: ROOT_ATTRIBUTE_NAME.to_string(),
			mount_point_comment: MOUNT_POINT_COMMENT.to_string(),
			diagnostics: true,
		}
	}
}

impl MountConfig {
	/// Parses a configuration from TOML. Missing keys keep their defaults.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(source)?)
	}

	/// Attribute that marks server-rendered root markup.
	pub fn root_attribute(&self) -> &str {
		&self.root_attribute
	}

	/// Comment value accepted as a mount point.
	pub fn mount_point_comment(&self) -> &str {
		&self.mount_point_comment
	}

	/// Whether diagnostic warnings are emitted.
	pub fn diagnostics(&self) -> bool {
		self.diagnostics
	}

	/// Sets the root marker attribute.
	pub fn with_root_attribute(mut self, attribute: impl Into<String>) -> Self {
		self.root_attribute = attribute.into();
		self
	}

	/// Sets the mount point comment value.
	pub fn with_mount_point_comment(mut self, comment: impl Into<String>) -> Self {
		self.mount_point_comment = comment.into();
		self
	}

	/// Enables or disables diagnostic warnings.
	pub fn with_diagnostics(mut self, enabled: bool) -> Self {
		self.diagnostics = enabled;
		self
	}
}
