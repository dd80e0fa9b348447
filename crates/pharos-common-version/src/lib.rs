// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared build and version information for Pharos client SDKs.
//!
//! This crate provides a single source of truth for the crate version and
//! target platform. The telemetry SDK uses it to default the release of
//! captured events and to tag events with the platform they came from.

/// Platform string in `{os}-{arch}` format, e.g. "linux-x86_64".
///
/// Derived at compile time from target configuration.
pub const PLATFORM: &str = env!("PHAROS_PLATFORM");

/// Core build information shared by Pharos SDKs.
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
	pub version: &'static str,
	pub platform: &'static str,
}

impl BuildInfo {
	/// Get the current build information (compile-time constants).
	pub const fn current() -> Self {
		Self {
			version: env!("CARGO_PKG_VERSION"),
			platform: PLATFORM,
		}
	}
}

/// Get the Pharos SDK version string.
pub const fn pharos_version() -> &'static str {
	env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn build_info_has_version() {
		let info = BuildInfo::current();
		assert!(!info.version.is_empty());
	}

	#[test]
	fn platform_format_is_valid() {
		assert!(PLATFORM.contains('-'));
		let parts: Vec<&str> = PLATFORM.split('-').collect();
		assert_eq!(parts.len(), 2);
	}

	#[test]
	fn pharos_version_matches_build_info() {
		assert_eq!(pharos_version(), BuildInfo::current().version);
	}
}
