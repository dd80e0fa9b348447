// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Severity levels shared by breadcrumbs and message events.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TelemetryError;

/// Severity of a breadcrumb or captured message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
	Debug,
	Info,
	Warning,
	Error,
	Fatal,
}

impl Level {
	/// Returns the string representation used on the wire.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Debug => "debug",
			Self::Info => "info",
			Self::Warning => "warning",
			Self::Error => "error",
			Self::Fatal => "fatal",
		}
	}
}

impl Default for Level {
	fn default() -> Self {
		Self::Info
	}
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl FromStr for Level {
	type Err = TelemetryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"debug" => Ok(Self::Debug),
			"info" => Ok(Self::Info),
			"warning" => Ok(Self::Warning),
			"error" => Ok(Self::Error),
			"fatal" => Ok(Self::Fatal),
			_ => Err(TelemetryError::InvalidLevel(s.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn level_roundtrip(level in prop_oneof![
			Just(Level::Debug),
			Just(Level::Info),
			Just(Level::Warning),
			Just(Level::Error),
			Just(Level::Fatal),
		]) {
			let s = level.to_string();
			let parsed: Level = s.parse().unwrap();
			prop_assert_eq!(level, parsed);
		}
	}

	#[test]
	fn test_default_is_info() {
		assert_eq!(Level::default(), Level::Info);
	}

	#[test]
	fn test_unknown_level_is_rejected() {
		assert!("verbose".parse::<Level>().is_err());
	}
}
