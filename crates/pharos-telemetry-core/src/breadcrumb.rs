// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Breadcrumb types recording what happened before an event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::level::Level;

/// A single breadcrumb on the trail leading up to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
	pub timestamp: DateTime<Utc>,
	/// "http", "navigation", "ui", "console"
	pub category: Option<String>,
	pub message: Option<String>,
	pub level: Level,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<serde_json::Value>,
}

impl Breadcrumb {
	/// Creates an info-level breadcrumb with the given message.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: Some(message.into()),
			..Default::default()
		}
	}

	pub fn category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());
		self
	}

	pub fn level(mut self, level: Level) -> Self {
		self.level = level;
		self
	}

	pub fn data(mut self, data: serde_json::Value) -> Self {
		self.data = Some(data);
		self
	}
}

impl Default for Breadcrumb {
	fn default() -> Self {
		Self {
			timestamp: Utc::now(),
			category: None,
			message: None,
			level: Level::Info,
			data: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_builder_sets_fields() {
		let crumb = Breadcrumb::new("Clicked on the screen")
			.category("ui.click")
			.level(Level::Debug)
			.data(serde_json::json!({"x": 12, "y": 40}));

		assert_eq!(crumb.message.as_deref(), Some("Clicked on the screen"));
		assert_eq!(crumb.category.as_deref(), Some("ui.click"));
		assert_eq!(crumb.level, Level::Debug);
		assert_eq!(crumb.data.unwrap()["x"], 12);
	}

	#[test]
	fn test_default_level_is_info() {
		assert_eq!(Breadcrumb::new("hello").level, Level::Info);
	}

	#[test]
	fn test_serializes_snake_case_level() {
		let crumb = Breadcrumb::new("boom").level(Level::Fatal);
		let json = serde_json::to_value(&crumb).unwrap();
		assert_eq!(json["level"], "fatal");
		assert!(json.get("data").is_none());
	}
}
