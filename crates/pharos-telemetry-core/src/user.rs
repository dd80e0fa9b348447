// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The user associated with captured events.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity of the person using the application.
///
/// The well-known fields are optional; anything else the caller attaches
/// rides along in `extra` and serializes at the top level of the user
/// object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	/// IP address (sensitive - not displayed by default)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ip_address: Option<String>,
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

impl User {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	pub fn email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());
		self
	}

	pub fn username(mut self, username: impl Into<String>) -> Self {
		self.username = Some(username.into());
		self
	}

	pub fn ip_address(mut self, ip_address: impl Into<String>) -> Self {
		self.ip_address = Some(ip_address.into());
		self
	}

	pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
		self.extra.insert(key.into(), value);
		self
	}
}
