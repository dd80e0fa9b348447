// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The scope: ambient annotations attached to every captured event.
//!
//! A scope accumulates user identity, tags, extras, named contexts and
//! release information over the life of a client. Captures read a clone
//! of the scope so later mutations never retroactively change an event
//! that was already captured.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::user::User;
use crate::value::AnnotationValue;

/// Ambient annotations applied to captured events.
///
/// Writes are last-write-wins per key. The plural setters merge into the
/// existing maps rather than replacing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
	pub user: Option<User>,
	pub tags: BTreeMap<String, String>,
	pub extra: BTreeMap<String, AnnotationValue>,
	pub contexts: BTreeMap<String, AnnotationValue>,
	pub release: Option<String>,
	pub dist: Option<String>,
}

impl Scope {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets or clears the current user.
	pub fn set_user(&mut self, user: Option<User>) {
		self.user = user;
	}

	pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.tags.insert(key.into(), value.into());
	}

	/// Merges the given tags into the scope, overwriting per key.
	pub fn set_tags<I, K, V>(&mut self, tags: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.tags
			.extend(tags.into_iter().map(|(k, v)| (k.into(), v.into())));
	}

	pub fn remove_tag(&mut self, key: &str) {
		self.tags.remove(key);
	}

	pub fn set_extra(&mut self, key: impl Into<String>, value: AnnotationValue) {
		self.extra.insert(key.into(), value);
	}

	/// Merges the given extras into the scope, overwriting per key.
	pub fn set_extras<I, K>(&mut self, extras: I)
	where
		I: IntoIterator<Item = (K, AnnotationValue)>,
		K: Into<String>,
	{
		self.extra
			.extend(extras.into_iter().map(|(k, v)| (k.into(), v)));
	}

	/// Sets a named context, or removes it when `value` is `None`.
	pub fn set_context(&mut self, name: impl Into<String>, value: Option<AnnotationValue>) {
		match value {
			Some(v) => {
				self.contexts.insert(name.into(), v);
			}
			None => {
				self.contexts.remove(&name.into());
			}
		}
	}

	pub fn set_release(&mut self, release: Option<String>) {
		self.release = release;
	}

	pub fn set_dist(&mut self, dist: Option<String>) {
		self.dist = dist;
	}

	/// Resets every annotation back to the empty state.
	pub fn clear(&mut self) {
		*self = Self::default();
	}

	/// Extras as plain JSON, failing on any entry that never serialized.
	///
	/// The error names the offending key so callers can find the bad
	/// `set_extra` call.
	pub fn validated_extra(&self) -> Result<BTreeMap<String, serde_json::Value>> {
		self.extra
			.iter()
			.map(|(k, v)| Ok((k.clone(), v.data(k)?.clone())))
			.collect()
	}

	/// Contexts as plain JSON, failing on any entry that never serialized.
	pub fn validated_contexts(&self) -> Result<BTreeMap<String, serde_json::Value>> {
		self.contexts
			.iter()
			.map(|(k, v)| Ok((k.clone(), v.data(k)?.clone())))
			.collect()
	}
}
