// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Captured telemetry events: messages, exceptions and boundary errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::breadcrumb::Breadcrumb;
use crate::error::TelemetryError;
use crate::level::Level;
use crate::user::User;

/// Unique identifier for a captured event.
///
/// Fresh per capture. The id is handed back to the caller before
/// delivery completes, so it identifies the capture attempt, not a
/// stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
	#[must_use]
	pub fn new() -> Self {
		Self(Uuid::now_v7())
	}

	#[must_use]
	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}

impl Default for EventId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for EventId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for EventId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// What kind of occurrence an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
	/// A log-style message with a severity level.
	Message,
	/// A handled error.
	Exception,
	/// An error caught by a rendering boundary.
	BoundaryError,
}

impl std::fmt::Display for EventKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			EventKind::Message => write!(f, "message"),
			EventKind::Exception => write!(f, "exception"),
			EventKind::BoundaryError => write!(f, "boundary_error"),
		}
	}
}

impl std::str::FromStr for EventKind {
	type Err = TelemetryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"message" => Ok(EventKind::Message),
			"exception" => Ok(EventKind::Exception),
			"boundary_error" => Ok(EventKind::BoundaryError),
			_ => Err(TelemetryError::InvalidEventKind(s.to_string())),
		}
	}
}

/// A single stack frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
	pub function: Option<String>,
	pub module: Option<String>,
	pub filename: Option<String>,
	pub lineno: Option<u32>,
	pub colno: Option<u32>,
	/// Application code, as opposed to std/runtime frames.
	pub in_app: bool,
}

/// Stack frames ordered outermost first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stacktrace {
	pub frames: Vec<Frame>,
}

/// Kind-specific body of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
	Message {
		message: String,
		level: Level,
	},
	Exception {
		exception_type: String,
		exception_value: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		stacktrace: Option<Stacktrace>,
	},
	BoundaryError {
		exception_type: String,
		exception_value: String,
		/// Rendering tree position, innermost first.
		component_stack: Vec<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		stacktrace: Option<Stacktrace>,
	},
}

impl EventPayload {
	pub fn kind(&self) -> EventKind {
		match self {
			EventPayload::Message { .. } => EventKind::Message,
			EventPayload::Exception { .. } => EventKind::Exception,
			EventPayload::BoundaryError { .. } => EventKind::BoundaryError,
		}
	}
}

/// A fully assembled telemetry event.
///
/// Carries an owned copy of every annotation that was on the scope at
/// capture time. Later scope mutations never show up here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
	pub id: EventId,
	pub timestamp: DateTime<Utc>,
	/// "rust"
	pub platform: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub release: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub dist: Option<String>,
	pub environment: String,
	#[serde(flatten)]
	pub payload: EventPayload,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user: Option<User>,
	pub tags: BTreeMap<String, String>,
	pub extra: BTreeMap<String, serde_json::Value>,
	pub contexts: BTreeMap<String, serde_json::Value>,
	pub breadcrumbs: Vec<Breadcrumb>,
}

impl Event {
	/// Creates an event with a fresh id and the current time.
	///
	/// Annotations start empty; the capture pipeline fills them from its
	/// scope snapshot.
	pub fn new(payload: EventPayload) -> Self {
		Self {
			id: EventId::new(),
			timestamp: Utc::now(),
			platform: "rust".to_string(),
			release: None,
			dist: None,
			environment: String::new(),
			payload,
			user: None,
			tags: BTreeMap::new(),
			extra: BTreeMap::new(),
			contexts: BTreeMap::new(),
			breadcrumbs: Vec::new(),
		}
	}

	pub fn kind(&self) -> EventKind {
		self.payload.kind()
	}
}
