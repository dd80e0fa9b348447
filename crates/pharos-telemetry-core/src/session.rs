// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session types for app session tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TelemetryError;

/// Unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
	#[must_use]
	pub fn new() -> Self {
		Self(Uuid::now_v7())
	}

	#[must_use]
	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}

impl Default for SessionId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for SessionId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for SessionId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// Where a session is in its lifecycle.
///
/// Transitions only move forward: `Active` <-> `Backgrounded`, then
/// `Closed`. A closed session never reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
	/// App is in the foreground.
	Active,
	/// App left the foreground; may still come back.
	Backgrounded,
	/// Session ended. Terminal.
	Closed,
}

impl std::fmt::Display for SessionState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SessionState::Active => write!(f, "active"),
			SessionState::Backgrounded => write!(f, "backgrounded"),
			SessionState::Closed => write!(f, "closed"),
		}
	}
}

impl std::str::FromStr for SessionState {
	type Err = TelemetryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"active" => Ok(SessionState::Active),
			"backgrounded" => Ok(SessionState::Backgrounded),
			"closed" => Ok(SessionState::Closed),
			_ => Err(TelemetryError::InvalidSessionState(s.to_string())),
		}
	}
}

/// How a closed session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
	/// Session ended normally
	Exited,
	/// Session had handled errors but completed normally
	Errored,
	/// Session had at least one unhandled error
	Crashed,
	/// Session ended unexpectedly (no end signal received)
	Abnormal,
}

impl std::fmt::Display for SessionStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SessionStatus::Exited => write!(f, "exited"),
			SessionStatus::Errored => write!(f, "errored"),
			SessionStatus::Crashed => write!(f, "crashed"),
			SessionStatus::Abnormal => write!(f, "abnormal"),
		}
	}
}

impl std::str::FromStr for SessionStatus {
	type Err = TelemetryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"exited" => Ok(SessionStatus::Exited),
			"errored" => Ok(SessionStatus::Errored),
			"crashed" => Ok(SessionStatus::Crashed),
			"abnormal" => Ok(SessionStatus::Abnormal),
			_ => Err(TelemetryError::InvalidSessionStatus(s.to_string())),
		}
	}
}

/// A single user engagement period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
	pub id: SessionId,
	/// Anonymous/device identifier
	pub distinct_id: Option<String>,

	pub state: SessionState,
	/// Set when the session closes.
	pub status: Option<SessionStatus>,

	/// Release version
	pub release: Option<String>,
	/// Environment (production, staging, etc.)
	pub environment: String,

	/// Handled errors during session
	pub error_count: u32,
	/// Unhandled errors (crashes)
	pub crash_count: u32,

	pub started_at: DateTime<Utc>,
	/// Last time the session was seen in the foreground.
	pub last_active_at: DateTime<Utc>,
	pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
	/// Opens an active session starting now.
	pub fn start(
		distinct_id: Option<String>,
		release: Option<String>,
		environment: impl Into<String>,
	) -> Self {
		let now = Utc::now();
		Self {
			id: SessionId::new(),
			distinct_id,
			state: SessionState::Active,
			status: None,
			release,
			environment: environment.into(),
			error_count: 0,
			crash_count: 0,
			started_at: now,
			last_active_at: now,
			ended_at: None,
		}
	}

	/// Records foreground activity at `now`.
	pub fn touch(&mut self, now: DateTime<Utc>) {
		self.last_active_at = now;
	}

	/// Determine the final status of this session.
	#[must_use]
	pub fn determine_status(&self) -> SessionStatus {
		if self.crash_count > 0 {
			SessionStatus::Crashed
		} else if self.error_count > 0 {
			SessionStatus::Errored
		} else {
			SessionStatus::Exited
		}
	}

	/// Closes the session at `now` with the given status. Terminal.
	pub fn close(&mut self, now: DateTime<Utc>, status: SessionStatus) {
		self.state = SessionState::Closed;
		self.status = Some(status);
		self.ended_at = Some(now);
	}

	pub fn is_closed(&self) -> bool {
		self.state == SessionState::Closed
	}

	/// Milliseconds from start to end, once ended.
	pub fn duration_ms(&self) -> Option<u64> {
		self.ended_at.map(|ended| {
			(ended - self.started_at)
				.num_milliseconds()
				.try_into()
				.unwrap_or(0)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn session_id_roundtrip(uuid_bytes in any::<[u8; 16]>()) {
			let id = SessionId(Uuid::from_bytes(uuid_bytes));
			let parsed: SessionId = id.to_string().parse().unwrap();
			prop_assert_eq!(id, parsed);
		}

		#[test]
		fn session_state_roundtrip(state in prop_oneof![
			Just(SessionState::Active),
			Just(SessionState::Backgrounded),
			Just(SessionState::Closed),
		]) {
			let s = state.to_string();
			let parsed: SessionState = s.parse().unwrap();
			prop_assert_eq!(state, parsed);
		}

		#[test]
		fn session_status_roundtrip(status in prop_oneof![
			Just(SessionStatus::Exited),
			Just(SessionStatus::Errored),
			Just(SessionStatus::Crashed),
			Just(SessionStatus::Abnormal),
		]) {
			let s = status.to_string();
			let parsed: SessionStatus = s.parse().unwrap();
			prop_assert_eq!(status, parsed);
		}
	}

	#[test]
	fn test_start_is_active() {
		let session = Session::start(Some("device-1".to_string()), None, "production");
		assert_eq!(session.state, SessionState::Active);
		assert!(session.status.is_none());
		assert!(session.ended_at.is_none());
	}

	#[test]
	fn test_determine_status_prefers_crashes() {
		let mut session = Session::start(None, None, "production");
		assert_eq!(session.determine_status(), SessionStatus::Exited);

		session.error_count = 2;
		assert_eq!(session.determine_status(), SessionStatus::Errored);

		session.crash_count = 1;
		assert_eq!(session.determine_status(), SessionStatus::Crashed);
	}

	#[test]
	fn test_close_is_terminal_bookkeeping() {
		let mut session = Session::start(None, None, "staging");
		let now = Utc::now();
		session.close(now, SessionStatus::Exited);

		assert!(session.is_closed());
		assert_eq!(session.status, Some(SessionStatus::Exited));
		assert_eq!(session.ended_at, Some(now));
		assert!(session.duration_ms().is_some());
	}

	#[test]
	fn test_duration_requires_end() {
		let mut session = Session::start(None, None, "production");
		assert!(session.duration_ms().is_none());

		session.close(session.started_at + chrono::Duration::seconds(5), SessionStatus::Exited);
		assert_eq!(session.duration_ms(), Some(5_000));
	}

	#[test]
	fn test_unknown_state_is_rejected() {
		let err = "paused".parse::<SessionState>().unwrap_err();
		assert!(matches!(err, TelemetryError::InvalidSessionState(_)));
	}
}
