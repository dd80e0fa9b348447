// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session tracking for release health.
//!
//! A session spans a period of foreground activity. Backgrounding does
//! not end it immediately; the session closes once an externally driven
//! [`SessionTracker::tick`] observes that the app stayed away past the
//! configured timeout. Closing is one-way, and a new `start` opens the
//! next session.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use pharos_telemetry_core::{Session, SessionId, SessionState};

/// Default inactivity timeout before a backgrounded session closes.
pub const DEFAULT_BACKGROUND_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for session tracking.
#[derive(Debug, Clone)]
pub struct SessionConfig {
	/// Whether sessions are tracked at all.
	pub enabled: bool,
	/// How long a backgrounded session survives without foreground
	/// activity.
	pub background_timeout: Duration,
	/// Identifies the user/device across sessions.
	pub distinct_id: Option<String>,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			background_timeout: DEFAULT_BACKGROUND_TIMEOUT,
			distinct_id: None,
		}
	}
}

/// Tracks the single current session.
///
/// No two sessions are ever live at once: `start` closes any live
/// predecessor before opening the next one. Methods that close or open
/// a session return owned snapshots for the caller to hand to delivery.
pub struct SessionTracker {
	config: SessionConfig,
	session: Mutex<Option<Session>>,
}

impl SessionTracker {
	pub fn new(config: SessionConfig) -> Self {
		Self {
			config,
			session: Mutex::new(None),
		}
	}

	pub fn is_enabled(&self) -> bool {
		self.config.enabled
	}

	/// The live session's id. `None` once closed or never started.
	pub fn session_id(&self) -> Option<SessionId> {
		self.lock()
			.as_ref()
			.filter(|s| !s.is_closed())
			.map(|s| s.id)
	}

	/// A copy of the most recent session, including a closed one.
	pub fn current(&self) -> Option<Session> {
		self.lock().clone()
	}

	/// Opens a new session, closing any live predecessor first.
	///
	/// Returns the snapshots to deliver: the closed predecessor (if one
	/// was live) followed by the newly opened session.
	pub fn start(&self, release: Option<String>, environment: &str) -> Vec<Session> {
		if !self.config.enabled {
			return Vec::new();
		}

		let mut guard = self.lock();
		let mut updates = Vec::new();

		if let Some(mut previous) = guard.take() {
			if !previous.is_closed() {
				let status = previous.determine_status();
				previous.close(Utc::now(), status);
				debug!(session_id = %previous.id, status = %status, "Closed previous session");
				updates.push(previous);
			}
		}

		let session = Session::start(
			self.config.distinct_id.clone(),
			release,
			environment,
		);
		info!(session_id = %session.id, "Session started");
		updates.push(session.clone());
		*guard = Some(session);

		updates
	}

	/// Records that the app left the foreground.
	pub fn on_background(&self, now: DateTime<Utc>) {
		if let Some(session) = self.lock().as_mut() {
			if session.state == SessionState::Active {
				session.touch(now);
				session.state = SessionState::Backgrounded;
				debug!(session_id = %session.id, "Session backgrounded");
			}
		}
	}

	/// Records that the app returned to the foreground.
	///
	/// A backgrounded session reactivates only while the timeout has not
	/// elapsed; past it, the session closes exactly as a tick would have
	/// closed it, and the returned snapshot should be delivered. A new
	/// `start` is required afterward.
	pub fn on_foreground(&self, now: DateTime<Utc>) -> Option<Session> {
		let mut guard = self.lock();
		let session = guard.as_mut()?;

		match session.state {
			SessionState::Active => {
				session.touch(now);
				None
			}
			SessionState::Backgrounded => {
				if let Some(closed) = Self::close_if_expired(session, now, self.config.background_timeout) {
					return Some(closed);
				}
				session.state = SessionState::Active;
				session.touch(now);
				debug!(session_id = %session.id, "Session reactivated");
				None
			}
			SessionState::Closed => None,
		}
	}

	/// Observes the clock. Closes a backgrounded session once the
	/// timeout has elapsed, returning the snapshot to deliver.
	pub fn tick(&self, now: DateTime<Utc>) -> Option<Session> {
		let mut guard = self.lock();
		let session = guard.as_mut()?;
		Self::close_if_expired(session, now, self.config.background_timeout)
	}

	/// Ends the current session with its determined status.
	pub fn end(&self) -> Option<Session> {
		let mut guard = self.lock();
		let session = guard.as_mut()?;
		if session.is_closed() {
			return None;
		}

		let status = session.determine_status();
		session.close(Utc::now(), status);
		info!(session_id = %session.id, status = %status, "Session ended");
		Some(session.clone())
	}

	/// Counts a handled error against the live session.
	pub fn record_error(&self) {
		if let Some(session) = self.lock().as_mut() {
			if !session.is_closed() {
				session.error_count += 1;
			}
		}
	}

	/// Counts an unhandled error against the live session.
	pub fn record_crash(&self) {
		if let Some(session) = self.lock().as_mut() {
			if !session.is_closed() {
				session.crash_count += 1;
			}
		}
	}

	fn close_if_expired(
		session: &mut Session,
		now: DateTime<Utc>,
		timeout: Duration,
	) -> Option<Session> {
		if session.state != SessionState::Backgrounded {
			return None;
		}

		let elapsed = (now - session.last_active_at).to_std().unwrap_or_default();
		if elapsed < timeout {
			return None;
		}

		let status = session.determine_status();
		session.close(now, status);
		debug!(session_id = %session.id, status = %status, "Session closed after background timeout");
		Some(session.clone())
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
		self.session.lock().unwrap_or_else(|e| e.into_inner())
	}
}
