// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Telemetry client for annotating and capturing events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use pharos_common_version::BuildInfo;
use pharos_telemetry_core::{
	AnnotationValue, Breadcrumb, Dsn, Event, EventId, EventPayload, Level, Scope, SessionId, User,
};

use crate::backtrace::capture_backtrace;
use crate::boundary::ComponentInfo;
use crate::error::{Result, TelemetrySdkError};
use crate::ring::BreadcrumbRing;
use crate::session::{SessionConfig, SessionTracker};
use crate::transport::{Envelope, Transport};

/// SDK version for identification.
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
/// SDK name for identification.
const SDK_NAME: &str = "pharos-telemetry-rust";

/// Maximum number of breadcrumbs to keep.
const MAX_BREADCRUMBS: usize = 100;

/// Pre-send transform with veto power over assembled events.
type BeforeSend = dyn Fn(Event) -> Option<Event> + Send + Sync;

/// Configuration for the telemetry client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	/// Where events belong; parsed at build time.
	pub dsn: Dsn,
	/// Log assembled events at debug level.
	pub debug: bool,
	/// Default release, overridable per scope.
	pub release: Option<String>,
	/// Default distribution, overridable per scope.
	pub dist: Option<String>,
	pub environment: String,
	/// Maximum breadcrumbs to keep.
	pub max_breadcrumbs: usize,
}

/// Builder for constructing a TelemetryClient.
pub struct TelemetryClientBuilder {
	dsn: Option<String>,
	transport: Option<Arc<dyn Transport>>,
	debug: bool,
	release: Option<String>,
	dist: Option<String>,
	environment: Option<String>,
	max_breadcrumbs: usize,
	before_send: Option<Box<BeforeSend>>,
	session_config: SessionConfig,
}

impl TelemetryClientBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			dsn: None,
			transport: None,
			debug: false,
			release: None,
			dist: None,
			environment: None,
			max_breadcrumbs: MAX_BREADCRUMBS,
			before_send: None,
			session_config: SessionConfig::default(),
		}
	}

	/// Sets the DSN identifying the ingestion endpoint and project.
	///
	/// Example: `https://key@telemetry.pharos.dev/42`
	pub fn dsn(mut self, dsn: impl Into<String>) -> Self {
		self.dsn = Some(dsn.into());
		self
	}

	/// Sets the delivery collaborator that assembled envelopes are
	/// handed to.
	pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
		self.transport = Some(Arc::new(transport));
		self
	}

	/// Enables debug logging of assembled events.
	pub fn debug(mut self, debug: bool) -> Self {
		self.debug = debug;
		self
	}

	/// Sets the release version.
	///
	/// Defaults to the crate version from build metadata.
	pub fn release(mut self, release: impl Into<String>) -> Self {
		self.release = Some(release.into());
		self
	}

	/// Sets the distribution identifier within a release.
	pub fn dist(mut self, dist: impl Into<String>) -> Self {
		self.dist = Some(dist.into());
		self
	}

	/// Sets the environment name.
	///
	/// Example: `production`, `staging`, `development`
	pub fn environment(mut self, env: impl Into<String>) -> Self {
		self.environment = Some(env.into());
		self
	}

	/// Sets the maximum number of breadcrumbs to keep.
	pub fn max_breadcrumbs(mut self, max: usize) -> Self {
		self.max_breadcrumbs = max;
		self
	}

	/// Installs a pre-send transform.
	///
	/// The transform sees every assembled event and may mutate it or
	/// veto it by returning `None`; vetoed events are dropped and the
	/// capture call returns no id.
	pub fn before_send<F>(mut self, transform: F) -> Self
	where
		F: Fn(Event) -> Option<Event> + Send + Sync + 'static,
	{
		self.before_send = Some(Box::new(transform));
		self
	}

	/// Enables or disables automatic session tracking.
	///
	/// When enabled (default), a session starts when the client is built
	/// and ends when the client is shut down.
	pub fn with_session_tracking(mut self, enabled: bool) -> Self {
		self.session_config.enabled = enabled;
		self
	}

	/// Sets how long a backgrounded session survives before it closes.
	pub fn session_background_timeout(mut self, timeout: Duration) -> Self {
		self.session_config.background_timeout = timeout;
		self
	}

	/// Sets the distinct ID for session tracking.
	///
	/// This is used to identify the user/device across sessions. If not
	/// set, a random UUID will be generated.
	pub fn session_distinct_id(mut self, distinct_id: impl Into<String>) -> Self {
		self.session_config.distinct_id = Some(distinct_id.into());
		self
	}

	/// Builds the TelemetryClient.
	pub fn build(mut self) -> Result<TelemetryClient> {
		let dsn: Dsn = self.dsn.ok_or(TelemetrySdkError::MissingDsn)?.parse()?;
		let transport = self.transport.ok_or(TelemetrySdkError::MissingTransport)?;

		if self.session_config.distinct_id.is_none() {
			self.session_config.distinct_id = Some(uuid::Uuid::now_v7().to_string());
		}
		let session_tracker = SessionTracker::new(self.session_config);

		let config = ClientConfig {
			dsn,
			debug: self.debug,
			release: Some(
				self.release
					.unwrap_or_else(|| BuildInfo::current().version.to_string()),
			),
			dist: self.dist,
			environment: self.environment.unwrap_or_else(|| "production".to_string()),
			max_breadcrumbs: self.max_breadcrumbs,
		};

		let inner = Arc::new(ClientInner {
			state: RwLock::new(ScopeState {
				scope: Scope::new(),
				breadcrumbs: BreadcrumbRing::new(config.max_breadcrumbs),
			}),
			config,
			transport,
			before_send: self.before_send,
			closed: AtomicBool::new(false),
			session_tracker,
		});

		info!(
			host = %inner.config.dsn.host(),
			project_id = %inner.config.dsn.project_id(),
			"Telemetry client initialized"
		);

		let client = TelemetryClient { inner };
		client.start_session();
		Ok(client)
	}
}

impl Default for TelemetryClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Scope and breadcrumbs guarded together so captures snapshot both
/// atomically with respect to mutation.
struct ScopeState {
	scope: Scope,
	breadcrumbs: BreadcrumbRing,
}

/// Internal client state.
struct ClientInner {
	config: ClientConfig,
	transport: Arc<dyn Transport>,
	before_send: Option<Box<BeforeSend>>,
	state: RwLock<ScopeState>,
	closed: AtomicBool,
	session_tracker: SessionTracker,
}

/// Client for annotating and capturing telemetry events.
///
/// The handle is cheap to clone and explicitly owned; there is no
/// process-wide singleton. All annotation and capture operations are
/// synchronous, and delivery happens behind the configured transport.
///
/// # Example
///
/// ```ignore
/// use pharos_telemetry::{ChannelTransport, TelemetryClient};
/// use pharos_telemetry_core::{Breadcrumb, Level, User};
///
/// let (transport, _rx) = ChannelTransport::channel();
/// let client = TelemetryClient::builder()
///     .dsn("https://key@telemetry.pharos.dev/42")
///     .transport(transport)
///     .release(env!("CARGO_PKG_VERSION"))
///     .environment("production")
///     .build()?;
///
/// client.set_user(Some(User::new().id("user_123")));
/// client.add_breadcrumb(Breadcrumb::new("GET /api/users").category("http"));
///
/// if let Err(e) = do_something() {
///     client.capture_error(&e)?;
/// }
///
/// client.shutdown();
/// ```
#[derive(Clone)]
pub struct TelemetryClient {
	inner: Arc<ClientInner>,
}

impl TelemetryClient {
	/// Creates a new builder for constructing a TelemetryClient.
	pub fn builder() -> TelemetryClientBuilder {
		TelemetryClientBuilder::new()
	}

	/// Sets or clears the user attached to future events.
	///
	/// The identity is replaced wholesale; there is no field-level
	/// merge with a previously set user.
	pub fn set_user(&self, user: Option<User>) {
		self.state_write().scope.set_user(user);
	}

	/// Sets a tag that will be attached to all captured events.
	pub fn set_tag(&self, key: impl Into<String>, value: impl Into<String>) {
		self.state_write().scope.set_tag(key, value);
	}

	/// Merges several tags at once, overwriting per key.
	pub fn set_tags<I, K, V>(&self, tags: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.state_write().scope.set_tags(tags);
	}

	/// Removes a tag.
	pub fn remove_tag(&self, key: &str) {
		self.state_write().scope.remove_tag(key);
	}

	/// Attaches extra data to future events.
	///
	/// The value is converted to JSON immediately, so later mutation of
	/// the original cannot alter what was stored. A value that fails
	/// conversion is kept as a marker and surfaces as an error from the
	/// next capture, not from this call.
	pub fn set_extra(&self, key: impl Into<String>, value: impl Serialize) {
		self.state_write()
			.scope
			.set_extra(key, AnnotationValue::from_serialize(value));
	}

	/// Merges several extras at once, overwriting per key.
	pub fn set_extras<I, K, V>(&self, extras: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Serialize,
	{
		self.state_write().scope.set_extras(
			extras
				.into_iter()
				.map(|(k, v)| (k, AnnotationValue::from_serialize(v))),
		);
	}

	/// Sets a named context object.
	pub fn set_context(&self, name: impl Into<String>, value: impl Serialize) {
		self.state_write()
			.scope
			.set_context(name, Some(AnnotationValue::from_serialize(value)));
	}

	/// Removes a named context object.
	pub fn remove_context(&self, name: impl Into<String>) {
		self.state_write().scope.set_context(name, None);
	}

	/// Overrides the release for future events.
	pub fn set_release(&self, release: impl Into<String>) {
		self.state_write().scope.set_release(Some(release.into()));
	}

	/// Overrides the distribution for future events.
	pub fn set_dist(&self, dist: impl Into<String>) {
		self.state_write().scope.set_dist(Some(dist.into()));
	}

	/// Resets every scope annotation. Breadcrumbs are unaffected.
	pub fn clear_scope(&self) {
		self.state_write().scope.clear();
	}

	/// Adds a breadcrumb to the trail.
	pub fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
		self.state_write().breadcrumbs.push(breadcrumb);
	}

	/// Clears all breadcrumbs. The scope is unaffected.
	pub fn clear_breadcrumbs(&self) {
		self.state_write().breadcrumbs.clear();
	}

	/// Captures a message with a severity level.
	///
	/// Returns the event id, or `Ok(None)` when the pre-send transform
	/// vetoed the event.
	pub fn capture_message(&self, message: &str, level: Level) -> Result<Option<EventId>> {
		self.check_closed()?;
		self.capture(EventPayload::Message {
			message: message.to_string(),
			level,
		})
	}

	/// Captures a handled error with a backtrace.
	///
	/// The error's concrete type names the exception. Also counts the
	/// error against the live session for release health.
	pub fn capture_error<E>(&self, error: &E) -> Result<Option<EventId>>
	where
		E: std::error::Error + ?Sized,
	{
		self.check_closed()?;
		self.inner.session_tracker.record_error();
		self.capture(EventPayload::Exception {
			exception_type: std::any::type_name_of_val(error).to_string(),
			exception_value: error.to_string(),
			stacktrace: Some(capture_backtrace()),
		})
	}

	/// Captures an error that propagated through a UI boundary.
	pub fn capture_boundary_error<E>(
		&self,
		error: &E,
		info: &ComponentInfo,
	) -> Result<Option<EventId>>
	where
		E: std::error::Error + ?Sized,
	{
		self.check_closed()?;
		self.inner.session_tracker.record_error();
		self.capture(EventPayload::BoundaryError {
			exception_type: std::any::type_name_of_val(error).to_string(),
			exception_value: error.to_string(),
			component_stack: info.component_stack.clone(),
			stacktrace: Some(capture_backtrace()),
		})
	}

	/// Starts a new session, closing any live one first.
	pub fn start_session(&self) {
		if self.is_closed() {
			return;
		}
		let updates = self.inner.session_tracker.start(
			self.inner.config.release.clone(),
			&self.inner.config.environment,
		);
		for session in updates {
			self.inner.transport.submit(Envelope::Session(session));
		}
	}

	/// Ends the current session with its determined status.
	pub fn end_session(&self) {
		if let Some(closed) = self.inner.session_tracker.end() {
			self.inner.transport.submit(Envelope::Session(closed));
		}
	}

	/// Records that the app returned to the foreground.
	pub fn on_foreground(&self, now: DateTime<Utc>) {
		if let Some(closed) = self.inner.session_tracker.on_foreground(now) {
			self.inner.transport.submit(Envelope::Session(closed));
		}
	}

	/// Records that the app left the foreground.
	pub fn on_background(&self, now: DateTime<Utc>) {
		self.inner.session_tracker.on_background(now);
	}

	/// Drives the session inactivity clock.
	///
	/// Expected to be called from the host's timer or lifecycle signal;
	/// the client owns no timer thread.
	pub fn session_tick(&self, now: DateTime<Utc>) {
		if let Some(closed) = self.inner.session_tracker.tick(now) {
			self.inner.transport.submit(Envelope::Session(closed));
		}
	}

	/// Returns the current session ID, if a session is live.
	pub fn session_id(&self) -> Option<SessionId> {
		self.inner.session_tracker.session_id()
	}

	/// Returns whether session tracking is enabled.
	pub fn is_session_tracking_enabled(&self) -> bool {
		self.inner.session_tracker.is_enabled()
	}

	/// Counts an unhandled error against the live session.
	pub(crate) fn record_session_crash(&self) {
		self.inner.session_tracker.record_crash();
	}

	/// Shuts down the client and ends the current session.
	///
	/// Subsequent captures fail with `ClientShutdown`. Safe to call more
	/// than once.
	pub fn shutdown(&self) {
		if self.inner.closed.swap(true, Ordering::SeqCst) {
			return;
		}

		if let Some(closed) = self.inner.session_tracker.end() {
			self.inner.transport.submit(Envelope::Session(closed));
		}

		info!("Telemetry client shutdown");
	}

	/// Returns true if the client has been shut down.
	pub fn is_closed(&self) -> bool {
		self.inner.closed.load(Ordering::SeqCst)
	}

	fn check_closed(&self) -> Result<()> {
		if self.is_closed() {
			return Err(TelemetrySdkError::ClientShutdown);
		}
		Ok(())
	}

	/// Assembles and submits an event from the current scope.
	fn capture(&self, payload: EventPayload) -> Result<Option<EventId>> {
		// Snapshot under the read lock; everything after works on owned
		// copies so the transform and transport run unlocked.
		let (scope, breadcrumbs) = {
			let state = self.state_read();
			(state.scope.clone(), state.breadcrumbs.snapshot())
		};

		let extra = scope.validated_extra()?;
		let contexts = scope.validated_contexts()?;

		let mut event = Event::new(payload);
		event.release = scope.release.or_else(|| self.inner.config.release.clone());
		event.dist = scope.dist.or_else(|| self.inner.config.dist.clone());
		event.environment = self.inner.config.environment.clone();
		event.user = scope.user;
		event.tags = scope.tags;
		event.extra = extra;
		event.contexts = contexts;
		event.breadcrumbs = breadcrumbs;

		let build = BuildInfo::current();
		event
			.tags
			.insert("sdk.name".to_string(), SDK_NAME.to_string());
		event
			.tags
			.insert("sdk.version".to_string(), SDK_VERSION.to_string());
		event
			.tags
			.insert("platform".to_string(), build.platform.to_string());

		if self.inner.config.debug {
			debug!(
				event_id = %event.id,
				kind = %event.kind(),
				breadcrumbs = event.breadcrumbs.len(),
				"Assembled event"
			);
		}

		let event = match &self.inner.before_send {
			Some(transform) => match transform(event) {
				Some(event) => event,
				None => {
					debug!("Event vetoed by before-send transform");
					return Ok(None);
				}
			},
			None => event,
		};

		let id = event.id;
		self.inner.transport.submit(Envelope::Event(Box::new(event)));
		Ok(Some(id))
	}

	fn state_read(&self) -> RwLockReadGuard<'_, ScopeState> {
		self.inner.state.read().unwrap_or_else(|e| e.into_inner())
	}

	fn state_write(&self) -> RwLockWriteGuard<'_, ScopeState> {
		self.inner.state.write().unwrap_or_else(|e| e.into_inner())
	}
}
