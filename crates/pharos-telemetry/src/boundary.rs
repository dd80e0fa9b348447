// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error boundary capability for UI hosts.
//!
//! The surrounding UI runtime owns render-failure detection; this
//! module owns what happens next. A boundary captures the error with
//! its component position, renders a fallback string carrying the event
//! id, and keeps the process alive.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{error, warn};

use pharos_telemetry_core::EventId;

use crate::client::TelemetryClient;
use crate::error::Result;

/// Where in the rendering tree an error surfaced, innermost first.
#[derive(Debug, Clone, Default)]
pub struct ComponentInfo {
	pub component_stack: Vec<String>,
}

impl ComponentInfo {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends the next enclosing component.
	pub fn component(mut self, name: impl Into<String>) -> Self {
		self.component_stack.push(name.into());
		self
	}
}

/// Outcome of running a component body under a boundary.
#[derive(Debug)]
pub enum BoundaryOutcome<T> {
	/// The body returned normally.
	Completed(T),
	/// The body failed; render `fallback` instead.
	Failed {
		/// Id of the captured event, if capture succeeded.
		event_id: Option<EventId>,
		/// The rendered fallback text.
		fallback: String,
	},
}

impl<T> BoundaryOutcome<T> {
	pub fn is_failed(&self) -> bool {
		matches!(self, BoundaryOutcome::Failed { .. })
	}
}

/// Fallback renderer given the captured event id.
type FallbackFn = dyn Fn(Option<&EventId>) -> String + Send + Sync;

/// Captures errors that escape a UI subtree.
pub struct ErrorBoundary {
	client: TelemetryClient,
	fallback: Box<FallbackFn>,
}

impl ErrorBoundary {
	/// Creates a boundary with the default fallback text.
	pub fn new(client: TelemetryClient) -> Self {
		Self {
			client,
			fallback: Box::new(default_fallback),
		}
	}

	/// Replaces the fallback renderer.
	pub fn fallback<F>(mut self, fallback: F) -> Self
	where
		F: Fn(Option<&EventId>) -> String + Send + Sync + 'static,
	{
		self.fallback = Box::new(fallback);
		self
	}

	/// The capture contract invoked by the UI runtime when an error
	/// propagates through the boundary.
	pub fn capture(
		&self,
		error: &dyn std::error::Error,
		info: &ComponentInfo,
	) -> Result<Option<EventId>> {
		self.client.capture_boundary_error(error, info)
	}

	/// Renders the fallback for a captured (or uncapturable) error.
	pub fn render_fallback(&self, event_id: Option<&EventId>) -> String {
		(self.fallback)(event_id)
	}

	/// Runs a component body, capturing a panic as a boundary error.
	///
	/// The panic never propagates: the outcome carries the rendered
	/// fallback in its place.
	pub fn run<T>(&self, info: &ComponentInfo, body: impl FnOnce() -> T) -> BoundaryOutcome<T> {
		match catch_unwind(AssertUnwindSafe(body)) {
			Ok(value) => BoundaryOutcome::Completed(value),
			Err(payload) => {
				let caught = CaughtPanic {
					message: panic_message(payload.as_ref()),
				};
				self.client.record_session_crash();

				let event_id = match self.client.capture_boundary_error(&caught, info) {
					Ok(id) => id,
					Err(e) => {
						error!(error = %e, "Failed to capture boundary error");
						None
					}
				};
				warn!(
					event_id = ?event_id.map(|id| id.to_string()),
					message = %caught.message,
					"Boundary caught a panic"
				);

				BoundaryOutcome::Failed {
					event_id,
					fallback: self.render_fallback(event_id.as_ref()),
				}
			}
		}
	}
}

fn default_fallback(event_id: Option<&EventId>) -> String {
	match event_id {
		Some(id) => format!("Error boundary caught with event id: {id}"),
		None => "Error boundary caught".to_string(),
	}
}

/// A panic converted into a capturable error.
#[derive(Debug)]
struct CaughtPanic {
	message: String,
}

impl std::fmt::Display for CaughtPanic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.message)
	}
}

impl std::error::Error for CaughtPanic {}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		(*s).to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"unknown panic".to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_component_info_stack_order() {
		let info = ComponentInfo::new().component("Screen").component("App");
		assert_eq!(info.component_stack, ["Screen", "App"]);
	}

	#[test]
	fn test_default_fallback_includes_event_id() {
		let id = EventId::new();
		assert_eq!(
			default_fallback(Some(&id)),
			format!("Error boundary caught with event id: {id}")
		);
		assert_eq!(default_fallback(None), "Error boundary caught");
	}

	#[test]
	fn test_panic_message_extraction() {
		let boxed: Box<dyn std::any::Any + Send> = Box::new("static panic");
		assert_eq!(panic_message(boxed.as_ref()), "static panic");

		let boxed: Box<dyn std::any::Any + Send> = Box::new("formatted".to_string());
		assert_eq!(panic_message(boxed.as_ref()), "formatted");

		let boxed: Box<dyn std::any::Any + Send> = Box::new(42u32);
		assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
	}
}
