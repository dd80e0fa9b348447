// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Telemetry Rust SDK for Pharos.
//!
//! This crate provides a client library for annotating application state and
//! capturing error and message events. Captured events carry a snapshot of the
//! ambient scope (user, tags, extra data, contexts) and the breadcrumb trail,
//! and are handed to a pluggable transport for delivery.
//!
//! # Features
//!
//! - **Explicit Handles**: No global state; clients are cheap-to-clone values you pass around
//! - **Scope Annotations**: User, tags, extra data, and contexts with per-key last-write-wins
//! - **Breadcrumb Trail**: Fixed-capacity ring that evicts the oldest entries first
//! - **Atomic Capture**: Events snapshot scope and breadcrumbs together, then deliver unlocked
//! - **Pre-send Transform**: Inspect, mutate, or veto every event before delivery
//! - **Release Health**: Foreground/background session tracking driven by an external clock
//! - **Error Boundaries**: Contain panics around fallible work and render a fallback
//!
//! # Example
//!
//! ```ignore
//! use pharos_telemetry::{Breadcrumb, ChannelTransport, Level, TelemetryClient, User};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Envelopes drain from the channel into whatever uploader the host runs
//!     let (transport, mut rx) = ChannelTransport::channel();
//!     tokio::spawn(async move {
//!         while let Some(envelope) = rx.recv().await {
//!             let _ = envelope;
//!         }
//!     });
//!
//!     let client = TelemetryClient::builder()
//!         .dsn("https://key@telemetry.pharos.dev/42")
//!         .transport(transport)
//!         .release("1.4.2")
//!         .environment("production")
//!         .build()?;
//!
//!     // Annotate ambient state
//!     client.set_user(Some(User::new().id("user_123").email("dev@example.com")));
//!     client.set_tag("checkout.flow", "v2");
//!     client.add_breadcrumb(Breadcrumb::new("GET /api/cart").category("http"));
//!
//!     // Capture events against that state
//!     client.capture_message("Checkout rendered slowly", Level::Warning)?;
//!
//!     client.shutdown();
//!     Ok(())
//! }
//! ```

mod backtrace;
mod boundary;
mod client;
mod error;
mod ring;
mod session;
mod transport;

pub use backtrace::{capture_backtrace, parse_backtrace};
pub use boundary::{BoundaryOutcome, ComponentInfo, ErrorBoundary};
pub use client::{ClientConfig, TelemetryClient, TelemetryClientBuilder};
pub use error::{Result, TelemetrySdkError};
pub use ring::BreadcrumbRing;
pub use session::{SessionConfig, SessionTracker, DEFAULT_BACKGROUND_TIMEOUT};
pub use transport::{ChannelTransport, Envelope, Transport};

// Re-export core types for convenience
pub use pharos_telemetry_core::{
	AnnotationValue, Breadcrumb, Dsn, Event, EventId, EventKind, EventPayload, Frame, Level,
	Scope, Session, SessionId, SessionState, SessionStatus, Stacktrace, TelemetryError, User,
};
