// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Pharos telemetry system.
//!
//! This crate provides the shared data model for telemetry capture:
//! scopes, breadcrumbs, annotation values, users, events, sessions and
//! DSNs. It is used by the client SDK (`pharos-telemetry`) and by the
//! server-side ingestion pipeline.
//!
//! # Overview
//!
//! The telemetry system supports:
//! - Message, exception and boundary-error events with scope snapshots
//! - Contextual annotations (user, tags, extras, named contexts) with
//!   last-write-wins semantics
//! - Breadcrumb trails recording what happened before an event
//! - Deferred validation of non-serializable annotation values
//! - Session lifecycle tracking (active, backgrounded, closed)
//! - DSN parsing for client configuration

pub mod breadcrumb;
pub mod dsn;
pub mod error;
pub mod event;
pub mod level;
pub mod scope;
pub mod session;
pub mod user;
pub mod value;

pub use breadcrumb::Breadcrumb;
pub use dsn::{Dsn, Scheme};
pub use error::{Result, TelemetryError};
pub use event::{Event, EventId, EventKind, EventPayload, Frame, Stacktrace};
pub use level::Level;
pub use scope::Scope;
pub use session::{Session, SessionId, SessionState, SessionStatus};
pub use user::User;
pub use value::AnnotationValue;
