// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the telemetry data model.

use thiserror::Error;

/// Errors that can occur in the telemetry data model.
#[derive(Debug, Error)]
pub enum TelemetryError {
	#[error("invalid level: {0}")]
	InvalidLevel(String),

	#[error("invalid event kind: {0}")]
	InvalidEventKind(String),

	#[error("invalid session state: {0}")]
	InvalidSessionState(String),

	#[error("invalid session status: {0}")]
	InvalidSessionStatus(String),

	#[error("invalid DSN: {0}")]
	InvalidDsn(String),

	/// An annotation value recorded on the scope could not be serialized.
	///
	/// Raised when an event is captured, not when the value was set.
	#[error("non-serializable value for {key}: {reason}")]
	NonSerializableValue { key: String, reason: String },

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Result type for telemetry data model operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;
