// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the telemetry SDK.

use thiserror::Error;

/// Result type alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetrySdkError>;

/// Errors that can occur in the telemetry SDK.
#[derive(Debug, Error)]
pub enum TelemetrySdkError {
	/// The client has been shut down.
	#[error("telemetry client has been shut down")]
	ClientShutdown,

	/// Missing required DSN.
	#[error("DSN is required")]
	MissingDsn,

	/// Missing required transport.
	#[error("transport is required")]
	MissingTransport,

	/// Invalid core data, including malformed DSNs and annotation
	/// values that failed serialization.
	#[error(transparent)]
	Telemetry(#[from] pharos_telemetry_core::TelemetryError),
}
