// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backtrace capture and parsing for exception events.

use pharos_telemetry_core::{Frame, Stacktrace};
use rustc_demangle::demangle;
use std::backtrace::Backtrace;

/// Parse a Rust backtrace into a Stacktrace.
pub fn parse_backtrace(backtrace: &Backtrace) -> Stacktrace {
	let bt_string = format!("{:#}", backtrace);
	let frames = parse_backtrace_string(&bt_string);
	Stacktrace { frames }
}

/// Parse backtrace string output into frames.
///
/// Symbol lines become frames; `at path:line:col` lines attach source
/// location to the frame above them.
fn parse_backtrace_string(bt_string: &str) -> Vec<Frame> {
	let mut frames: Vec<Frame> = Vec::new();

	for line in bt_string.lines() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		if let Some(rest) = line.strip_prefix("at ") {
			if let Some(frame) = frames.last_mut() {
				let (filename, lineno, colno) = parse_location(rest.trim());
				frame.filename = Some(filename);
				frame.lineno = lineno;
				frame.colno = colno;
			}
			continue;
		}

		if let Some(frame) = parse_frame_line(line) {
			frames.push(frame);
		}
	}

	frames
}

/// Parse a single symbol line into a Frame.
fn parse_frame_line(line: &str) -> Option<Frame> {
	// Strip the "N:" frame-number prefix when present
	let function_part = match line.split_once(':') {
		Some((prefix, rest)) if prefix.trim().parse::<u32>().is_ok() => rest.trim(),
		_ => line,
	};

	if function_part.is_empty() {
		return None;
	}

	let demangled = demangle(function_part).to_string();

	// e.g. "pharos_telemetry::client::TelemetryClient::capture_message"
	// has module "pharos_telemetry::client::TelemetryClient"
	let module = demangled.rfind("::").map(|idx| demangled[..idx].to_string());

	let in_app = is_in_app_frame(&demangled);

	Some(Frame {
		function: Some(demangled),
		module,
		filename: None,
		lineno: None,
		colno: None,
		in_app,
	})
}

/// Split `path:line:col`, `path:line` or a bare path.
fn parse_location(rest: &str) -> (String, Option<u32>, Option<u32>) {
	if let Some((prefix, trailing)) = rest.rsplit_once(':') {
		if let Ok(trailing) = trailing.parse::<u32>() {
			if let Some((path, line)) = prefix.rsplit_once(':') {
				if let Ok(line) = line.parse::<u32>() {
					return (path.to_string(), Some(line), Some(trailing));
				}
			}
			// A single trailing number is a line, not a column
			return (prefix.to_string(), Some(trailing), None);
		}
	}
	(rest.to_string(), None, None)
}

/// Determine if a frame is from user application code vs standard library.
fn is_in_app_frame(function: &str) -> bool {
	// System/std library prefixes to exclude
	const SYSTEM_PREFIXES: &[&str] = &[
		"std::",
		"core::",
		"alloc::",
		"<std::",
		"<core::",
		"<alloc::",
		"tokio::",
		"<tokio::",
		"futures::",
		"<futures::",
		"tracing::",
		"<tracing::",
		"backtrace::",
		"<backtrace::",
		"panic_unwind::",
		"<panic_unwind::",
		"rust_begin_unwind",
		"rust_panic",
		"__rust_",
		"_rust_",
	];

	// Also exclude common runtime functions
	const SYSTEM_CONTAINS: &[&str] = &[
		"::panic::",
		"::panicking::",
		"::thread::",
		"::rt::",
		"::runtime::",
		"::sys_common::",
	];

	for prefix in SYSTEM_PREFIXES {
		if function.starts_with(prefix) {
			return false;
		}
	}

	for contains in SYSTEM_CONTAINS {
		if function.contains(contains) {
			return false;
		}
	}

	true
}

/// Capture a fresh backtrace and parse it.
pub fn capture_backtrace() -> Stacktrace {
	let backtrace = Backtrace::force_capture();
	parse_backtrace(&backtrace)
}
