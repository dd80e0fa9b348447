// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: Annotate scope and capture events using the pharos-telemetry SDK.
//!
//! Run with:
//!   cargo run --example capture -p pharos-telemetry

use std::time::Duration;

use chrono::Utc;
use serde_json::json;

use pharos_telemetry::{
	BoundaryOutcome, Breadcrumb, ChannelTransport, ComponentInfo, Envelope, ErrorBoundary,
	EventPayload, Level, TelemetryClient, User,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pharos_telemetry=debug")),
		)
		.init();

	// Configure from environment or use defaults for testing
	let dsn = std::env::var("PHAROS_DSN")
		.unwrap_or_else(|_| "https://examplekey@telemetry.pharos.dev/42".to_string());

	println!("Initializing telemetry client...");
	println!("  DSN: {}", dsn);

	// Envelopes queue in the channel; a real host would drain them into an
	// uploader as they arrive
	let (transport, mut rx) = ChannelTransport::channel();

	// Build the client
	let client = TelemetryClient::builder()
		.dsn(&dsn)
		.transport(transport)
		.debug(true)
		.release("0.1.0-example")
		.dist("0.1.0-example.0")
		.environment("development")
		.session_background_timeout(Duration::from_secs(5))
		.before_send(|mut event| {
			// Drop debug chatter, stamp everything else
			if matches!(
				event.payload,
				EventPayload::Message {
					level: Level::Debug,
					..
				}
			) {
				return None;
			}
			event
				.tags
				.insert("before_send".to_string(), "ran".to_string());
			Some(event)
		})
		.build()?;

	// Set user context
	client.set_user(Some(
		User::new()
			.id("test-id-0")
			.email("test@example.com")
			.username("test-username")
			.extra("specialField", json!("special user field"))
			.extra("specialFieldNumber", json!(418)),
	));

	// Set some tags
	client.set_tag("example", "true");
	client.set_tags([
		("checkout.flow", "v2"),
		("rust_version", "1.75.0"),
	]);

	// Attach extra data and contexts
	client.set_extra("single_extra", "some value");
	client.set_extras([
		("wat", json!({"a": {"b": [1, 2, 3]}})),
		("attempts", json!(3)),
	]);
	client.set_context(
		"device",
		json!({"model": "unknown", "family": "workstation"}),
	);
	client.set_context("TTI", json!({"ms": 1234}));
	client.remove_context("TTI");

	// Leave a breadcrumb trail
	client.add_breadcrumb(
		Breadcrumb::new("Application started")
			.category("startup")
			.level(Level::Info),
	);
	client.add_breadcrumb(
		Breadcrumb::new("User logged in")
			.category("user")
			.level(Level::Debug),
	);
	client.add_breadcrumb(
		Breadcrumb::new("GET /api/data failed")
			.category("http")
			.level(Level::Warning)
			.data(json!({"status": 502})),
	);
	client.add_breadcrumb(
		Breadcrumb::new("Disk almost full")
			.category("system")
			.level(Level::Fatal),
	);
	client.clear_breadcrumbs();
	client.add_breadcrumb(
		Breadcrumb::new("Checkout opened")
			.category("navigation")
			.level(Level::Info),
	);

	// Capture a message against the annotated scope
	println!("\nCapturing test message...");
	match client.capture_message("Example message from pharos-telemetry SDK", Level::Warning)? {
		Some(event_id) => println!("  Event ID: {}", event_id),
		None => println!("  Vetoed by before_send"),
	}

	// Debug messages are vetoed by the before_send transform above
	println!("\nCapturing debug message...");
	match client.capture_message("debug chatter", Level::Debug)? {
		Some(event_id) => println!("  Event ID: {}", event_id),
		None => println!("  Vetoed by before_send"),
	}

	// Capture a handled error
	println!("\nCapturing handled error...");
	let failure: Result<String, std::io::Error> = Err(std::io::Error::new(
		std::io::ErrorKind::ConnectionRefused,
		"payment gateway unreachable",
	));
	if let Err(e) = failure {
		if let Some(event_id) = client.capture_error(&e)? {
			println!("  Event ID: {}", event_id);
		}
	}

	// Contain a panic behind an error boundary
	println!("\nRunning error boundary...");
	let boundary = ErrorBoundary::new(client.clone()).fallback(|id| match id {
		Some(id) => format!("Something went wrong (ref {})", id),
		None => "Something went wrong".to_string(),
	});
	let info = ComponentInfo::new().component("CheckoutForm").component("App");
	let outcome = boundary.run(&info, || -> &str {
		panic!("checkout exploded at render");
	});
	match &outcome {
		BoundaryOutcome::Completed(_) => println!("  Completed without incident"),
		BoundaryOutcome::Failed { event_id, fallback } => {
			println!("  Fallback: {}", fallback);
			if let Some(event_id) = event_id {
				println!("  Event ID: {}", event_id);
			}
		}
	}

	// Sessions close once backgrounded past the configured timeout
	println!("\nSimulating background timeout...");
	let now = Utc::now();
	client.on_background(now);
	client.session_tick(now + chrono::Duration::seconds(6));
	println!("  Session live: {}", client.session_id().is_some());

	client.start_session();
	println!("  Session restarted: {}", client.session_id().is_some());

	// Shutdown
	client.shutdown();
	println!("\nClient shutdown complete.");

	// Drain what the client handed to the transport
	drop(boundary);
	drop(client);
	println!("\nDelivered envelopes:");
	while let Some(envelope) = rx.recv().await {
		match envelope {
			Envelope::Event(event) => println!("  event   {} ({})", event.id, event.kind()),
			Envelope::Session(session) => {
				println!("  session {} ({})", session.id, session.state);
			}
		}
	}

	Ok(())
}
