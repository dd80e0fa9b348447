// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The delivery seam between capture and the wire.
//!
//! The client hands fully assembled envelopes to a [`Transport`] and
//! moves on. Batching, retries and the actual network protocol live
//! behind this trait, out of the capture path.

use pharos_telemetry_core::{Event, Session};
use tokio::sync::mpsc;
use tracing::warn;

/// A unit of delivery.
#[derive(Debug, Clone)]
pub enum Envelope {
	Event(Box<Event>),
	Session(Session),
}

impl Envelope {
	pub fn kind(&self) -> &'static str {
		match self {
			Envelope::Event(_) => "event",
			Envelope::Session(_) => "session",
		}
	}
}

/// Handler for delivering envelopes to the server.
///
/// `submit` must not block: captures run on the caller's thread and the
/// client never waits for delivery.
pub trait Transport: Send + Sync {
	fn submit(&self, envelope: Envelope);
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
	fn submit(&self, envelope: Envelope) {
		(**self).submit(envelope);
	}
}

/// A transport that hands envelopes to an in-process channel.
///
/// The receiving half is the delivery worker's business; a typical host
/// drains it from a background task. Submission never blocks, and
/// envelopes are discarded with a warning once the receiver is gone.
pub struct ChannelTransport {
	tx: mpsc::UnboundedSender<Envelope>,
}

impl ChannelTransport {
	/// Creates a transport and the receiver that drains it.
	pub fn channel() -> (Self, mpsc::UnboundedReceiver<Envelope>) {
		let (tx, rx) = mpsc::unbounded_channel();
		(Self { tx }, rx)
	}
}

impl Transport for ChannelTransport {
	fn submit(&self, envelope: Envelope) {
		if let Err(e) = self.tx.send(envelope) {
			warn!(kind = e.0.kind(), "Dropped envelope, delivery channel closed");
		}
	}
}
