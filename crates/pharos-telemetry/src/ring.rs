// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bounded breadcrumb storage.

use std::collections::VecDeque;

use pharos_telemetry_core::Breadcrumb;

/// A fixed-capacity breadcrumb trail.
///
/// Appends beyond capacity evict the oldest entry. Entries are immutable
/// once recorded; readers only ever get copies.
#[derive(Debug, Clone)]
pub struct BreadcrumbRing {
	entries: VecDeque<Breadcrumb>,
	capacity: usize,
}

impl BreadcrumbRing {
	pub fn new(capacity: usize) -> Self {
		Self {
			entries: VecDeque::with_capacity(capacity),
			capacity,
		}
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Appends a breadcrumb, evicting the oldest once full.
	pub fn push(&mut self, breadcrumb: Breadcrumb) {
		if self.capacity == 0 {
			return;
		}
		while self.entries.len() >= self.capacity {
			self.entries.pop_front();
		}
		self.entries.push_back(breadcrumb);
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	/// Copies the trail in capture order, oldest first.
	pub fn snapshot(&self) -> Vec<Breadcrumb> {
		self.entries.iter().cloned().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn crumb(message: &str) -> Breadcrumb {
		Breadcrumb::new(message)
	}

	fn messages(ring: &BreadcrumbRing) -> Vec<String> {
		ring.snapshot()
			.into_iter()
			.filter_map(|c| c.message)
			.collect()
	}

	#[test]
	fn test_push_keeps_order() {
		let mut ring = BreadcrumbRing::new(10);
		for m in ["first", "second", "third"] {
			ring.push(crumb(m));
		}
		assert_eq!(messages(&ring), ["first", "second", "third"]);
	}

	#[test]
	fn test_overflow_evicts_oldest() {
		let mut ring = BreadcrumbRing::new(3);
		for m in ["a", "b", "c", "d"] {
			ring.push(crumb(m));
		}
		assert_eq!(ring.len(), 3);
		assert_eq!(messages(&ring), ["b", "c", "d"]);
	}

	#[test]
	fn test_capacity_plus_one() {
		let capacity = 5;
		let mut ring = BreadcrumbRing::new(capacity);
		for i in 0..=capacity {
			ring.push(crumb(&format!("crumb_{i}")));
		}
		assert_eq!(ring.len(), capacity);
		assert_eq!(messages(&ring)[0], "crumb_1");
	}

	#[test]
	fn test_clear_empties() {
		let mut ring = BreadcrumbRing::new(3);
		ring.push(crumb("x"));
		ring.clear();
		assert!(ring.is_empty());
		assert!(ring.snapshot().is_empty());
	}

	#[test]
	fn test_snapshot_is_independent() {
		let mut ring = BreadcrumbRing::new(3);
		ring.push(crumb("kept"));
		let snapshot = ring.snapshot();
		ring.clear();
		assert_eq!(snapshot.len(), 1);
	}

	#[test]
	fn test_zero_capacity_stores_nothing() {
		let mut ring = BreadcrumbRing::new(0);
		ring.push(crumb("dropped"));
		assert!(ring.is_empty());
	}
}
