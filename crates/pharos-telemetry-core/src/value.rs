// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Annotation values stored on the scope.
//!
//! Scope extras and named contexts accept any serializable value. A value
//! is kept as JSON data (string, number, boolean, null, array, object).
//! Conversion failures are not reported to the caller that set the value;
//! the offending entry is kept as a marker and surfaces as a
//! `NonSerializableValue` error from the next capture that touches it.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, TelemetryError};

/// A contextual annotation recorded on the scope.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
	/// A JSON-representable value.
	Data(Value),
	/// A value that failed JSON conversion when it was set.
	Unserializable { reason: String },
}

impl AnnotationValue {
	/// Converts any serializable value, deferring failures.
	///
	/// Never returns an error: a failed conversion is recorded as
	/// `Unserializable` and raised by [`AnnotationValue::data`] later.
	pub fn from_serialize<T: Serialize>(value: T) -> Self {
		match serde_json::to_value(value) {
			Ok(v) => Self::Data(v),
			Err(e) => Self::Unserializable {
				reason: e.to_string(),
			},
		}
	}

	/// Returns the JSON data, or the deferred conversion failure.
	///
	/// `key` names the scope entry in the resulting error.
	pub fn data(&self, key: &str) -> Result<&Value> {
		match self {
			Self::Data(v) => Ok(v),
			Self::Unserializable { reason } => Err(TelemetryError::NonSerializableValue {
				key: key.to_string(),
				reason: reason.clone(),
			}),
		}
	}

	/// Returns true if the conversion at set time failed.
	pub fn is_unserializable(&self) -> bool {
		matches!(self, Self::Unserializable { .. })
	}
}

impl From<Value> for AnnotationValue {
	fn from(value: Value) -> Self {
		Self::Data(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde::ser::Error as _;

	/// A value whose Serialize impl always fails.
	struct Broken;

	impl Serialize for Broken {
		fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
			Err(S::Error::custom("broken on purpose"))
		}
	}

	#[test]
	fn test_plain_values_convert() {
		let v = AnnotationValue::from_serialize("hello");
		assert_eq!(v.data("k").unwrap(), &Value::String("hello".to_string()));

		let v = AnnotationValue::from_serialize(418);
		assert_eq!(v.data("k").unwrap(), &Value::Number(418.into()));
	}

	#[test]
	fn test_nested_values_convert() {
		let v = AnnotationValue::from_serialize(serde_json::json!({
			"message": "I am a teapot",
			"status": 418,
			"array": ["boo", 100, 400],
		}));
		assert!(!v.is_unserializable());
		assert_eq!(v.data("k").unwrap()["status"], 418);
	}

	#[test]
	fn test_failure_is_deferred() {
		let v = AnnotationValue::from_serialize(Broken);
		assert!(v.is_unserializable());

		let err = v.data("SINGLE-EXTRA").unwrap_err();
		match err {
			TelemetryError::NonSerializableValue { key, reason } => {
				assert_eq!(key, "SINGLE-EXTRA");
				assert!(reason.contains("broken on purpose"));
			}
			other => panic!("unexpected error: {other}"),
		}
	}
}
