// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! DSN parsing for client configuration.
//!
//! A DSN names the ingestion endpoint and the project an event belongs
//! to: `scheme://public_key@host[:port]/project_id`. The client only
//! validates and stores it; connecting is the delivery collaborator's
//! business.

use crate::error::TelemetryError;

/// A parsed data source name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dsn {
	scheme: Scheme,
	public_key: String,
	host: String,
	port: Option<u16>,
	project_id: String,
}

/// Transport scheme of a DSN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
	Http,
	Https,
}

impl Scheme {
	pub fn as_str(&self) -> &'static str {
		match self {
			Scheme::Http => "http",
			Scheme::Https => "https",
		}
	}
}

impl std::fmt::Display for Scheme {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl Dsn {
	pub fn scheme(&self) -> Scheme {
		self.scheme
	}

	pub fn public_key(&self) -> &str {
		&self.public_key
	}

	pub fn host(&self) -> &str {
		&self.host
	}

	pub fn port(&self) -> Option<u16> {
		self.port
	}

	pub fn project_id(&self) -> &str {
		&self.project_id
	}
}

impl std::fmt::Display for Dsn {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}://{}@{}", self.scheme, self.public_key, self.host)?;
		if let Some(port) = self.port {
			write!(f, ":{port}")?;
		}
		write!(f, "/{}", self.project_id)
	}
}

impl std::str::FromStr for Dsn {
	type Err = TelemetryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || TelemetryError::InvalidDsn(s.to_string());

		let (scheme, rest) = s.split_once("://").ok_or_else(invalid)?;
		let scheme = match scheme {
			"http" => Scheme::Http,
			"https" => Scheme::Https,
			_ => return Err(invalid()),
		};

		let (public_key, rest) = rest.split_once('@').ok_or_else(invalid)?;
		if public_key.is_empty() || !public_key.chars().all(|c| c.is_ascii_alphanumeric()) {
			return Err(invalid());
		}

		let (authority, project_id) = rest.split_once('/').ok_or_else(invalid)?;
		if project_id.is_empty() || project_id.contains('/') {
			return Err(invalid());
		}

		let (host, port) = match authority.split_once(':') {
			Some((host, port)) => {
				let port: u16 = port.parse().map_err(|_| invalid())?;
				(host, Some(port))
			}
			None => (authority, None),
		};
		if host.is_empty() {
			return Err(invalid());
		}

		Ok(Self {
			scheme,
			public_key: public_key.to_string(),
			host: host.to_string(),
			port,
			project_id: project_id.to_string(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_parse_full_dsn() {
		let dsn: Dsn = "https://abc123@telemetry.pharos.dev:8443/42"
			.parse()
			.unwrap();
		assert_eq!(dsn.scheme(), Scheme::Https);
		assert_eq!(dsn.public_key(), "abc123");
		assert_eq!(dsn.host(), "telemetry.pharos.dev");
		assert_eq!(dsn.port(), Some(8443));
		assert_eq!(dsn.project_id(), "42");
	}

	#[test]
	fn test_parse_without_port() {
		let dsn: Dsn = "http://key0@localhost/7".parse().unwrap();
		assert_eq!(dsn.scheme(), Scheme::Http);
		assert_eq!(dsn.port(), None);
		assert_eq!(dsn.project_id(), "7");
	}

	#[test]
	fn test_display_reassembles() {
		for raw in [
			"https://abc123@telemetry.pharos.dev:8443/42",
			"http://key0@localhost/7",
		] {
			let dsn: Dsn = raw.parse().unwrap();
			assert_eq!(dsn.to_string(), raw);
		}
	}

	#[test]
	fn test_malformed_dsns_are_rejected() {
		for raw in [
			"",
			"telemetry.pharos.dev",
			"ftp://abc@host/1",
			"https://@host/1",
			"https://a key@host/1",
			"https://abc@/1",
			"https://abc@host",
			"https://abc@host/",
			"https://abc@host/1/2",
			"https://abc@host:notaport/1",
			"https://abc@host:99999/1",
		] {
			assert!(
				raw.parse::<Dsn>().is_err(),
				"expected rejection for: {raw}"
			);
		}
	}

	#[test]
	fn test_error_carries_input() {
		let err = "nope".parse::<Dsn>().unwrap_err();
		match err {
			TelemetryError::InvalidDsn(input) => assert_eq!(input, "nope"),
			other => panic!("unexpected error: {other}"),
		}
	}

	proptest! {
		#[test]
		fn dsn_roundtrip(
			key in "[a-z0-9]{8,32}",
			host in "[a-z][a-z0-9]{0,10}(\\.[a-z][a-z0-9]{0,10}){0,2}",
			port in proptest::option::of(1u16..),
			project in "[0-9]{1,6}",
		) {
			let raw = match port {
				Some(p) => format!("https://{key}@{host}:{p}/{project}"),
				None => format!("https://{key}@{host}/{project}"),
			};
			let dsn: Dsn = raw.parse().unwrap();
			prop_assert_eq!(dsn.to_string(), raw);
		}

		#[test]
		fn random_strings_dont_parse(garbage in "[a-zA-Z0-9_]{0,50}") {
			prop_assert!(garbage.parse::<Dsn>().is_err());
		}
	}
}
