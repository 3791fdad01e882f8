//! Maps any client [`Error`] onto a normalized [`ErrorDescriptor`].
//!
//! Classification is total and deterministic: every failure yields exactly one descriptor,
//! and the same failure always yields the same descriptor. Order of checks:
//!
//! 1. A server response exists: branch on its status code.
//! 2. The request left but nothing came back: [`ErrorKind::Network`].
//! 3. A purely local failure with a message: [`ErrorKind::Unknown`] carrying that message.
//! 4. Anything else: [`ErrorKind::Unknown`] with a generic message.

// self
use crate::_prelude::*;

/// Message for `401 Unauthorized`.
pub const SESSION_EXPIRED: &str = "Session expired, please sign in again.";
/// Message for `403 Forbidden`.
pub const FORBIDDEN: &str = "You do not have permission to perform this action.";
/// Message for `404 Not Found`.
pub const NOT_FOUND: &str = "The requested resource does not exist.";
/// Fallback for 400/422 responses without a server message.
pub const VALIDATION_FAILED: &str = "Validation failed.";
/// Message for 5xx responses.
pub const SERVER_ERROR: &str = "Server error, please retry later.";
/// Fallback for other statuses without a server message.
pub const REQUEST_FAILED: &str = "Request failed.";
/// Message for failures without a response.
pub const CONNECTION_FAILED: &str = "Connection failed, please check your network.";
/// Message when nothing else is known.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";

/// Failure taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
	/// No response arrived.
	Network,
	/// Server-side failure not otherwise classified.
	Api,
	/// Rejected input (400/422).
	Validation,
	/// Missing or insufficient credentials (401/403).
	Auth,
	/// Anything else, including client-side construction failures.
	Unknown,
}
impl ErrorKind {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::Network => "NETWORK_ERROR",
			ErrorKind::Api => "API_ERROR",
			ErrorKind::Validation => "VALIDATION_ERROR",
			ErrorKind::Auth => "AUTH_ERROR",
			ErrorKind::Unknown => "UNKNOWN_ERROR",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Normalized, classified representation of a failure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
	/// Failure category.
	pub kind: ErrorKind,
	/// Displayable message.
	pub message: String,
	/// HTTP status, or `0` when no response exists.
	pub code: u16,
	/// Raw response payload, when one exists.
	pub details: Option<JsonValue>,
}
impl ErrorDescriptor {
	fn local(message: impl Into<String>) -> Self {
		Self { kind: ErrorKind::Unknown, message: message.into(), code: 0, details: None }
	}
}

/// Classifies a failure. Never panics.
pub fn classify(failure: &Error) -> ErrorDescriptor {
	match failure {
		Error::Status { status, body } => classify_status(*status, body.as_ref()),
		Error::Transport(_) => ErrorDescriptor {
			kind: ErrorKind::Network,
			message: CONNECTION_FAILED.into(),
			code: 0,
			details: None,
		},
		other => {
			let message = other.to_string();

			if message.trim().is_empty() {
				ErrorDescriptor::local(UNKNOWN_ERROR)
			} else {
				ErrorDescriptor::local(message)
			}
		},
	}
}

/// Returns only the displayable message of [`classify`].
pub fn user_message(failure: &Error) -> String {
	classify(failure).message
}

/// Extracts the server-supplied message from a response payload.
///
/// The `message` field wins over `error`; blank strings count as absent.
pub fn server_message(body: Option<&JsonValue>) -> Option<&str> {
	let body = body?;

	["message", "error"]
		.into_iter()
		.filter_map(|field| body.get(field).and_then(JsonValue::as_str))
		.find(|text| !text.trim().is_empty())
}

fn classify_status(status: u16, body: Option<&JsonValue>) -> ErrorDescriptor {
	let (kind, message) = match status {
		401 => (ErrorKind::Auth, SESSION_EXPIRED.to_owned()),
		403 => (ErrorKind::Auth, FORBIDDEN.to_owned()),
		404 => (ErrorKind::Api, NOT_FOUND.to_owned()),
		400 | 422 =>
			(ErrorKind::Validation, server_message(body).unwrap_or(VALIDATION_FAILED).to_owned()),
		500.. => (ErrorKind::Api, SERVER_ERROR.to_owned()),
		_ => (ErrorKind::Api, server_message(body).unwrap_or(REQUEST_FAILED).to_owned()),
	};

	ErrorDescriptor { kind, message, code: status, details: body.cloned() }
}

#[cfg(test)]
mod tests {
	// std
	use std::io;
	// self
	use super::*;
	use crate::error::{ConfigError, TransportError};

	fn status(status: u16, body: Option<JsonValue>) -> Error {
		Error::Status { status, body }
	}

	#[test]
	fn status_table_is_applied_in_order() {
		let cases = [
			(401, ErrorKind::Auth, SESSION_EXPIRED),
			(403, ErrorKind::Auth, FORBIDDEN),
			(404, ErrorKind::Api, NOT_FOUND),
			(400, ErrorKind::Validation, VALIDATION_FAILED),
			(422, ErrorKind::Validation, VALIDATION_FAILED),
			(500, ErrorKind::Api, SERVER_ERROR),
			(503, ErrorKind::Api, SERVER_ERROR),
			(409, ErrorKind::Api, REQUEST_FAILED),
			(302, ErrorKind::Api, REQUEST_FAILED),
		];

		for (code, kind, message) in cases {
			let descriptor = classify(&status(code, None));

			assert_eq!(descriptor.kind, kind, "kind for {code}");
			assert_eq!(descriptor.code, code);
			assert_eq!(descriptor.message, message, "message for {code}");
			assert_eq!(descriptor, classify(&status(code, None)), "deterministic for {code}");
		}
	}

	#[test]
	fn server_messages_override_generic_text_where_allowed() {
		let body = serde_json::json!({ "message": "title is required" });

		assert_eq!(classify(&status(422, Some(body.clone()))).message, "title is required");
		assert_eq!(classify(&status(409, Some(body.clone()))).message, "title is required");
		// Fixed messages are never overridden.
		assert_eq!(classify(&status(401, Some(body.clone()))).message, SESSION_EXPIRED);
		assert_eq!(classify(&status(500, Some(body.clone()))).message, SERVER_ERROR);

		let descriptor = classify(&status(400, Some(serde_json::json!({ "error": "bad id" }))));

		assert_eq!(descriptor.message, "bad id");
		assert_eq!(descriptor.details, Some(serde_json::json!({ "error": "bad id" })));
	}

	#[test]
	fn server_message_skips_blank_fields() {
		let body = serde_json::json!({ "message": "  ", "error": "fallback" });

		assert_eq!(server_message(Some(&body)), Some("fallback"));
		assert_eq!(server_message(Some(&JsonValue::String("plain".into()))), None);
		assert_eq!(server_message(None), None);
	}

	#[test]
	fn missing_response_is_a_network_error() {
		let err: Error = TransportError::Timeout { path: "/photos".into() }.into();
		let descriptor = classify(&err);

		assert_eq!(descriptor.kind, ErrorKind::Network);
		assert_eq!(descriptor.code, 0);
		assert_eq!(descriptor.message, CONNECTION_FAILED);

		let io: Error = TransportError::Io(io::Error::other("reset")).into();

		assert_eq!(classify(&io).kind, ErrorKind::Network);
	}

	#[test]
	fn local_failures_keep_their_message() {
		let err: Error = ConfigError::InvalidUrl {
			path: "::".into(),
			source: url::ParseError::RelativeUrlWithoutBase,
		}
		.into();
		let descriptor = classify(&err);

		assert_eq!(descriptor.kind, ErrorKind::Unknown);
		assert_eq!(descriptor.code, 0);
		assert_eq!(descriptor.message, "Request path `::` is not a valid URL.");
		assert_eq!(user_message(&Error::other("malformed request")), "malformed request");
	}

	#[test]
	fn empty_messages_fall_back_to_unknown() {
		let descriptor = classify(&Error::other(""));

		assert_eq!(descriptor.kind, ErrorKind::Unknown);
		assert_eq!(descriptor.message, UNKNOWN_ERROR);
		assert!(descriptor.details.is_none());
	}

	#[test]
	fn kind_serializes_in_upper_case() {
		let payload = serde_json::to_string(&ErrorKind::Validation)
			.expect("ErrorKind should serialize to JSON.");

		assert_eq!(payload, "\"VALIDATION\"");
	}
}
