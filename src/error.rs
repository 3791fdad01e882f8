//! Client-level error types shared across the transport, session, and API layers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Every failure an API call can produce maps onto exactly one variant; the
/// [`classify`](crate::classify::classify) function turns any of them into an
/// [`ErrorDescriptor`](crate::classify::ErrorDescriptor).
#[derive(Debug, ThisError)]
pub enum Error {
	/// The server answered with a non-success status.
	#[error("Server responded with HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Raw response payload; JSON when the body parsed, a string otherwise.
		body: Option<JsonValue>,
	},
	/// The request was sent but no response arrived.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// The server answered successfully but the payload did not match the expected shape.
	#[error("Response body returned with HTTP {status} could not be decoded.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the undecodable response.
		status: u16,
	},
	/// Caller-supplied failure carrying only a message.
	#[error("{message}")]
	Other {
		/// Human-readable description; may be empty.
		message: String,
	},
}
impl Error {
	/// Builds an [`Error::Other`] from any displayable message.
	pub fn other(message: impl Into<String>) -> Self {
		Self::Other { message: message.into() }
	}

	/// Returns the HTTP status when the failure carries a server response.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Returns the raw server payload when the failure carries a server response.
	pub fn body(&self) -> Option<&JsonValue> {
		match self {
			Self::Status { body, .. } => body.as_ref(),
			_ => None,
		}
	}

	/// Returns `true` for `401 Unauthorized` responses.
	pub fn is_unauthorized(&self) -> bool {
		self.status() == Some(401)
	}

	/// Builds an equivalent failure that classifies the same way as `self`.
	///
	/// Sources that cannot be cloned are flattened into their messages.
	pub(crate) fn replicate(&self) -> Self {
		match self {
			Self::Status { status, body } => Self::Status { status: *status, body: body.clone() },
			Self::Transport(TransportError::Timeout { path }) =>
				TransportError::Timeout { path: path.clone() }.into(),
			Self::Transport(TransportError::Network { path, source }) =>
				TransportError::network(path.clone(), std::io::Error::other(source.to_string()))
					.into(),
			Self::Transport(TransportError::Io(e)) =>
				TransportError::Io(std::io::Error::new(e.kind(), e.to_string())).into(),
			other => Self::other(other.to_string()),
		}
	}
}

/// Configuration and request construction failures raised before dispatch.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// The request path could not be joined onto the base URL.
	#[error("Request path `{path}` is not a valid URL.")]
	InvalidUrl {
		/// Offending request path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The transport rejected the request before sending it.
	#[error("HTTP request could not be built.")]
	RequestBuild {
		/// Underlying builder failure.
		#[source]
		source: BoxError,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Encode(#[from] serde_json::Error),
	/// Client configuration failed validation.
	#[error(transparent)]
	Client(#[from] crate::config::ClientConfigError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Wraps a request builder failure inside [`ConfigError`].
	pub fn request_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::RequestBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO) raised after the request left the client.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling `{path}`.")]
	Network {
		/// Request path that failed.
		path: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The overall request deadline elapsed.
	#[error("Request to `{path}` timed out.")]
	Timeout {
		/// Request path that timed out.
		path: String,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(path: impl Into<String>, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { path: path.into(), source: Box::new(src) }
	}
}
