//! Client configuration and its validating builder.

// self
use crate::_prelude::*;

/// Runtime environment, used to gate diagnostic verbosity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
	/// Verbose diagnostics.
	#[default]
	Development,
	/// Diagnostics suppressed or forwarded to telemetry.
	Production,
}
impl Environment {
	/// Returns `true` for [`Environment::Development`].
	pub const fn is_development(self) -> bool {
		matches!(self, Self::Development)
	}
}

/// Errors raised while validating a [`ClientConfig`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ClientConfigError {
	/// The base URL could not be parsed.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Rejected input.
		url: String,
	},
	/// The base URL uses a scheme other than HTTP(S).
	#[error("Base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Rejected URL.
		url: String,
	},
	/// Timeout must be strictly positive.
	#[error("Request timeout must be positive.")]
	NonPositiveTimeout,
	/// Endpoint paths must be absolute (start with `/`).
	#[error("The {name} path must start with `/`: {path}.")]
	RelativePath {
		/// Which path failed validation.
		name: &'static str,
		/// Offending path.
		path: String,
	},
}

/// Immutable client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Base URL every request path is appended to.
	pub base_url: Url,
	/// Overall per-request deadline.
	pub timeout: Duration,
	/// Path of the token refresh endpoint.
	pub refresh_path: String,
	/// Route the sign-out collaborator should redirect to.
	pub sign_in_route: String,
	/// Runtime environment.
	pub environment: Environment,
}
impl ClientConfig {
	/// Base URL used when none is configured.
	pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
	/// Default request deadline.
	pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(10);
	/// Default refresh endpoint.
	pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";
	/// Default sign-in route.
	pub const DEFAULT_SIGN_IN_ROUTE: &str = "/admin/login";

	/// Creates a new builder seeded with defaults.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Joins a request path onto the base URL, keeping the base path prefix.
	pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
		let base = self.base_url.as_str().trim_end_matches('/');

		Url::parse(&format!("{base}{path}"))
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Raw base URL, parsed on [`build`](Self::build).
	pub base_url: String,
	/// Overall per-request deadline.
	pub timeout: Duration,
	/// Path of the token refresh endpoint.
	pub refresh_path: String,
	/// Route handed to the sign-out collaborator.
	pub sign_in_route: String,
	/// Runtime environment.
	pub environment: Environment,
}
impl ClientConfigBuilder {
	/// Sets the base URL.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = url.into();

		self
	}

	/// Sets the request deadline.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the refresh endpoint path.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Overrides the sign-in route.
	pub fn sign_in_route(mut self, route: impl Into<String>) -> Self {
		self.sign_in_route = route.into();

		self
	}

	/// Sets the runtime environment.
	pub fn environment(mut self, environment: Environment) -> Self {
		self.environment = environment;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
		let base_url = Url::parse(&self.base_url)
			.map_err(|_| ClientConfigError::InvalidBaseUrl { url: self.base_url.clone() })?;

		if !matches!(base_url.scheme(), "http" | "https") {
			return Err(ClientConfigError::UnsupportedScheme { url: base_url.to_string() });
		}
		if !self.timeout.is_positive() {
			return Err(ClientConfigError::NonPositiveTimeout);
		}
		if !self.refresh_path.starts_with('/') {
			return Err(ClientConfigError::RelativePath {
				name: "refresh",
				path: self.refresh_path,
			});
		}

		Ok(ClientConfig {
			base_url,
			timeout: self.timeout,
			refresh_path: self.refresh_path,
			sign_in_route: self.sign_in_route,
			environment: self.environment,
		})
	}
}
impl Default for ClientConfigBuilder {
	fn default() -> Self {
		Self {
			base_url: ClientConfig::DEFAULT_BASE_URL.into(),
			timeout: ClientConfig::DEFAULT_TIMEOUT,
			refresh_path: ClientConfig::DEFAULT_REFRESH_PATH.into(),
			sign_in_route: ClientConfig::DEFAULT_SIGN_IN_ROUTE.into(),
			environment: Environment::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_the_gallery_backend() {
		let config = ClientConfig::builder().build().expect("Defaults should validate.");

		assert_eq!(config.timeout, Duration::seconds(10));
		assert_eq!(
			config.endpoint("/albums/3").expect("Endpoint should join.").as_str(),
			"http://localhost:8080/api/albums/3"
		);
	}

	#[test]
	fn builder_rejects_bad_input() {
		assert!(matches!(
			ClientConfig::builder().base_url("not a url").build(),
			Err(ClientConfigError::InvalidBaseUrl { .. })
		));
		assert!(matches!(
			ClientConfig::builder().base_url("ftp://example.com").build(),
			Err(ClientConfigError::UnsupportedScheme { .. })
		));
		assert_eq!(
			ClientConfig::builder().timeout(Duration::ZERO).build(),
			Err(ClientConfigError::NonPositiveTimeout)
		);
		assert!(matches!(
			ClientConfig::builder().refresh_path("auth/refresh").build(),
			Err(ClientConfigError::RelativePath { name: "refresh", .. })
		));
	}

	#[test]
	fn endpoint_tolerates_trailing_slash() {
		let config = ClientConfig::builder()
			.base_url("https://gallery.example.com/api/")
			.build()
			.expect("Config should validate.");

		assert_eq!(
			config.endpoint("/me").expect("Endpoint should join.").as_str(),
			"https://gallery.example.com/api/me"
		);
	}
}
