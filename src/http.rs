//! Transport primitives for gallery API calls.
//!
//! [`ApiTransport`] is the client's only dependency on an HTTP stack. A transport turns an
//! [`ApiRequest`] into an [`ApiResponse`] for *any* status the server answers with; deciding
//! what a non-success status means is left to [`ApiClient`](crate::client::ApiClient).
//! Transports report failures that happen before a response exists as
//! [`ConfigError`] (the request never left) or [`TransportError`] (it left, nothing came back),
//! which keeps the error classifier's "no response" branch honest.

// crates.io
use serde::de::DeserializeOwned;
#[cfg(feature = "reqwest")]
use reqwest::{
	Method as ReqwestMethod,
	header::{AUTHORIZATION, CONTENT_TYPE},
	multipart::{Form, Part},
};
// self
use crate::{_prelude::*, session::TokenSecret};
#[cfg(feature = "reqwest")]
use crate::{
	config::ClientConfig,
	error::{ConfigError, TransportError},
};

/// Boxed future returned by [`ApiTransport::send`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<ApiResponse>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing gallery API calls.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends the request and resolves with the server's answer, whatever its status.
	fn send(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// HTTP verbs used by the gallery API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl Method {
	/// Returns the verb as sent on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// In-memory file attached to a multipart request.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
	/// File name reported to the server.
	pub file_name: String,
	/// Declared media type, e.g. `image/jpeg`.
	pub media_type: String,
	/// File contents.
	pub bytes: Vec<u8>,
}
impl FilePart {
	/// Creates a new file part.
	pub fn new(
		file_name: impl Into<String>,
		media_type: impl Into<String>,
		bytes: impl Into<Vec<u8>>,
	) -> Self {
		Self { file_name: file_name.into(), media_type: media_type.into(), bytes: bytes.into() }
	}

	/// Size of the contents in bytes.
	pub fn size(&self) -> u64 {
		self.bytes.len() as u64
	}
}
impl Debug for FilePart {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FilePart")
			.field("file_name", &self.file_name)
			.field("media_type", &self.media_type)
			.field("size", &self.bytes.len())
			.finish()
	}
}

/// `multipart/form-data` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipartForm {
	/// Plain text fields.
	pub fields: Vec<(String, String)>,
	/// File fields.
	pub files: Vec<(String, FilePart)>,
}
impl MultipartForm {
	/// Adds a text field.
	pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.fields.push((name.into(), value.into()));

		self
	}

	/// Adds a file field.
	pub fn file(mut self, name: impl Into<String>, file: FilePart) -> Self {
		self.files.push((name.into(), file));

		self
	}
}

/// Request payload variants.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiBody {
	/// `application/json` body.
	Json(JsonValue),
	/// `multipart/form-data` body.
	Multipart(MultipartForm),
}

/// Transport-agnostic description of one API call.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: Method,
	/// Path relative to the configured base URL, starting with `/`.
	pub path: String,
	/// Query parameters appended to the URL.
	pub query: Vec<(String, String)>,
	/// Extra headers.
	pub headers: Vec<(String, String)>,
	/// Optional payload.
	pub body: Option<ApiBody>,
	/// Bearer credential attached by the client right before dispatch.
	pub bearer: Option<TokenSecret>,
}
impl ApiRequest {
	/// Creates a body-less request.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: Vec::new(),
			body: None,
			bearer: None,
		}
	}

	/// `GET` shortcut.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// `POST` shortcut.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// `PUT` shortcut.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	/// `PATCH` shortcut.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::Patch, path)
	}

	/// `DELETE` shortcut.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Serializes `body` as the JSON payload.
	pub fn json<T>(mut self, body: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		let value = serde_json::to_value(body).map_err(crate::error::ConfigError::from)?;

		self.body = Some(ApiBody::Json(value));

		Ok(self)
	}

	/// Sets a multipart payload.
	pub fn multipart(mut self, form: MultipartForm) -> Self {
		self.body = Some(ApiBody::Multipart(form));

		self
	}

	/// Appends a query parameter.
	pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((name.into(), value.to_string()));

		self
	}

	/// Appends a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Returns the bearer credential that will be sent, if any.
	pub fn bearer(&self) -> Option<&TokenSecret> {
		self.bearer.as_ref()
	}
}

/// Raw server answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Creates a response from parts.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Decodes the body as `T`, reporting the failing JSON path on mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let de = &mut serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(de)
			.map_err(|source| Error::Decode { source, status: self.status })
	}

	/// Converts a non-success answer into [`Error::Status`].
	pub fn into_error(self) -> Error {
		Error::Status { status: self.status, body: payload(&self.body) }
	}
}

/// Interprets a raw body as JSON, falling back to a string; empty bodies yield `None`.
pub(crate) fn payload(body: &[u8]) -> Option<JsonValue> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return None;
	}

	serde_json::from_slice(body)
		.ok()
		.or_else(|| Some(JsonValue::String(String::from_utf8_lossy(body).into_owned())))
}

/// reqwest-backed [`ApiTransport`] bound to a base URL.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
	client: ReqwestClient,
	config: Arc<ClientConfig>,
}
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport whose client enforces the configured timeout.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let timeout = std::time::Duration::try_from(config.timeout)
			.map_err(ConfigError::http_client_build)?;
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self::with_client(client, config))
	}

	/// Wraps an existing reqwest client; its own timeout settings apply.
	pub fn with_client(client: ReqwestClient, config: ClientConfig) -> Self {
		Self { client, config: Arc::new(config) }
	}

	/// Configuration the transport resolves paths against.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	fn build(&self, request: ApiRequest) -> Result<reqwest::RequestBuilder> {
		let mut url = self
			.config
			.endpoint(&request.path)
			.map_err(|source| ConfigError::InvalidUrl { path: request.path.clone(), source })?;

		if !request.query.is_empty() {
			url.query_pairs_mut().extend_pairs(request.query.iter());
		}

		let mut builder = self.client.request(reqwest_method(request.method), url);

		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}
		if let Some(bearer) = request.bearer.as_ref() {
			builder = builder.header(AUTHORIZATION, bearer.bearer());
		}

		builder = match request.body {
			Some(ApiBody::Json(value)) => builder
				.header(CONTENT_TYPE, "application/json")
				.body(serde_json::to_vec(&value).map_err(ConfigError::from)?),
			Some(ApiBody::Multipart(form)) => builder.multipart(multipart_form(form)?),
			None => builder,
		};

		Ok(builder)
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let path = request.path.clone();
			let response =
				self.build(request)?.send().await.map_err(|e| map_reqwest_error(&path, e))?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(|e| map_reqwest_error(&path, e))?;

			Ok(ApiResponse::new(status, body.to_vec()))
		})
	}
}

#[cfg(feature = "reqwest")]
fn reqwest_method(method: Method) -> ReqwestMethod {
	match method {
		Method::Get => ReqwestMethod::GET,
		Method::Post => ReqwestMethod::POST,
		Method::Put => ReqwestMethod::PUT,
		Method::Patch => ReqwestMethod::PATCH,
		Method::Delete => ReqwestMethod::DELETE,
	}
}

#[cfg(feature = "reqwest")]
fn multipart_form(form: MultipartForm) -> Result<Form> {
	let mut out = Form::new();

	for (name, value) in form.fields {
		out = out.text(name, value);
	}
	for (name, file) in form.files {
		let part = Part::bytes(file.bytes)
			.file_name(file.file_name)
			.mime_str(&file.media_type)
			.map_err(ConfigError::request_build)?;

		out = out.part(name, part);
	}

	Ok(out)
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(path: &str, err: ReqwestError) -> Error {
	if err.is_builder() {
		ConfigError::request_build(err).into()
	} else if err.is_timeout() {
		TransportError::Timeout { path: path.to_owned() }.into()
	} else {
		TransportError::network(path, err).into()
	}
}
