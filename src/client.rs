//! Authenticated API client with transparent token refresh.
//!
//! [`ApiClient::execute`] attaches the stored access token, and when the server answers `401`
//! it decides between three outcomes:
//!
//! - refresh the access token once, then replay the original request with it;
//! - give up, clear the credential pair, and signal sign-out through [`SignOutHandler`];
//! - pass the failure through untouched (album password verification, where `401` means "wrong
//!   password").
//!
//! Refreshes are single-flight: concurrent `401` handlers serialize on one async guard. A
//! waiter that finds the access token already rotated reuses it instead of refreshing again,
//! and a waiter whose refresh token was just rejected receives that failure without calling
//! the server or signalling sign-out a second time. Every other failure reaches the caller
//! unmodified.

mod counters;

pub use counters::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	http::{ApiRequest, ApiResponse, ApiTransport, Method},
	obs::{self, CallKind, CallOutcome, CallSpan},
	session::{Session, TokenSecret},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Why the client ended the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignOutReason {
	/// The refresh endpoint itself answered `401`.
	RefreshRejected,
	/// A refresh attempt failed.
	RefreshFailed,
	/// A `401` arrived while no refresh token was stored.
	MissingRefreshToken,
	/// The replayed request was rejected again.
	RetryExhausted,
}
impl SignOutReason {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignOutReason::RefreshRejected => "refresh_rejected",
			SignOutReason::RefreshFailed => "refresh_failed",
			SignOutReason::MissingRefreshToken => "missing_refresh_token",
			SignOutReason::RetryExhausted => "retry_exhausted",
		}
	}
}
impl Display for SignOutReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Signal emitted after the credential pair has been cleared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignOutEvent {
	/// Why the session ended.
	pub reason: SignOutReason,
	/// Route the UI should navigate to.
	pub redirect_to: String,
}

/// Receives sign-out signals (typically redirects to the sign-in surface).
pub trait SignOutHandler
where
	Self: Send + Sync,
{
	/// Called once per unrecoverable authentication failure.
	fn signed_out(&self, event: SignOutEvent);
}

/// Default [`SignOutHandler`] that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSignOut;
impl SignOutHandler for LogSignOut {
	fn signed_out(&self, event: SignOutEvent) {
		#[cfg(feature = "tracing")]
		tracing::info!(
			reason = event.reason.as_str(),
			redirect_to = %event.redirect_to,
			"Session ended."
		);
		#[cfg(not(feature = "tracing"))]
		let _ = event;
	}
}

/// In-flight call plus its retry marker.
#[derive(Clone, Debug)]
pub struct PendingRequest {
	/// Request as issued by the caller; the bearer is re-attached on each dispatch.
	pub request: ApiRequest,
	/// Set once the request has been replayed after a refresh.
	pub retried: bool,
}
impl PendingRequest {
	/// Wraps a fresh request.
	pub fn new(request: ApiRequest) -> Self {
		Self { request, retried: false }
	}
}

#[derive(Serialize)]
pub(crate) struct RefreshBody<'a> {
	pub(crate) refresh_token: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct RefreshGrant {
	pub(crate) token: String,
}

/// Refresh failure remembered behind the single-flight guard.
#[derive(Debug)]
struct FailedRefresh {
	refresh_token: TokenSecret,
	error: Error,
}

enum RefreshFailure {
	/// This caller talked to the server and owns the sign-out.
	Sent(Error),
	/// A concurrent caller already failed with the same refresh token.
	Shared(Error),
}
impl From<Error> for RefreshFailure {
	fn from(err: Error) -> Self {
		Self::Sent(err)
	}
}

/// HTTP client wrapper owning the session, transport, and refresh coordination.
pub struct ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Session holding the credential pair.
	pub session: Session,
	/// Client configuration.
	pub config: Arc<ClientConfig>,
	/// Collaborator notified when the session ends.
	pub sign_out: Arc<dyn SignOutHandler>,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_guard: Arc<AsyncMutex<Option<FailedRefresh>>>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a client over the caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		session: Session,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			session,
			config: Arc::new(config),
			sign_out: Arc::new(LogSignOut),
			refresh_metrics: Default::default(),
			refresh_guard: Default::default(),
		}
	}

	/// Replaces the sign-out collaborator.
	pub fn with_sign_out(mut self, handler: Arc<dyn SignOutHandler>) -> Self {
		self.sign_out = handler;

		self
	}

	/// Sends `request` with the stored credential, refreshing and replaying on `401`.
	pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: CallKind = CallKind::Request;

		let span = CallSpan::new(KIND, request.method, &request.path);

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.run(&span, PendingRequest::new(request))).await;

		span.record_status(match &result {
			Ok(response) => Some(response.status),
			Err(err) => err.status(),
		});

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	/// Executes `request` and decodes the JSON body.
	pub async fn execute_json<R>(&self, request: ApiRequest) -> Result<R>
	where
		R: serde::de::DeserializeOwned,
	{
		self.execute(request).await?.json()
	}

	/// Returns `true` when `request` targets the refresh endpoint.
	pub fn is_refresh_call(&self, request: &ApiRequest) -> bool {
		request.path.split('?').next() == Some(self.config.refresh_path.as_str())
	}

	/// Exchanges `refresh_token` for a new access token and stores it.
	///
	/// The call goes straight to the transport: a failure here is reported to the caller
	/// without triggering another round of 401 handling.
	pub async fn refresh_with(&self, refresh_token: &TokenSecret) -> Result<TokenSecret> {
		const KIND: CallKind = CallKind::Refresh;

		let span = CallSpan::new(KIND, Method::Post, &self.config.refresh_path);

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let result = span
			.instrument(async {
				let request = ApiRequest::post(self.config.refresh_path.as_str())
					.json(&RefreshBody { refresh_token: refresh_token.expose() })?;
				let grant: RefreshGrant = self.dispatch(request, None).await?.json()?;
				let token = TokenSecret::new(grant.token);

				self.session.store_access_token(&token)?;

				Ok::<_, Error>(token)
			})
			.await;

		match &result {
			Ok(_) => {
				self.refresh_metrics.record_success();
				obs::record_call_outcome(KIND, CallOutcome::Success);
			},
			Err(_) => {
				self.refresh_metrics.record_failure();
				obs::record_call_outcome(KIND, CallOutcome::Failure);
			},
		}

		result
	}

	async fn run(&self, span: &CallSpan, mut pending: PendingRequest) -> Result<ApiResponse> {
		loop {
			let bearer = self.session.access_token()?;
			let err = match self.dispatch(pending.request.clone(), bearer.clone()).await {
				Ok(response) => return Ok(response),
				Err(err) => err,
			};

			if !err.is_unauthorized() || is_password_verification(&pending.request.path) {
				return Err(err);
			}
			if self.is_refresh_call(&pending.request) {
				self.end_session(SignOutReason::RefreshRejected);

				return Err(err);
			}
			if pending.retried {
				self.end_session(SignOutReason::RetryExhausted);

				return Err(err);
			}

			let Some(refresh_token) = self.session.refresh_token()? else {
				self.end_session(SignOutReason::MissingRefreshToken);

				return Err(err);
			};

			pending.retried = true;
			span.record_retry();

			match self.refresh_after(bearer.as_ref(), &refresh_token).await {
				Ok(()) => {},
				Err(RefreshFailure::Sent(refresh_err)) => {
					self.end_session(SignOutReason::RefreshFailed);

					return Err(refresh_err);
				},
				Err(RefreshFailure::Shared(refresh_err)) => return Err(refresh_err),
			}
		}
	}

	/// Single-flight refresh: only the first caller holding a stale token talks to the server.
	///
	/// Waiters either reuse the rotated access token or share the failure recorded for their
	/// refresh token.
	async fn refresh_after(
		&self,
		stale: Option<&TokenSecret>,
		refresh_token: &TokenSecret,
	) -> Result<(), RefreshFailure> {
		let mut last_failure = self.refresh_guard.lock().await;
		let current = self.session.access_token()?;

		if current.is_some() && current.as_ref() != stale {
			self.refresh_metrics.record_reuse();

			return Ok(());
		}
		if let Some(failed) =
			Option::as_ref(&last_failure).filter(|failed| &failed.refresh_token == refresh_token)
		{
			self.refresh_metrics.record_shared_failure();

			return Err(RefreshFailure::Shared(failed.error.replicate()));
		}

		match self.refresh_with(refresh_token).await {
			Ok(_) => {
				*last_failure = None;

				Ok(())
			},
			Err(err) => {
				*last_failure = Some(FailedRefresh {
					refresh_token: refresh_token.clone(),
					error: err.replicate(),
				});

				Err(RefreshFailure::Sent(err))
			},
		}
	}

	async fn dispatch(
		&self,
		mut request: ApiRequest,
		bearer: Option<TokenSecret>,
	) -> Result<ApiResponse> {
		request.bearer = bearer;

		let response = self.transport.send(request).await?;

		if response.is_success() { Ok(response) } else { Err(response.into_error()) }
	}

	fn end_session(&self, reason: SignOutReason) {
		// The caller gets the triggering error; a storage failure here is only logged.
		if let Err(err) = self.session.clear() {
			#[cfg(feature = "tracing")]
			tracing::warn!(
				reason = reason.as_str(),
				error = %err,
				"Credentials could not be cleared while ending the session."
			);
			#[cfg(not(feature = "tracing"))]
			let _ = err;
		}

		self.sign_out
			.signed_out(SignOutEvent { reason, redirect_to: self.config.sign_in_route.clone() });
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client that provisions its own reqwest transport.
	pub fn new(config: ClientConfig, session: Session) -> Result<Self> {
		let transport = ReqwestTransport::new(config.clone())?;

		Ok(Self::with_transport(config, session, transport))
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			session: self.session.clone(),
			config: self.config.clone(),
			sign_out: self.sign_out.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			refresh_guard: self.refresh_guard.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("session", &self.session)
			.finish()
	}
}

/// `POST /albums/:id/verify` answers `401` for a wrong password, not for an expired session.
pub fn is_password_verification(path: &str) -> bool {
	let path = path.split('?').next().unwrap_or_default();
	let segments = path.split('/').filter(|s| !s.is_empty()).collect::<Vec<_>>();

	segments.windows(3).any(|w| w[0] == "albums" && w[2] == "verify")
}
