// self
use crate::{_prelude::*, client::ApiClient, http::ApiTransport, model::User};

/// Fallback login failure message.
pub const LOGIN_FAILED: &str = "Login failed.";

/// Result of [`AuthState::login`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
	/// Credentials were accepted.
	pub success: bool,
	/// Server-provided reason, or [`LOGIN_FAILED`].
	pub error: Option<String>,
}

/// Signed-in account and session lifecycle.
pub struct AuthState<T>
where
	T: ?Sized + ApiTransport,
{
	client: ApiClient<T>,
	user: Option<User>,
}
impl<T> AuthState<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a holder with no loaded account.
	pub fn new(client: ApiClient<T>) -> Self {
		Self { client, user: None }
	}

	/// Account loaded by the last login or [`fetch_current_user`](Self::fetch_current_user).
	pub fn user(&self) -> Option<&User> {
		self.user.as_ref()
	}

	/// Signs in; failures are reported in the outcome, never raised.
	pub async fn login(&mut self, username: &str, password: &str) -> LoginOutcome {
		match self.client.login(username, password).await {
			Ok(response) => {
				self.user = Some(response.user);

				LoginOutcome { success: true, error: None }
			},
			Err(err) => {
				let reason = err
					.body()
					.and_then(|body| body.get("error"))
					.and_then(JsonValue::as_str)
					.filter(|reason| !reason.trim().is_empty())
					.unwrap_or(LOGIN_FAILED);

				LoginOutcome { success: false, error: Some(reason.to_owned()) }
			},
		}
	}

	/// Signs out; local state is cleared whatever the server answers.
	pub async fn logout(&mut self) {
		if let Err(err) = self.client.logout().await {
			#[cfg(feature = "tracing")]
			tracing::warn!(error = %crate::classify::user_message(&err), "Logout call failed.");
			#[cfg(not(feature = "tracing"))]
			let _ = err;
		}

		self.clear_auth();
	}

	/// Refreshes the access token; returns `false` (signed out) on failure.
	pub async fn refresh_access_token(&mut self) -> bool {
		let refreshed = self.client.refresh_access_token().await.is_ok();

		if !refreshed {
			self.clear_auth();
		}

		refreshed
	}

	/// Loads the signed-in account; returns `false` (signed out) on failure.
	pub async fn fetch_current_user(&mut self) -> bool {
		match self.client.current_user().await {
			Ok(user) => {
				self.user = Some(user);

				true
			},
			Err(_) => {
				self.clear_auth();

				false
			},
		}
	}

	/// Forgets the account and the stored credential pair.
	pub fn clear_auth(&mut self) {
		self.user = None;

		let _ = self.client.session.clear();
	}

	/// Returns `true` while an access token is stored.
	pub fn check_auth(&self) -> bool {
		self.client.is_authenticated().unwrap_or(false)
	}
}
