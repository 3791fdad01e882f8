// self
use crate::{
	_prelude::*,
	client::{ApiClient, RefreshBody, RefreshGrant},
	http::{ApiRequest, ApiTransport},
	model::{LoginRequest, LoginResponse, User},
	session::{CredentialPair, TokenSecret},
};

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Signs in and persists the issued credential pair.
	pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
		let request = ApiRequest::post("/auth/login").json(&LoginRequest { username, password })?;
		let response: LoginResponse = self.execute_json(request).await?;

		self.session.store_credentials(&CredentialPair::new(
			response.token.as_str(),
			response.refresh_token.as_str(),
		))?;

		Ok(response)
	}

	/// Signs out. Stored credentials are cleared even when the server call fails.
	pub async fn logout(&self) -> Result<()> {
		let outcome = self.execute(ApiRequest::post("/auth/logout")).await;

		self.session.clear()?;

		outcome.map(|_| ())
	}

	/// Exchanges the stored refresh token for a new access token.
	///
	/// Unlike the automatic refresh behind [`execute`](Self::execute), this is an ordinary
	/// call; any failure clears the stored credentials.
	pub async fn refresh_access_token(&self) -> Result<TokenSecret> {
		let result = async {
			let refresh_token = self
				.session
				.refresh_token()?
				.ok_or_else(|| Error::other("No refresh token is stored."))?;
			let request = ApiRequest::post(self.config.refresh_path.as_str())
				.json(&RefreshBody { refresh_token: refresh_token.expose() })?;
			let grant: RefreshGrant = self.execute_json(request).await?;
			let token = TokenSecret::new(grant.token);

			self.session.store_access_token(&token)?;

			Ok::<_, Error>(token)
		}
		.await;

		if result.is_err() {
			let _ = self.session.clear();
		}

		result
	}

	/// Fetches the signed-in account.
	pub async fn current_user(&self) -> Result<User> {
		self.execute_json(ApiRequest::get("/me")).await
	}

	/// Returns `true` when an access token is stored.
	pub fn is_authenticated(&self) -> Result<bool> {
		self.session.is_authenticated()
	}
}
