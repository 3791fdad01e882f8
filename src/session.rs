//! Explicit session context holding the credential pair and album unlock tokens.
//!
//! The session is the only owner of stored credentials. It is cheap to clone; every clone
//! reads and writes the same [`KeyValueStore`], so state persists for as long as the store
//! does (a [`FileStore`](crate::store::FileStore) keeps it across restarts).

pub mod secret;

pub use secret::TokenSecret;

// self
use crate::{
	_prelude::*,
	store::{KeyValueStore, MemoryStore},
};

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "token";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

const ALBUM_TOKEN_PREFIX: &str = "album_token_";

/// Access/refresh token pair issued at sign-in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
	/// Bearer token attached to authenticated requests.
	pub access_token: TokenSecret,
	/// Token exchanged for a new access token when the current one expires.
	pub refresh_token: TokenSecret,
}
impl CredentialPair {
	/// Builds a pair from raw token strings.
	pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: TokenSecret::new(refresh_token),
		}
	}
}

/// Accessor layer over the persistent store.
#[derive(Clone)]
pub struct Session {
	store: Arc<dyn KeyValueStore>,
}
impl Session {
	/// Creates a session over the provided store.
	pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
		Self { store }
	}

	/// Creates a session backed by a fresh [`MemoryStore`].
	pub fn in_memory() -> Self {
		Self::new(Arc::new(MemoryStore::default()))
	}

	/// Returns the stored access token.
	pub fn access_token(&self) -> Result<Option<TokenSecret>> {
		self.read(ACCESS_TOKEN_KEY)
	}

	/// Returns the stored refresh token.
	pub fn refresh_token(&self) -> Result<Option<TokenSecret>> {
		self.read(REFRESH_TOKEN_KEY)
	}

	/// Returns `true` when an access token is stored.
	pub fn is_authenticated(&self) -> Result<bool> {
		Ok(self.access_token()?.is_some())
	}

	/// Persists both tokens of a fresh sign-in.
	pub fn store_credentials(&self, credentials: &CredentialPair) -> Result<()> {
		self.store.set(ACCESS_TOKEN_KEY, credentials.access_token.expose())?;
		self.store.set(REFRESH_TOKEN_KEY, credentials.refresh_token.expose())?;

		Ok(())
	}

	/// Replaces the access token after a refresh; the refresh token is kept.
	pub fn store_access_token(&self, token: &TokenSecret) -> Result<()> {
		self.store.set(ACCESS_TOKEN_KEY, token.expose())?;

		Ok(())
	}

	/// Removes the credential pair. Album unlock tokens are left alone.
	pub fn clear(&self) -> Result<()> {
		self.store.remove(ACCESS_TOKEN_KEY)?;
		self.store.remove(REFRESH_TOKEN_KEY)?;

		Ok(())
	}

	/// Returns the unlock token previously granted for `album_id`.
	pub fn album_token(&self, album_id: u64) -> Result<Option<TokenSecret>> {
		self.read(&album_key(album_id))
	}

	/// Remembers the unlock token granted for `album_id`.
	pub fn store_album_token(&self, album_id: u64, token: &TokenSecret) -> Result<()> {
		self.store.set(&album_key(album_id), token.expose())?;

		Ok(())
	}

	/// Forgets the unlock token for `album_id`.
	pub fn forget_album_token(&self, album_id: u64) -> Result<()> {
		self.store.remove(&album_key(album_id))?;

		Ok(())
	}

	fn read(&self, key: &str) -> Result<Option<TokenSecret>> {
		Ok(self.store.get(key)?.filter(|value| !value.is_empty()).map(TokenSecret::new))
	}
}
impl Default for Session {
	fn default() -> Self {
		Self::in_memory()
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Session(..)")
	}
}

fn album_key(album_id: u64) -> String {
	format!("{ALBUM_TOKEN_PREFIX}{album_id}")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn credentials_round_trip_through_well_known_keys() {
		let store = MemoryStore::default();
		let session = Session::new(Arc::new(store.clone()));

		assert!(!session.is_authenticated().expect("Read should succeed."));

		session
			.store_credentials(&CredentialPair::new("access", "refresh"))
			.expect("Storing credentials should succeed.");

		assert_eq!(
			store.get(ACCESS_TOKEN_KEY).expect("Read should succeed."),
			Some("access".into())
		);
		assert_eq!(
			store.get(REFRESH_TOKEN_KEY).expect("Read should succeed."),
			Some("refresh".into())
		);

		session
			.store_access_token(&TokenSecret::new("access-2"))
			.expect("Storing access token should succeed.");

		assert_eq!(
			session.access_token().expect("Read should succeed."),
			Some(TokenSecret::new("access-2"))
		);
		assert_eq!(
			session.refresh_token().expect("Read should succeed."),
			Some(TokenSecret::new("refresh"))
		);
	}

	#[test]
	fn clear_keeps_album_tokens() {
		let session = Session::in_memory();

		session
			.store_credentials(&CredentialPair::new("a", "r"))
			.expect("Storing credentials should succeed.");
		session
			.store_album_token(7, &TokenSecret::new("unlock"))
			.expect("Storing album token should succeed.");
		session.clear().expect("Clearing should succeed.");
		session.clear().expect("Clearing twice should succeed.");

		assert_eq!(session.access_token().expect("Read should succeed."), None);
		assert_eq!(session.refresh_token().expect("Read should succeed."), None);
		assert_eq!(
			session.album_token(7).expect("Read should succeed."),
			Some(TokenSecret::new("unlock"))
		);

		session.forget_album_token(7).expect("Forgetting should succeed.");

		assert_eq!(session.album_token(7).expect("Read should succeed."), None);
	}
}
