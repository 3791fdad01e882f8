// self
use crate::{
	_prelude::*,
	api,
	client::ApiClient,
	http::{ApiRequest, ApiTransport},
	model::{Ack, Album, AlbumDraft, AlbumUnlock, Id, ListEnvelope, ListQuery},
	session::TokenSecret,
};

/// Header carrying the unlock token of a password-protected album.
pub const ALBUM_TOKEN_HEADER: &str = "X-Album-Token";

#[derive(Serialize)]
struct PasswordBody<'a> {
	password: &'a str,
}

#[derive(Serialize)]
struct AlbumPhotoBody {
	photo_id: Id,
	sort_order: i32,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Lists albums, newest first.
	pub async fn albums(&self, query: &ListQuery) -> Result<ListEnvelope<Album>> {
		self.execute_json(api::with_list_query(ApiRequest::get("/albums"), query)).await
	}

	/// Fetches one album, sending the stored unlock token when there is one.
	///
	/// Protected albums that are not unlocked come back as a preview with
	/// [`Album::is_locked`] set.
	pub async fn album(&self, id: Id) -> Result<Album> {
		let mut request = ApiRequest::get(format!("/albums/{id}"));

		if let Some(token) = self.session.album_token(id)? {
			request = request.header(ALBUM_TOKEN_HEADER, token.expose());
		}

		self.execute_json(request).await
	}

	/// Creates an album.
	pub async fn create_album(&self, draft: &AlbumDraft) -> Result<Album> {
		self.execute_json(ApiRequest::post("/albums").json(draft)?).await
	}

	/// Updates an album.
	pub async fn update_album(&self, id: Id, draft: &AlbumDraft) -> Result<Album> {
		self.execute_json(ApiRequest::put(format!("/albums/{id}")).json(draft)?).await
	}

	/// Deletes an album; its photos are kept.
	pub async fn delete_album(&self, id: Id) -> Result<()> {
		self.execute(ApiRequest::delete(format!("/albums/{id}"))).await?;

		Ok(())
	}

	/// Adds a photo to an album at `sort_order`.
	pub async fn add_photo_to_album(
		&self,
		album_id: Id,
		photo_id: Id,
		sort_order: i32,
	) -> Result<()> {
		let request = ApiRequest::post(format!("/albums/{album_id}/photos"))
			.json(&AlbumPhotoBody { photo_id, sort_order })?;

		self.execute(request).await?;

		Ok(())
	}

	/// Removes a photo from an album.
	pub async fn remove_photo_from_album(&self, album_id: Id, photo_id: Id) -> Result<()> {
		self.execute(ApiRequest::delete(format!("/albums/{album_id}/photos/{photo_id}"))).await?;

		Ok(())
	}

	/// Protects an album with a password.
	pub async fn set_album_password(&self, id: Id, password: &str) -> Result<Ack> {
		let request =
			ApiRequest::put(format!("/albums/{id}/password")).json(&PasswordBody { password })?;

		self.execute_json(request).await
	}

	/// Removes the password of an album.
	pub async fn remove_album_password(&self, id: Id) -> Result<Ack> {
		self.execute_json(ApiRequest::delete(format!("/albums/{id}/password"))).await
	}

	/// Verifies an album password and remembers the granted unlock token.
	///
	/// A wrong password surfaces as a `401` status error; the session is left intact.
	pub async fn verify_album_password(&self, id: Id, password: &str) -> Result<TokenSecret> {
		let request =
			ApiRequest::post(format!("/albums/{id}/verify")).json(&PasswordBody { password })?;
		let unlock: AlbumUnlock = self.execute_json(request).await?;
		let token = TokenSecret::new(unlock.token);

		self.session.store_album_token(id, &token)?;

		Ok(token)
	}
}
