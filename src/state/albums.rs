// self
use crate::{
	_prelude::*,
	client::ApiClient,
	handler::ErrorHandler,
	http::ApiTransport,
	model::{Album, AlbumDraft, Id, ListQuery, Pagination},
	state::LoadState,
};

/// Album list, the album being viewed, and their load state.
pub struct AlbumState<T>
where
	T: ?Sized + ApiTransport,
{
	client: ApiClient<T>,
	handler: ErrorHandler,
	/// Albums of the last loaded page, newest first.
	pub albums: Vec<Album>,
	/// Paging metadata of the last loaded page.
	pub pagination: Option<Pagination>,
	/// Album opened by [`fetch_album`](Self::fetch_album).
	pub current: Option<Album>,
	/// Loading flag and last failure.
	pub status: LoadState,
}
impl<T> AlbumState<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates an empty holder.
	pub fn new(client: ApiClient<T>, handler: ErrorHandler) -> Self {
		Self {
			client,
			handler,
			albums: Vec::new(),
			pagination: None,
			current: None,
			status: LoadState::default(),
		}
	}

	/// Loads a page of albums; failures are handled and swallowed.
	pub async fn fetch_albums(&mut self, query: &ListQuery) {
		self.status.begin();

		let result = self.client.albums(query).await;

		if let Ok(list) = self.status.finish(&self.handler, "Load albums", result) {
			self.pagination = list.pagination();
			self.albums = list.into_items();
		}
	}

	/// Opens one album; failures are handled and yield `None`.
	pub async fn fetch_album(&mut self, id: Id) -> Option<Album> {
		self.status.begin();

		let result = self.client.album(id).await;
		let album = self.status.finish(&self.handler, "Load album", result).ok()?;

		self.current = Some(album.clone());

		Some(album)
	}

	/// Verifies the password of a protected album, then reloads it with its photos.
	///
	/// A wrong password is handled like any other failure; the session stays signed in.
	pub async fn unlock_album(&mut self, id: Id, password: &str) -> Result<Album> {
		self.status.begin();

		let result = async {
			self.client.verify_album_password(id, password).await?;
			self.client.album(id).await
		}
		.await;
		let album = self.status.finish(&self.handler, "Unlock album", result)?;

		self.current = Some(album.clone());

		Ok(album)
	}

	/// Creates an album and puts it first in the list.
	pub async fn create_album(&mut self, draft: &AlbumDraft) -> Result<Album> {
		self.status.begin();

		let result = self.client.create_album(draft).await;
		let album = self.status.finish(&self.handler, "Create album", result)?;

		self.albums.insert(0, album.clone());

		Ok(album)
	}

	/// Updates an album and its list entry.
	pub async fn update_album(&mut self, id: Id, draft: &AlbumDraft) -> Result<Album> {
		self.status.begin();

		let result = self.client.update_album(id, draft).await;
		let album = self.status.finish(&self.handler, "Update album", result)?;

		if let Some(slot) = self.albums.iter_mut().find(|a| a.id == id) {
			*slot = album.clone();
		}

		Ok(album)
	}

	/// Deletes an album and drops it from the list.
	pub async fn delete_album(&mut self, id: Id) -> Result<()> {
		self.status.begin();

		let result = self.client.delete_album(id).await;

		self.status.finish(&self.handler, "Delete album", result)?;
		self.albums.retain(|a| a.id != id);

		Ok(())
	}

	/// Adds a photo to an album.
	pub async fn add_photo_to_album(
		&mut self,
		album_id: Id,
		photo_id: Id,
		sort_order: i32,
	) -> Result<()> {
		self.status.begin();

		let result = self.client.add_photo_to_album(album_id, photo_id, sort_order).await;

		self.status.finish(&self.handler, "Add photo to album", result)
	}

	/// Removes a photo from an album.
	pub async fn remove_photo_from_album(&mut self, album_id: Id, photo_id: Id) -> Result<()> {
		self.status.begin();

		let result = self.client.remove_photo_from_album(album_id, photo_id).await;

		self.status.finish(&self.handler, "Remove photo from album", result)
	}
}
