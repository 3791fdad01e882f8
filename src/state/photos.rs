// self
use crate::{
	_prelude::*,
	client::ApiClient,
	handler::{ErrorHandler, HandleOptions},
	http::ApiTransport,
	model::{Id, ListQuery, Pagination, Photo, PhotoUpdate, PhotoUpload},
	state::LoadState,
};

/// Photo list, the photo being viewed, and their load state.
pub struct PhotoState<T>
where
	T: ?Sized + ApiTransport,
{
	client: ApiClient<T>,
	handler: ErrorHandler,
	/// Photos of the last loaded page, newest first.
	pub photos: Vec<Photo>,
	/// Paging metadata of the last loaded page.
	pub pagination: Option<Pagination>,
	/// Photo opened by [`fetch_photo`](Self::fetch_photo).
	pub current: Option<Photo>,
	/// Loading flag and last failure.
	pub status: LoadState,
}
impl<T> PhotoState<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates an empty holder.
	pub fn new(client: ApiClient<T>, handler: ErrorHandler) -> Self {
		Self {
			client,
			handler,
			photos: Vec::new(),
			pagination: None,
			current: None,
			status: LoadState::default(),
		}
	}

	/// Loads a page of photos; failures are handled and swallowed.
	pub async fn fetch_photos(&mut self, query: &ListQuery) {
		self.status.begin();

		let result = self.client.photos(query).await;

		if let Ok(list) = self.status.finish(&self.handler, "Load photos", result) {
			self.pagination = list.pagination();
			self.photos = list.into_items();
		}
	}

	/// Opens one photo; failures are handled and yield `None`.
	pub async fn fetch_photo(&mut self, id: Id) -> Option<Photo> {
		self.status.begin();

		let result = self.client.photo(id).await;
		let photo = self.status.finish(&self.handler, "Load photo", result).ok()?;

		self.current = Some(photo.clone());

		Some(photo)
	}

	/// Uploads a photo and puts it first in the list.
	pub async fn upload_photo(&mut self, upload: PhotoUpload) -> Result<Photo> {
		self.status.begin();

		let result = self.client.upload_photo(upload).await;
		let photo = self.status.finish(&self.handler, "Upload photo", result)?;

		self.photos.insert(0, photo.clone());

		Ok(photo)
	}

	/// Updates a photo and its list entry.
	pub async fn update_photo(&mut self, id: Id, update: &PhotoUpdate) -> Result<Photo> {
		self.status.begin();

		let result = self.client.update_photo(id, update).await;
		let photo = self.status.finish(&self.handler, "Update photo", result)?;

		if let Some(slot) = self.photos.iter_mut().find(|p| p.id == id) {
			*slot = photo.clone();
		}

		Ok(photo)
	}

	/// Deletes a photo and drops it from the list.
	pub async fn delete_photo(&mut self, id: Id) -> Result<()> {
		self.status.begin();

		let result = self.client.delete_photo(id).await;

		self.status.finish(&self.handler, "Delete photo", result)?;
		self.photos.retain(|p| p.id != id);

		Ok(())
	}

	/// Counts a view; failures are only logged.
	pub async fn increment_view_count(&mut self, id: Id) {
		match self.client.increment_view_count(id).await {
			Ok(()) =>
				if let Some(photo) = self.photos.iter_mut().find(|p| p.id == id) {
					photo.view_count += 1;
				},
			Err(err) => {
				self.handler.handle(&err, "Count view", HandleOptions::log_only());
			},
		}
	}

	/// Deletes several photos and drops them from the list.
	pub async fn batch_delete(&mut self, ids: &[Id]) -> Result<()> {
		self.status.begin();

		let result = self.client.batch_delete_photos(ids).await;

		self.status.finish(&self.handler, "Delete photos", result)?;
		self.photos.retain(|p| !ids.contains(&p.id));

		Ok(())
	}

	/// Replaces the tags of several photos.
	pub async fn batch_update_tags(&mut self, ids: &[Id], tags: &str) -> Result<()> {
		self.status.begin();

		let result = self.client.batch_update_tags(ids, tags).await;

		self.status.finish(&self.handler, "Update tags", result)?;

		for photo in self.photos.iter_mut().filter(|p| ids.contains(&p.id)) {
			photo.tags = tags.to_owned();
		}

		Ok(())
	}

	/// Sets the featured flag of several photos.
	pub async fn batch_set_featured(&mut self, ids: &[Id], is_featured: bool) -> Result<()> {
		self.status.begin();

		let result = self.client.batch_set_featured(ids, is_featured).await;

		self.status.finish(&self.handler, "Update featured photos", result)?;

		for photo in self.photos.iter_mut().filter(|p| ids.contains(&p.id)) {
			photo.is_featured = is_featured;
		}

		Ok(())
	}
}
