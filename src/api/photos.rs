// self
use crate::{
	_prelude::*,
	api,
	client::ApiClient,
	http::{ApiRequest, ApiTransport},
	model::{Id, ListEnvelope, ListQuery, Photo, PhotoUpdate, PhotoUpload},
};

#[derive(Serialize)]
struct BatchIds<'a> {
	ids: &'a [Id],
}

#[derive(Serialize)]
struct BatchTags<'a> {
	ids: &'a [Id],
	tags: &'a str,
}

#[derive(Serialize)]
struct BatchFeatured<'a> {
	ids: &'a [Id],
	is_featured: bool,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Lists photos, newest first.
	pub async fn photos(&self, query: &ListQuery) -> Result<ListEnvelope<Photo>> {
		self.execute_json(api::with_list_query(ApiRequest::get("/photos"), query)).await
	}

	/// Fetches one photo.
	pub async fn photo(&self, id: Id) -> Result<Photo> {
		self.execute_json(ApiRequest::get(format!("/photos/{id}"))).await
	}

	/// Uploads a new photo as `multipart/form-data`.
	pub async fn upload_photo(&self, upload: PhotoUpload) -> Result<Photo> {
		self.execute_json(ApiRequest::post("/photos").multipart(upload.into_form())).await
	}

	/// Updates photo metadata.
	pub async fn update_photo(&self, id: Id, update: &PhotoUpdate) -> Result<Photo> {
		self.execute_json(ApiRequest::put(format!("/photos/{id}")).json(update)?).await
	}

	/// Deletes a photo.
	pub async fn delete_photo(&self, id: Id) -> Result<()> {
		self.execute(ApiRequest::delete(format!("/photos/{id}"))).await?;

		Ok(())
	}

	/// Counts one view of a photo.
	pub async fn increment_view_count(&self, id: Id) -> Result<()> {
		self.execute(ApiRequest::post(format!("/photos/{id}/view"))).await?;

		Ok(())
	}

	/// Deletes several photos at once.
	pub async fn batch_delete_photos(&self, ids: &[Id]) -> Result<()> {
		self.execute(ApiRequest::delete("/photos/batch").json(&BatchIds { ids })?).await?;

		Ok(())
	}

	/// Replaces the tags of several photos.
	pub async fn batch_update_tags(&self, ids: &[Id], tags: &str) -> Result<()> {
		self.execute(ApiRequest::patch("/photos/batch/tags").json(&BatchTags { ids, tags })?)
			.await?;

		Ok(())
	}

	/// Sets the featured flag of several photos.
	pub async fn batch_set_featured(&self, ids: &[Id], is_featured: bool) -> Result<()> {
		let request =
			ApiRequest::patch("/photos/batch/featured").json(&BatchFeatured { ids, is_featured })?;

		self.execute(request).await?;

		Ok(())
	}
}
