//! Gallery API payloads.

// self
use crate::{
	_prelude::*,
	http::{FilePart, MultipartForm},
};

/// Server-assigned identifier.
pub type Id = u64;

/// Signed-in account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Account identifier.
	pub id: Id,
	/// Login name.
	pub username: String,
	/// Contact address.
	#[serde(default)]
	pub email: String,
	/// Role label, e.g. `admin`.
	#[serde(default)]
	pub role: Option<String>,
}

/// `POST /auth/login` body.
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
	/// Login name.
	pub username: &'a str,
	/// Plain password.
	pub password: &'a str,
}
impl Debug for LoginRequest<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LoginRequest")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// `POST /auth/login` answer.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
	/// Access token.
	pub token: String,
	/// Refresh token.
	pub refresh_token: String,
	/// Signed-in account.
	pub user: User,
}

/// Paging metadata of list endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
	/// One-based page number.
	pub page: u32,
	/// Items per page.
	pub page_size: u32,
	/// Total items across pages.
	pub total: u64,
	/// Total pages.
	pub total_page: u64,
}

/// List answer: either a `{ data, pagination }` envelope or a bare array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
	/// Bare array.
	Bare(Vec<T>),
	/// Paged envelope.
	Paged {
		/// Items of the page.
		data: Vec<T>,
		/// Paging metadata, when sent.
		#[serde(default)]
		pagination: Option<Pagination>,
	},
}
impl<T> ListEnvelope<T> {
	/// Items regardless of the shape.
	pub fn items(&self) -> &[T] {
		match self {
			ListEnvelope::Paged { data, .. } => data,
			ListEnvelope::Bare(items) => items,
		}
	}

	/// Paging metadata of enveloped answers.
	pub fn pagination(&self) -> Option<Pagination> {
		match self {
			ListEnvelope::Paged { pagination, .. } => *pagination,
			ListEnvelope::Bare(_) => None,
		}
	}

	/// Consumes the answer, keeping only the items.
	pub fn into_items(self) -> Vec<T> {
		match self {
			ListEnvelope::Paged { data, .. } => data,
			ListEnvelope::Bare(items) => items,
		}
	}
}

/// Paging and filter parameters of list endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
	/// One-based page number.
	pub page: Option<u32>,
	/// Items per page.
	pub page_size: Option<u32>,
	/// Only featured photos when set.
	pub featured: Option<bool>,
	/// Only photos carrying this tag.
	pub tag: Option<String>,
}
impl ListQuery {
	/// Requests one page.
	pub fn page(mut self, page: u32, page_size: u32) -> Self {
		self.page = Some(page);
		self.page_size = Some(page_size);

		self
	}

	/// Filters on the featured flag.
	pub fn featured(mut self, featured: bool) -> Self {
		self.featured = Some(featured);

		self
	}

	/// Filters on a tag.
	pub fn tag(mut self, tag: impl Into<String>) -> Self {
		self.tag = Some(tag.into());

		self
	}

	pub(crate) fn pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::new();

		if let Some(page) = self.page {
			pairs.push(("page", page.to_string()));
		}
		if let Some(page_size) = self.page_size {
			pairs.push(("page_size", page_size.to_string()));
		}
		if let Some(featured) = self.featured {
			pairs.push(("featured", featured.to_string()));
		}
		if let Some(tag) = self.tag.as_ref() {
			pairs.push(("tag", tag.clone()));
		}

		pairs
	}
}

/// Photo with its EXIF-derived metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Photo {
	/// Identifier.
	pub id: Id,
	/// Title.
	pub title: String,
	/// Free-form description.
	pub description: String,
	/// Server path of the original image.
	pub file_path: String,
	/// Server path of the thumbnail.
	pub thumbnail_path: String,
	/// Where the photo was shot.
	pub location: String,
	/// When the photo was shot.
	#[serde(with = "time::serde::rfc3339::option")]
	pub shot_date: Option<OffsetDateTime>,
	/// Shot year.
	pub year: i32,
	/// Camera body.
	pub camera_model: String,
	/// Lens.
	pub lens: String,
	/// Aperture, e.g. `f/2.8`.
	pub aperture: String,
	/// Shutter speed, e.g. `1/250`.
	pub shutter_speed: String,
	/// ISO sensitivity.
	pub iso: u32,
	/// Tags as stored by the server (a JSON array encoded as a string).
	pub tags: String,
	/// Featured on the home page.
	pub is_featured: bool,
	/// View counter.
	pub view_count: u64,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Last update instant.
	#[serde(with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
}
impl Photo {
	/// Decodes [`tags`](Self::tags); falls back to comma separation for legacy rows.
	pub fn tag_list(&self) -> Vec<String> {
		let raw = self.tags.trim();

		if raw.is_empty() {
			return Vec::new();
		}

		serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|_| {
			raw.split(',').map(str::trim).filter(|t| !t.is_empty()).map(str::to_owned).collect()
		})
	}
}

/// Album, possibly reduced to a locked preview.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Album {
	/// Identifier.
	pub id: Id,
	/// Display name.
	pub name: String,
	/// Free-form description.
	pub description: String,
	/// Photo used as the cover.
	pub cover_photo_id: Option<Id>,
	/// Password protected.
	pub is_protected: bool,
	/// Set on previews of protected albums not yet unlocked.
	pub require_auth: bool,
	/// Photos, empty on locked previews.
	pub photos: Vec<Photo>,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Last update instant.
	#[serde(with = "time::serde::rfc3339::option")]
	pub updated_at: Option<OffsetDateTime>,
}
impl Album {
	/// Returns `true` when the password must be verified before photos are visible.
	pub fn is_locked(&self) -> bool {
		self.require_auth
	}
}

/// Create/update body of an album.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumDraft {
	/// Display name.
	pub name: String,
	/// Free-form description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Photo used as the cover.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cover_photo_id: Option<Id>,
}
impl AlbumDraft {
	/// Creates a draft with just a name.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), ..Default::default() }
	}

	/// Sets the description.
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());

		self
	}

	/// Sets the cover photo.
	pub fn cover_photo(mut self, photo_id: Id) -> Self {
		self.cover_photo_id = Some(photo_id);

		self
	}
}

/// Partial photo update; unset fields are left untouched by the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoUpdate {
	/// Title.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Location.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	/// Shot year.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub year: Option<i32>,
	/// Camera body.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub camera_model: Option<String>,
	/// Lens.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub lens: Option<String>,
	/// Aperture.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub aperture: Option<String>,
	/// Shutter speed.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub shutter_speed: Option<String>,
	/// ISO sensitivity.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub iso: Option<u32>,
	/// Tags, JSON-array encoded.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tags: Option<String>,
	/// Featured flag.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_featured: Option<bool>,
}

/// Multipart upload of a new photo.
#[derive(Clone, Debug)]
pub struct PhotoUpload {
	/// Image file, sent as the `file` part.
	pub file: FilePart,
	/// Title.
	pub title: String,
	/// Optional metadata fields, sent as text parts.
	pub metadata: PhotoUpdate,
}
impl PhotoUpload {
	/// Creates an upload with only the required parts.
	pub fn new(title: impl Into<String>, file: FilePart) -> Self {
		Self { file, title: title.into(), metadata: PhotoUpdate::default() }
	}

	/// Attaches optional metadata.
	pub fn with_metadata(mut self, metadata: PhotoUpdate) -> Self {
		self.metadata = metadata;

		self
	}

	pub(crate) fn into_form(self) -> MultipartForm {
		let PhotoUpload { file, title, metadata } = self;
		let mut form = MultipartForm::default().text("title", title);
		let texts = [
			("description", metadata.description),
			("location", metadata.location),
			("year", metadata.year.map(|v| v.to_string())),
			("camera_model", metadata.camera_model),
			("lens", metadata.lens),
			("aperture", metadata.aperture),
			("shutter_speed", metadata.shutter_speed),
			("iso", metadata.iso.map(|v| v.to_string())),
			("tags", metadata.tags),
			("is_featured", metadata.is_featured.map(|v| v.to_string())),
		];

		for (name, value) in texts {
			if let Some(value) = value {
				form = form.text(name, value);
			}
		}

		form.file("file", file)
	}
}

/// `POST /albums/:id/verify` answer.
#[derive(Clone, Debug, Deserialize)]
pub struct AlbumUnlock {
	/// Unlock token to send as `X-Album-Token`.
	pub token: String,
	/// Server acknowledgement.
	#[serde(default)]
	pub message: Option<String>,
}

/// Plain `{ message }` acknowledgement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Ack {
	/// Server acknowledgement.
	#[serde(default)]
	pub message: Option<String>,
}
