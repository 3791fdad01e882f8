//! Demonstrates signing in, browsing albums, and unlocking a password-protected album with the
//! default reqwest transport against a mocked gallery API.
//!
//! The expired access token is refreshed transparently before the album list is replayed.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use gallery_client::{
	api::ALBUM_TOKEN_HEADER,
	client::ReqwestApiClient,
	config::ClientConfig,
	model::ListQuery,
	session::Session,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/login");
			then.status(200).json_body(json!({
				"token": "demo-access",
				"refresh_token": "demo-refresh",
				"user": { "id": 1, "username": "curator", "role": "admin" },
			}));
		})
		.await;
	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/albums").header("authorization", "Bearer demo-access");
			then.status(401).json_body(json!({ "error": "token expired" }));
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/refresh");
			then.status(200).json_body(json!({ "token": "demo-access-2" }));
		})
		.await;
	let albums = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/albums").header("authorization", "Bearer demo-access-2");
			then.status(200).json_body(json!({
				"data": [
					{ "id": 1, "name": "Coastline" },
					{ "id": 2, "name": "Family", "is_protected": true, "require_auth": true },
				],
				"pagination": { "page": 1, "page_size": 20, "total": 2, "total_page": 1 },
			}));
		})
		.await;
	let verify = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/albums/2/verify");
			then.status(200).json_body(json!({ "token": "album-2", "message": "unlocked" }));
		})
		.await;
	let unlocked = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/albums/2")
				.header(ALBUM_TOKEN_HEADER.to_ascii_lowercase(), "album-2");
			then.status(200).json_body(json!({
				"id": 2,
				"name": "Family",
				"is_protected": true,
				"photos": [{ "id": 10, "title": "Picnic" }, { "id": 11, "title": "Harbor" }],
			}));
		})
		.await;
	let config = ClientConfig::builder().base_url(server.url("/api")).build()?;
	let client = ReqwestApiClient::new(config, Session::in_memory())?;
	let signed_in = client.login("curator", "correct horse").await?;

	println!("Signed in as {}.", signed_in.user.username);

	let list = client.albums(&ListQuery::default()).await?;

	for album in list.items() {
		let lock = if album.is_locked() { " (locked)" } else { "" };

		println!("Album {}: {}{lock}.", album.id, album.name);
	}

	client.verify_album_password(2, "family-secret").await?;

	let album = client.album(2).await?;

	println!("Unlocked {} with {} photos.", album.name, album.photos.len());
	println!("Refresh attempts: {}.", client.refresh_metrics.attempts());

	login.assert_async().await;
	expired.assert_async().await;
	refresh.assert_async().await;
	albums.assert_async().await;
	verify.assert_async().await;
	unlocked.assert_async().await;

	Ok(())
}
