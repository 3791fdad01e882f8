#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use common::{build_client, config};
use gallery_client::{
	api::ALBUM_TOKEN_HEADER,
	client::ReqwestApiClient,
	http::FilePart,
	model::{AlbumDraft, ListQuery, PhotoUpdate, PhotoUpload},
	session::{Session, TokenSecret},
	store::FileStore,
};

#[tokio::test]
async fn login_then_logout_manages_the_credential_pair() {
	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/auth/login")
				.json_body(json!({ "username": "admin", "password": "secret" }));
			then.status(200).json_body(json!({
				"token": "access-1",
				"refresh_token": "refresh-1",
				"user": { "id": 1, "username": "admin", "email": "a@b.c", "role": "admin" },
			}));
		})
		.await;
	let logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/logout").header("authorization", "Bearer access-1");
			then.status(500);
		})
		.await;
	let (client, _) = build_client(&server, None);
	let response = client.login("admin", "secret").await.expect("Login should succeed.");

	assert_eq!(response.user.role.as_deref(), Some("admin"));
	assert!(client.is_authenticated().expect("Session read should succeed."));

	let err = client.logout().await.expect_err("Server failure should surface.");

	assert_eq!(err.status(), Some(500));
	assert!(!client.is_authenticated().expect("Session read should succeed."));

	login.assert_async().await;
	logout.assert_async().await;
}

#[tokio::test]
async fn list_endpoints_accept_envelopes_and_bare_arrays() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/photos")
				.query_param("page", "2")
				.query_param("page_size", "1")
				.query_param("featured", "true");
			then.status(200).json_body(json!({
				"data": [{ "id": 3, "title": "Dune", "is_featured": true }],
				"pagination": { "page": 2, "page_size": 1, "total": 4, "total_page": 4 },
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/albums");
			then.status(200).json_body(json!([{ "id": 1, "name": "Trips" }]));
		})
		.await;

	let (client, _) = build_client(&server, None);
	let photos = client
		.photos(&ListQuery::default().page(2, 1).featured(true))
		.await
		.expect("Photo list should decode.");

	assert_eq!(photos.items()[0].title, "Dune");
	assert_eq!(photos.pagination().map(|p| p.total_page), Some(4));

	let albums = client.albums(&ListQuery::default()).await.expect("Album list should decode.");

	assert_eq!(albums.pagination(), None);
	assert_eq!(albums.into_items()[0].name, "Trips");
}

#[tokio::test]
async fn unlocked_albums_are_read_with_the_unlock_token() {
	let server = MockServer::start_async().await;
	let verify = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/albums/7/verify").json_body(json!({ "password": "pw" }));
			then.status(200).json_body(json!({ "message": "ok", "token": "unlock-7" }));
		})
		.await;
	let unlocked = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/albums/7")
				.header(ALBUM_TOKEN_HEADER.to_ascii_lowercase(), "unlock-7");
			then.status(200).json_body(json!({
				"id": 7,
				"name": "Private",
				"is_protected": true,
				"photos": [{ "id": 1 }, { "id": 2 }],
			}));
		})
		.await;
	let (client, _) = build_client(&server, None);
	let token = client.verify_album_password(7, "pw").await.expect("Verification should succeed.");

	assert_eq!(token, TokenSecret::new("unlock-7"));

	let album = client.album(7).await.expect("Unlocked album should load.");

	assert!(!album.is_locked());
	assert_eq!(album.photos.len(), 2);

	verify.assert_async().await;
	unlocked.assert_async().await;
}

#[tokio::test]
async fn album_and_photo_mutations_hit_their_endpoints() {
	let server = MockServer::start_async().await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/albums")
				.json_body(json!({ "name": "Trips", "description": "2024" }));
			then.status(201).json_body(json!({ "id": 9, "name": "Trips", "description": "2024" }));
		})
		.await;
	let add = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/albums/9/photos")
				.json_body(json!({ "photo_id": 3, "sort_order": 1 }));
			then.status(200).json_body(json!({ "message": "added" }));
		})
		.await;
	let password = server
		.mock_async(|when, then| {
			when.method(PUT).path("/api/albums/9/password").json_body(json!({ "password": "pw" }));
			then.status(200).json_body(json!({ "message": "set" }));
		})
		.await;
	let update = server
		.mock_async(|when, then| {
			when.method(PUT).path("/api/photos/3").json_body(json!({ "title": "Renamed" }));
			then.status(200).json_body(json!({ "id": 3, "title": "Renamed" }));
		})
		.await;
	let tags = server
		.mock_async(|when, then| {
			when.method(PATCH)
				.path("/api/photos/batch/tags")
				.json_body(json!({ "ids": [3, 4], "tags": "[\"sea\"]" }));
			then.status(200);
		})
		.await;
	let view = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/photos/3/view");
			then.status(200);
		})
		.await;
	let (client, _) = build_client(&server, Some(("access", "refresh")));
	let album = client
		.create_album(&AlbumDraft::new("Trips").description("2024"))
		.await
		.expect("Album should be created.");

	client.add_photo_to_album(album.id, 3, 1).await.expect("Photo should be added.");

	let ack = client.set_album_password(album.id, "pw").await.expect("Password should be set.");

	assert_eq!(ack.message.as_deref(), Some("set"));

	let photo = client
		.update_photo(3, &PhotoUpdate { title: Some("Renamed".into()), ..Default::default() })
		.await
		.expect("Photo should be updated.");

	assert_eq!(photo.title, "Renamed");

	client.batch_update_tags(&[3, 4], "[\"sea\"]").await.expect("Tags should be updated.");
	client.increment_view_count(3).await.expect("View should be counted.");

	for mock in [&create, &add, &password, &update, &tags, &view] {
		mock.assert_async().await;
	}
}

#[tokio::test]
async fn uploads_are_sent_as_multipart() {
	let server = MockServer::start_async().await;
	let upload = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/photos").header_exists("content-type");
			then.status(201).json_body(json!({ "id": 11, "title": "Sunset" }));
		})
		.await;
	let (client, _) = build_client(&server, Some(("access", "refresh")));
	let photo = client
		.upload_photo(
			PhotoUpload::new("Sunset", FilePart::new("sunset.jpg", "image/jpeg", vec![0xFF, 0xD8]))
				.with_metadata(PhotoUpdate { year: Some(2023), ..Default::default() }),
		)
		.await
		.expect("Upload should succeed.");

	assert_eq!(photo.id, 11);

	upload.assert_async().await;
}

#[tokio::test]
async fn file_backed_sessions_survive_a_restart() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/login");
			then.status(200).json_body(json!({
				"token": "access-1",
				"refresh_token": "refresh-1",
				"user": { "id": 1, "username": "admin" },
			}));
		})
		.await;

	let me = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/me").header("authorization", "Bearer access-1");
			then.status(200).json_body(json!({ "id": 1, "username": "admin" }));
		})
		.await;
	let path = std::env::temp_dir()
		.join(format!("gallery-client-session-{}.json", std::process::id()));

	let _ = std::fs::remove_file(&path);
	let open = || {
		let store = FileStore::open(&path).expect("File store should open.");

		ReqwestApiClient::new(config(&server), Session::new(std::sync::Arc::new(store)))
			.expect("Reqwest client should build.")
	};

	open().login("admin", "secret").await.expect("Login should succeed.");

	let user = open().current_user().await.expect("Restored session should authenticate.");

	assert_eq!(user.username, "admin");

	me.assert_async().await;

	let _ = std::fs::remove_file(&path);
}
