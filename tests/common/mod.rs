//! Helpers shared by the reqwest-backed integration tests.

#![allow(dead_code)]

// std
use std::sync::{Arc, Mutex};
// crates.io
use httpmock::MockServer;
// self
use gallery_client::{
	client::{ReqwestApiClient, SignOutEvent, SignOutHandler, SignOutReason},
	config::ClientConfig,
	session::{CredentialPair, Session},
};

/// Records every sign-out signal.
#[derive(Default)]
pub struct RecordingSignOut(Mutex<Vec<SignOutEvent>>);
impl RecordingSignOut {
	pub fn reasons(&self) -> Vec<SignOutReason> {
		let events = self.0.lock().expect("Sign-out log lock should not be poisoned.");

		events.iter().map(|event| event.reason).collect()
	}
}
impl SignOutHandler for RecordingSignOut {
	fn signed_out(&self, event: SignOutEvent) {
		self.0.lock().expect("Sign-out log lock should not be poisoned.").push(event);
	}
}

/// Config pointing at the mock server's `/api` prefix.
pub fn config(server: &MockServer) -> ClientConfig {
	ClientConfig::builder()
		.base_url(server.url("/api"))
		.build()
		.expect("Mock server config should validate.")
}

/// Builds a reqwest client over an in-memory session, optionally signed in.
pub fn build_client(
	server: &MockServer,
	credentials: Option<(&str, &str)>,
) -> (ReqwestApiClient, Arc<RecordingSignOut>) {
	let session = Session::in_memory();

	if let Some((access, refresh)) = credentials {
		session
			.store_credentials(&CredentialPair::new(access, refresh))
			.expect("Seeding credentials should succeed.");
	}

	let sign_out = Arc::new(RecordingSignOut::default());
	let client = ReqwestApiClient::new(config(server), session)
		.expect("Reqwest client should build.")
		.with_sign_out(sign_out.clone());

	(client, sign_out)
}
