//! Authenticated client for the gallery REST API: bearer credentials with single-flight
//! refresh and replay, a total error classifier with contextual handling and notifications,
//! and declarative form validation.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod model;
pub mod notify;
pub mod obs;
pub mod session;
pub mod state;
pub mod store;
pub mod validate;

#[cfg(test)]
mod _preludet {
	//! Scripted transport shared by unit tests.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// self
	use crate::http::{ApiRequest, ApiResponse, ApiTransport, TransportFuture};

	/// Computes an answer for requests nothing was queued for.
	pub type Responder = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync>;

	/// Answers from per-path queues, falling back to a responder, and logs every request.
	pub struct ScriptedTransport {
		log: Mutex<Vec<ApiRequest>>,
		queued: Mutex<HashMap<String, VecDeque<ApiResponse>>>,
		fallback: Responder,
	}
	impl ScriptedTransport {
		/// Creates a transport answering unqueued requests with `fallback`.
		pub fn new(fallback: Responder) -> Self {
			Self { log: Default::default(), queued: Default::default(), fallback }
		}

		/// Creates a transport answering unqueued requests with `404`.
		pub fn not_found() -> Self {
			Self::new(Box::new(|_| Ok(status(404, "{\"error\":\"not found\"}"))))
		}

		/// Queues answers for `path`, consumed in order.
		pub fn queue(self, path: &str, responses: impl IntoIterator<Item = ApiResponse>) -> Self {
			self.queued.lock().entry(path.into()).or_default().extend(responses);

			self
		}

		/// Requests sent to `path`, oldest first.
		pub fn calls_to(&self, path: &str) -> Vec<ApiRequest> {
			self.log.lock().iter().filter(|r| r.path == path).cloned().collect()
		}
	}
	impl ApiTransport for ScriptedTransport {
		fn send(&self, request: ApiRequest) -> TransportFuture<'_> {
			self.log.lock().push(request.clone());

			let queued = self.queued.lock().get_mut(&request.path).and_then(VecDeque::pop_front);
			let result = match queued {
				Some(response) => Ok(response),
				None => (self.fallback)(&request),
			};

			Box::pin(async move {
				// Let concurrent callers interleave the way a real network round-trip would.
				tokio::task::yield_now().await;

				result
			})
		}
	}

	/// `200` answer with a JSON body.
	pub fn ok(body: &str) -> ApiResponse {
		status(200, body)
	}

	/// Answer with an arbitrary status.
	pub fn status(code: u16, body: &str) -> ApiResponse {
		ApiResponse::new(code, body.as_bytes().to_vec())
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
