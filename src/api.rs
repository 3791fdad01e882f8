//! Typed gallery API operations on [`ApiClient`](crate::client::ApiClient).
//!
//! Every operation goes through [`ApiClient::execute`](crate::client::ApiClient::execute), so
//! bearer attachment and 401 recovery apply uniformly. List endpoints decode into
//! [`ListEnvelope`](crate::model::ListEnvelope), accepting both the paged envelope and a bare
//! array.

mod albums;
mod auth;
mod photos;

pub use albums::ALBUM_TOKEN_HEADER;

// self
use crate::{http::ApiRequest, model::ListQuery};

fn with_list_query(mut request: ApiRequest, query: &ListQuery) -> ApiRequest {
	for (name, value) in query.pairs() {
		request = request.query(name, value);
	}

	request
}
