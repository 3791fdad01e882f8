//! Stateful front-ends over the gallery API.
//!
//! Each holder keeps the last loaded data plus a [`LoadState`]. Failures are forwarded to the
//! [`ErrorHandler`] (which notifies) and the handled message is stashed for display. Reads
//! swallow failures; mutations re-raise them after handling.

mod albums;
mod auth;
mod photos;

pub use albums::AlbumState;
pub use auth::{AuthState, LoginOutcome};
pub use photos::PhotoState;

// self
use crate::{
	_prelude::*,
	handler::{ErrorHandler, HandleOptions},
};

/// Loading flag and last displayable failure of a state holder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadState {
	/// An operation is in flight.
	pub loading: bool,
	/// Message of the last failed operation; reset when a new one starts.
	pub error: Option<String>,
}
impl LoadState {
	fn begin(&mut self) {
		self.loading = true;
		self.error = None;
	}

	fn finish<R>(&mut self, handler: &ErrorHandler, context: &str, result: Result<R>) -> Result<R> {
		self.loading = false;

		if let Err(err) = &result {
			self.error = Some(handler.handle(err, context, HandleOptions::default()).message);
		}

		result
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{handler::NoopDiagnostics, notify::NotificationCenter};

	#[test]
	fn finish_stashes_the_handled_message_and_notifies() {
		let center = NotificationCenter::default();
		let handler =
			ErrorHandler::new(Arc::new(NoopDiagnostics)).with_notifier(Arc::new(center.clone()));
		let mut state = LoadState::default();

		state.begin();

		assert!(state.loading);

		let result =
			state.finish::<()>(&handler, "Load", Err(Error::Status { status: 404, body: None }));

		assert!(result.is_err());
		assert!(!state.loading);
		assert_eq!(state.error.as_deref(), Some("[Load] The requested resource does not exist."));
		assert_eq!(center.active().len(), 1);

		state.begin();

		assert_eq!(state.error, None);
		assert_eq!(state.finish(&handler, "Load", Ok(1)).ok(), Some(1));
		assert_eq!(center.active().len(), 1);
	}
}
