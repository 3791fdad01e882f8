//! Contextual error handling on top of [`classify`].
//!
//! [`ErrorHandler`] never fails: it classifies, prefixes the message with the caller's context,
//! reports to an injected [`Diagnostics`] collaborator, and optionally surfaces the message
//! through a [`Notifier`].

// self
use crate::{
	_prelude::*,
	classify::{self, ErrorDescriptor},
	config::Environment,
	notify::{NotificationLevel, NotificationRequest, Notifier},
};

/// Everything a diagnostics sink receives about one handled failure.
#[derive(Debug)]
pub struct ErrorReport<'a> {
	/// Context supplied by the caller; may be empty.
	pub context: &'a str,
	/// Final descriptor, message already prefixed.
	pub descriptor: &'a ErrorDescriptor,
	/// Original failure.
	pub failure: &'a Error,
}

/// Receives handled failures for logging or telemetry.
pub trait Diagnostics
where
	Self: Send + Sync,
{
	/// Records one handled failure.
	fn report(&self, report: &ErrorReport<'_>);
}

/// Discards every report.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDiagnostics;
impl Diagnostics for NoopDiagnostics {
	fn report(&self, _: &ErrorReport<'_>) {}
}

/// Logs reports through `tracing` in development and stays quiet in production.
///
/// Production deployments that want telemetry plug in their own [`Diagnostics`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics {
	/// Environment gating verbosity.
	pub environment: Environment,
}
impl TracingDiagnostics {
	/// Creates a sink for the given environment.
	pub fn new(environment: Environment) -> Self {
		Self { environment }
	}
}
impl Diagnostics for TracingDiagnostics {
	fn report(&self, report: &ErrorReport<'_>) {
		if !self.environment.is_development() {
			return;
		}

		#[cfg(feature = "tracing")]
		{
			let descriptor = report.descriptor;

			tracing::error!(
				context = report.context,
				kind = descriptor.kind.as_str(),
				code = descriptor.code,
				details = ?descriptor.details,
				source = %report.failure,
				"{}",
				descriptor.message,
			);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = report;
		}
	}
}

/// Per-call switches for [`ErrorHandler::handle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandleOptions {
	/// Skip diagnostics.
	pub silent: bool,
	/// Push an error notification.
	pub notify: bool,
}
impl HandleOptions {
	/// No logging, no notification.
	pub const QUIET: Self = Self { silent: true, notify: false };

	/// Logs but does not notify.
	pub const fn log_only() -> Self {
		Self { silent: false, notify: false }
	}
}
impl Default for HandleOptions {
	fn default() -> Self {
		Self { silent: false, notify: true }
	}
}

/// Classifies failures, adds context, logs, and notifies.
#[derive(Clone)]
pub struct ErrorHandler {
	diagnostics: Arc<dyn Diagnostics>,
	notifier: Option<Arc<dyn Notifier>>,
}
impl ErrorHandler {
	/// Creates a handler that reports to `diagnostics` and never notifies.
	pub fn new(diagnostics: Arc<dyn Diagnostics>) -> Self {
		Self { diagnostics, notifier: None }
	}

	/// Creates a handler logging through `tracing` for the given environment.
	pub fn for_environment(environment: Environment) -> Self {
		Self::new(Arc::new(TracingDiagnostics::new(environment)))
	}

	/// Attaches the notification sink used when [`HandleOptions::notify`] is set.
	pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
		self.notifier = Some(notifier);

		self
	}

	/// Classifies `failure`, prefixes `[context]`, reports, and optionally notifies.
	pub fn handle(
		&self,
		failure: &Error,
		context: &str,
		options: HandleOptions,
	) -> ErrorDescriptor {
		let mut descriptor = classify::classify(failure);

		descriptor.message = with_context(context, &descriptor.message);

		if !options.silent {
			self.diagnostics.report(&ErrorReport { context, descriptor: &descriptor, failure });
		}
		if let Some(notifier) = self.notifier.as_ref().filter(|_| options.notify) {
			notifier.notify(NotificationRequest::new(
				NotificationLevel::Error,
				descriptor.message.clone(),
			));
		}

		descriptor
	}

	/// Handles with default options (log and notify).
	pub fn show(&self, failure: &Error, context: &str) -> ErrorDescriptor {
		self.handle(failure, context, HandleOptions::default())
	}

	/// Awaits `fut`; a failure is handled and turned into `None`.
	pub async fn guard<T, F>(&self, fut: F, context: &str, options: HandleOptions) -> Option<T>
	where
		F: Future<Output = Result<T>>,
	{
		match fut.await {
			Ok(value) => Some(value),
			Err(err) => {
				self.handle(&err, context, options);

				None
			},
		}
	}
}
impl Default for ErrorHandler {
	fn default() -> Self {
		Self::for_environment(Environment::default())
	}
}
impl Debug for ErrorHandler {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ErrorHandler").field("notifier_set", &self.notifier.is_some()).finish()
	}
}

fn with_context(context: &str, message: &str) -> String {
	let context = context.trim();

	if context.is_empty() { message.to_owned() } else { format!("[{context}] {message}") }
}
