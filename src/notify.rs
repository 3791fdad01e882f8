//! Ephemeral notification registry with severity-based auto-dismiss.

// self
use crate::_prelude::*;

/// Severity of a notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
	/// Completed action.
	Success,
	/// Failure the user should see.
	Error,
	/// Degraded but not failed.
	Warning,
	/// Neutral information.
	#[default]
	Info,
}
impl NotificationLevel {
	/// Display time applied when a request does not set one.
	pub const fn default_duration(self) -> Duration {
		match self {
			NotificationLevel::Error => Duration::milliseconds(5_000),
			NotificationLevel::Warning => Duration::milliseconds(4_000),
			NotificationLevel::Success | NotificationLevel::Info => Duration::milliseconds(3_000),
		}
	}

	/// Title applied when a request does not set one.
	pub const fn default_title(self) -> &'static str {
		match self {
			NotificationLevel::Error => "Error",
			NotificationLevel::Warning => "Warning",
			NotificationLevel::Success | NotificationLevel::Info => "",
		}
	}
}

/// Identifier handed out by [`Notifier::notify`].
pub type NotificationId = u64;

/// Request to show a notification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationRequest {
	/// Severity.
	pub level: NotificationLevel,
	/// Title; the level's default when `None`.
	pub title: Option<String>,
	/// Body text.
	pub message: String,
	/// Display time; the level's default when `None`, sticky when zero.
	pub duration: Option<Duration>,
}
impl NotificationRequest {
	/// Creates a request with level defaults.
	pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
		Self { level, title: None, message: message.into(), duration: None }
	}

	/// Overrides the title.
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());

		self
	}

	/// Overrides the display time.
	pub fn with_duration(mut self, duration: Duration) -> Self {
		self.duration = Some(duration);

		self
	}
}

/// Notification as stored by the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
	/// Registry-assigned identifier.
	pub id: NotificationId,
	/// Severity.
	pub level: NotificationLevel,
	/// Title, possibly empty.
	pub title: String,
	/// Body text.
	pub message: String,
	/// Display time; zero means sticky.
	pub duration: Duration,
	/// Instant after which the notification is dismissed, if it auto-dismisses.
	pub expires_at: Option<OffsetDateTime>,
}
impl Notification {
	/// Returns `true` once the auto-dismiss instant has passed.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|at| now >= at)
	}
}

/// Sink for user-visible notifications.
pub trait Notifier
where
	Self: Send + Sync,
{
	/// Pushes a notification and returns its identifier.
	fn notify(&self, request: NotificationRequest) -> NotificationId;
}

#[derive(Debug, Default)]
struct Registry {
	next_id: NotificationId,
	items: Vec<Notification>,
}

/// In-process [`Notifier`]; clones share the same registry.
#[derive(Clone, Debug, Default)]
pub struct NotificationCenter(Arc<Mutex<Registry>>);
impl NotificationCenter {
	/// Adds a notification created at `now`, dropping the entries that expired by then.
	///
	/// A duration too large to represent never expires.
	pub fn add_at(&self, request: NotificationRequest, now: OffsetDateTime) -> NotificationId {
		let level = request.level;
		let duration = request.duration.unwrap_or_else(|| level.default_duration());
		let expires_at = if duration.is_positive() { now.checked_add(duration) } else { None };
		let mut registry = self.0.lock();
		let id = registry.next_id;

		registry.next_id += 1;
		registry.items.retain(|item| !item.is_expired_at(now));
		registry.items.push(Notification {
			id,
			level,
			title: request.title.unwrap_or_else(|| level.default_title().to_owned()),
			message: request.message,
			duration,
			expires_at,
		});

		id
	}

	/// Adds a notification created now.
	pub fn add(&self, request: NotificationRequest) -> NotificationId {
		self.add_at(request, OffsetDateTime::now_utc())
	}

	/// Removes a notification; unknown ids are ignored.
	pub fn remove(&self, id: NotificationId) {
		self.0.lock().items.retain(|item| item.id != id);
	}

	/// Removes every notification.
	pub fn clear(&self) {
		self.0.lock().items.clear();
	}

	/// Drops expired notifications and returns the rest, oldest first.
	pub fn active_at(&self, now: OffsetDateTime) -> Vec<Notification> {
		let mut registry = self.0.lock();

		registry.items.retain(|item| !item.is_expired_at(now));

		registry.items.clone()
	}

	/// [`active_at`](Self::active_at) evaluated now.
	pub fn active(&self) -> Vec<Notification> {
		self.active_at(OffsetDateTime::now_utc())
	}

	/// Shows a success message.
	pub fn success(&self, message: impl Into<String>) -> NotificationId {
		self.add(NotificationRequest::new(NotificationLevel::Success, message))
	}

	/// Shows an error message.
	pub fn error(&self, message: impl Into<String>) -> NotificationId {
		self.add(NotificationRequest::new(NotificationLevel::Error, message))
	}

	/// Shows a warning.
	pub fn warning(&self, message: impl Into<String>) -> NotificationId {
		self.add(NotificationRequest::new(NotificationLevel::Warning, message))
	}

	/// Shows an informational message.
	pub fn info(&self, message: impl Into<String>) -> NotificationId {
		self.add(NotificationRequest::new(NotificationLevel::Info, message))
	}
}
impl Notifier for NotificationCenter {
	fn notify(&self, request: NotificationRequest) -> NotificationId {
		self.add(request)
	}
}
