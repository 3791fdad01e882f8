//! Validation rules as tagged variants evaluated by a single dispatcher.

// std
use std::sync::LazyLock;
// crates.io
use regex::Regex;
// self
use crate::{
	_prelude::*,
	validate::{FieldValue, current_year},
};

const BYTES_PER_MB: u64 = 1_048_576;
const MIN_YEAR: i64 = 1900;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Email pattern must compile.")
});

/// Compiled regular expression that serializes as its source text.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern(Regex);
impl Pattern {
	/// Compiles `pattern`.
	pub fn new(pattern: &str) -> Result<Self, regex::Error> {
		Regex::new(pattern).map(Self)
	}

	/// Source text of the expression.
	pub fn as_str(&self) -> &str {
		self.0.as_str()
	}

	/// Returns `true` when `text` contains a match.
	pub fn is_match(&self, text: &str) -> bool {
		self.0.is_match(text)
	}
}
impl PartialEq for Pattern {
	fn eq(&self, other: &Self) -> bool {
		self.as_str() == other.as_str()
	}
}
impl TryFrom<String> for Pattern {
	type Error = regex::Error;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(&value)
	}
}
impl From<Pattern> for String {
	fn from(value: Pattern) -> Self {
		value.0.as_str().to_owned()
	}
}

/// Rule kinds and their parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleKind {
	/// Rejects null, empty text, and empty lists.
	Required,
	/// Rejects text or lists shorter than `min`.
	MinLength {
		/// Smallest accepted length.
		min: usize,
	},
	/// Rejects text or lists longer than `max`.
	MaxLength {
		/// Largest accepted length.
		max: usize,
	},
	/// Rejects numbers below `min`.
	Min {
		/// Smallest accepted value.
		min: f64,
	},
	/// Rejects numbers above `max`.
	Max {
		/// Largest accepted value.
		max: f64,
	},
	/// Rejects present values the expression does not match.
	Pattern {
		/// Expression to test against.
		pattern: Pattern,
	},
	/// Rejects present values that are not email addresses.
	Email,
	/// Rejects present values that are not absolute URLs.
	Url,
	/// Rejects years outside `1900..=current year`.
	Year,
	/// Rejects files larger than `max_mb` mebibytes.
	FileSize {
		/// Size limit in MiB.
		max_mb: u64,
	},
	/// Rejects files whose media type is not listed.
	FileType {
		/// Accepted media types.
		allowed: Vec<String>,
	},
}

/// One validation rule with an optional custom message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
	/// What to check.
	#[serde(flatten)]
	pub kind: RuleKind,
	/// Message replacing the default one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}
impl Rule {
	/// Wraps a kind with its default message.
	pub fn new(kind: RuleKind) -> Self {
		Self { kind, message: None }
	}

	/// [`RuleKind::Required`].
	pub fn required() -> Self {
		Self::new(RuleKind::Required)
	}

	/// [`RuleKind::MinLength`].
	pub fn min_length(min: usize) -> Self {
		Self::new(RuleKind::MinLength { min })
	}

	/// [`RuleKind::MaxLength`].
	pub fn max_length(max: usize) -> Self {
		Self::new(RuleKind::MaxLength { max })
	}

	/// [`RuleKind::Min`].
	pub fn min(min: f64) -> Self {
		Self::new(RuleKind::Min { min })
	}

	/// [`RuleKind::Max`].
	pub fn max(max: f64) -> Self {
		Self::new(RuleKind::Max { max })
	}

	/// [`RuleKind::Pattern`].
	pub fn pattern(pattern: Pattern) -> Self {
		Self::new(RuleKind::Pattern { pattern })
	}

	/// [`RuleKind::Email`].
	pub fn email() -> Self {
		Self::new(RuleKind::Email)
	}

	/// [`RuleKind::Url`].
	pub fn url() -> Self {
		Self::new(RuleKind::Url)
	}

	/// [`RuleKind::Year`].
	pub fn year() -> Self {
		Self::new(RuleKind::Year)
	}

	/// [`RuleKind::FileSize`].
	pub fn file_size(max_mb: u64) -> Self {
		Self::new(RuleKind::FileSize { max_mb })
	}

	/// [`RuleKind::FileType`].
	pub fn file_type<I, S>(allowed: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::new(RuleKind::FileType { allowed: allowed.into_iter().map(Into::into).collect() })
	}

	/// Replaces the default message.
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());

		self
	}

	/// Checks `value`, returning the failure message.
	pub fn check(&self, value: &FieldValue) -> Option<String> {
		self.check_at(value, current_year())
	}

	/// [`check`](Self::check) with an explicit reference year.
	pub fn check_at(&self, value: &FieldValue, current_year: i32) -> Option<String> {
		if self.passes(value, current_year) {
			None
		} else {
			Some(self.message.clone().unwrap_or_else(|| self.default_message(current_year)))
		}
	}

	fn passes(&self, value: &FieldValue, current_year: i32) -> bool {
		match &self.kind {
			RuleKind::Required => !value.is_empty(),
			RuleKind::MinLength { min } => value.length().is_none_or(|len| len >= *min),
			RuleKind::MaxLength { max } => value.length().is_none_or(|len| len <= *max),
			RuleKind::Min { min } => value.as_number().is_none_or(|n| n >= *min),
			RuleKind::Max { max } => value.as_number().is_none_or(|n| n <= *max),
			RuleKind::Pattern { pattern } =>
				non_empty_text(value).is_none_or(|text| pattern.is_match(&text)),
			RuleKind::Email => non_empty_text(value).is_none_or(|text| EMAIL.is_match(&text)),
			RuleKind::Url => non_empty_text(value).is_none_or(|text| Url::parse(&text).is_ok()),
			RuleKind::Year => value
				.as_number()
				.is_none_or(|year| (MIN_YEAR as f64..=f64::from(current_year)).contains(&year)),
			RuleKind::FileSize { max_mb } =>
				value.as_file().is_none_or(|file| file.size <= max_mb.saturating_mul(BYTES_PER_MB)),
			RuleKind::FileType { allowed } => value
				.as_file()
				.is_none_or(|file| allowed.iter().any(|media_type| *media_type == file.media_type)),
		}
	}

	fn default_message(&self, current_year: i32) -> String {
		match &self.kind {
			RuleKind::Required => "This field is required.".into(),
			RuleKind::MinLength { min } => format!("Must be at least {min} characters long."),
			RuleKind::MaxLength { max } => format!("Must be at most {max} characters long."),
			RuleKind::Min { min } => format!("Must not be less than {min}."),
			RuleKind::Max { max } => format!("Must not be greater than {max}."),
			RuleKind::Pattern { .. } => "Invalid format.".into(),
			RuleKind::Email => "Please enter a valid email address.".into(),
			RuleKind::Url => "Please enter a valid URL.".into(),
			RuleKind::Year => format!("Year must be between {MIN_YEAR} and {current_year}."),
			RuleKind::FileSize { max_mb } => format!("File size must not exceed {max_mb} MB."),
			RuleKind::FileType { allowed } =>
				format!("Unsupported file type, allowed: {}.", allowed.join(", ")),
		}
	}
}

fn non_empty_text(value: &FieldValue) -> Option<std::borrow::Cow<'_, str>> {
	value.as_text().filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::validate::FileInfo;

	fn text(len: usize) -> FieldValue {
		FieldValue::Text("x".repeat(len))
	}

	fn image(size: u64, media_type: &str) -> FieldValue {
		FileInfo::new("a", size, media_type).into()
	}

	#[test]
	fn required_rejects_absent_and_empty_values() {
		let rule = Rule::required();

		assert!(rule.check(&FieldValue::Null).is_some());
		assert!(rule.check(&"".into()).is_some());
		assert!(rule.check(&FieldValue::List(Vec::new())).is_some());
		assert!(rule.check(&" ".into()).is_none());
		assert!(rule.check(&0.into()).is_none());
		assert!(rule.check(&false.into()).is_none());
	}

	#[test]
	fn length_bounds_are_inclusive() {
		let min = Rule::min_length(3);
		let max = Rule::max_length(5);

		assert!(min.check(&text(3)).is_none());
		assert!(min.check(&text(2)).is_some());
		assert!(max.check(&text(5)).is_none());
		assert!(max.check(&text(6)).is_some());
		assert!(max.check(&vec!["a"; 6].into()).is_some());
		// Lengths count characters, not bytes.
		assert!(max.check(&"ééééé".into()).is_none());
	}

	#[test]
	fn length_rules_do_not_imply_required() {
		assert!(Rule::min_length(3).check(&FieldValue::Null).is_none());
		assert!(Rule::max_length(0).check(&FieldValue::Null).is_none());
	}

	#[test]
	fn numeric_bounds_skip_absent_values() {
		let min = Rule::min(1.0);
		let max = Rule::max(10.0);

		assert!(min.check(&FieldValue::Null).is_none());
		assert!(min.check(&0.into()).is_some());
		assert!(min.check(&"0.5".into()).is_some());
		assert!(min.check(&"abc".into()).is_none());
		assert!(max.check(&10.into()).is_none());
		assert!(max.check(&10.5.into()).is_some());
	}

	#[test]
	fn pattern_email_and_url_skip_empty_values() {
		let digits = Rule::pattern(Pattern::new(r"^\d+$").expect("Pattern should compile."));

		assert!(digits.check(&"".into()).is_none());
		assert!(digits.check(&"123".into()).is_none());
		assert!(digits.check(&"12a".into()).is_some());
		assert!(Rule::email().check(&"".into()).is_none());
		assert!(Rule::email().check(&"a@b.co".into()).is_none());
		assert!(Rule::email().check(&"a@b".into()).is_some());
		assert!(Rule::email().check(&"a b@c.d".into()).is_some());
		assert!(Rule::url().check(&FieldValue::Null).is_none());
		assert!(Rule::url().check(&"https://example.com/x".into()).is_none());
		assert!(Rule::url().check(&"/relative".into()).is_some());
	}

	#[test]
	fn year_is_bounded_by_the_reference_year() {
		let rule = Rule::year();

		assert!(rule.check_at(&1900.into(), 2026).is_none());
		assert!(rule.check_at(&2026.into(), 2026).is_none());
		assert!(rule.check_at(&1899.into(), 2026).is_some());
		assert_eq!(
			rule.check_at(&2027.into(), 2026).as_deref(),
			Some("Year must be between 1900 and 2026.")
		);
		assert!(rule.check_at(&FieldValue::Null, 2026).is_none());
	}

	#[test]
	fn file_size_limit_is_inclusive() {
		let rule = Rule::file_size(10);

		assert!(rule.check(&image(10 * 1_048_576, "image/png")).is_none());
		assert!(rule.check(&image(10 * 1_048_576 + 1, "image/png")).is_some());
		assert!(rule.check(&FieldValue::Null).is_none());
	}

	#[test]
	fn file_type_checks_the_declared_media_type() {
		let rule = Rule::file_type(["image/jpeg", "image/png"]);

		assert!(rule.check(&image(1, "image/png")).is_none());
		assert_eq!(
			rule.check(&image(1, "image/gif")).as_deref(),
			Some("Unsupported file type, allowed: image/jpeg, image/png.")
		);
	}

	#[test]
	fn custom_messages_replace_defaults() {
		let rule = Rule::max_length(1).with_message("too long");

		assert_eq!(rule.check(&"ab".into()).as_deref(), Some("too long"));
		assert_eq!(
			Rule::min_length(2).check(&"a".into()).as_deref(),
			Some("Must be at least 2 characters long.")
		);
	}

	#[test]
	fn rules_serialize_as_tagged_objects() {
		let rule = Rule::pattern(Pattern::new("^a+$").expect("Pattern should compile."))
			.with_message("only a");
		let json = serde_json::to_value(&rule).expect("Rule should serialize.");

		assert_eq!(
			json,
			serde_json::json!({ "type": "pattern", "pattern": "^a+$", "message": "only a" })
		);

		let decoded: Rule = serde_json::from_value(json).expect("Rule should decode.");

		assert_eq!(decoded, rule);

		let size: Rule =
			serde_json::from_value(serde_json::json!({ "type": "file_size", "max_mb": 2 }))
				.expect("Rule should decode.");

		assert_eq!(size, Rule::file_size(2));
		assert!(
			serde_json::from_value::<Rule>(serde_json::json!({ "type": "pattern", "pattern": "(" }))
				.is_err()
		);
	}
}
