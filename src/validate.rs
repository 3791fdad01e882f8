//! Declarative rule-based form validation.
//!
//! A [`RuleSet`] maps field names to ordered [`Rule`] sequences. Fields are evaluated in
//! insertion order, and within a field the first failing rule wins. Absent fields validate as
//! [`FieldValue::Null`], so only [`RuleKind::Required`] rejects them.

pub mod common_rules;
pub mod form;
pub mod rule;

pub use form::FormValidator;
pub use rule::{Pattern, Rule, RuleKind};

// std
use std::borrow::Cow;
// self
use crate::_prelude::*;

/// Submitted form values keyed by field name.
pub type FormData = BTreeMap<String, FieldValue>;

/// Field name → first failing rule's message. A field is present iff its last validation failed.
pub type FieldErrors = BTreeMap<String, String>;

/// Metadata of a file picked for upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
	/// File name.
	pub name: String,
	/// Size in bytes.
	pub size: u64,
	/// Declared media type, e.g. `image/png`.
	pub media_type: String,
}
impl FileInfo {
	/// Creates file metadata.
	pub fn new(name: impl Into<String>, size: u64, media_type: impl Into<String>) -> Self {
		Self { name: name.into(), size, media_type: media_type.into() }
	}
}

/// Dynamically typed form value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
	/// Missing or cleared value.
	#[default]
	Null,
	/// Checkbox or toggle.
	Bool(bool),
	/// Numeric input.
	Number(f64),
	/// Text input.
	Text(String),
	/// Multi-select or tag list.
	List(Vec<FieldValue>),
	/// File input.
	File(FileInfo),
}
impl FieldValue {
	/// Returns `true` for null, empty text, and empty lists.
	pub fn is_empty(&self) -> bool {
		match self {
			FieldValue::Null => true,
			FieldValue::Text(text) => text.is_empty(),
			FieldValue::List(items) => items.is_empty(),
			FieldValue::Bool(_) | FieldValue::Number(_) | FieldValue::File(_) => false,
		}
	}

	/// Character count of text or element count of lists.
	pub fn length(&self) -> Option<usize> {
		match self {
			FieldValue::Text(text) => Some(text.chars().count()),
			FieldValue::List(items) => Some(items.len()),
			_ => None,
		}
	}

	/// Numeric view: numbers as-is, text when it parses as a number.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			FieldValue::Number(n) => Some(*n),
			FieldValue::Text(text) => text.trim().parse().ok(),
			_ => None,
		}
	}

	/// Textual view of scalar values; `None` for null, lists, and files.
	pub fn as_text(&self) -> Option<Cow<'_, str>> {
		match self {
			FieldValue::Text(text) => Some(Cow::Borrowed(text)),
			FieldValue::Number(n) => Some(Cow::Owned(n.to_string())),
			FieldValue::Bool(b) => Some(Cow::Owned(b.to_string())),
			_ => None,
		}
	}

	/// File metadata for file values.
	pub fn as_file(&self) -> Option<&FileInfo> {
		match self {
			FieldValue::File(file) => Some(file),
			_ => None,
		}
	}
}
impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		FieldValue::Text(value.to_owned())
	}
}
impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		FieldValue::Text(value)
	}
}
impl From<f64> for FieldValue {
	fn from(value: f64) -> Self {
		FieldValue::Number(value)
	}
}
impl From<i64> for FieldValue {
	fn from(value: i64) -> Self {
		FieldValue::Number(value as f64)
	}
}
impl From<i32> for FieldValue {
	fn from(value: i32) -> Self {
		FieldValue::Number(value.into())
	}
}
impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		FieldValue::Bool(value)
	}
}
impl From<FileInfo> for FieldValue {
	fn from(value: FileInfo) -> Self {
		FieldValue::File(value)
	}
}
impl<T> From<Option<T>> for FieldValue
where
	T: Into<FieldValue>,
{
	fn from(value: Option<T>) -> Self {
		value.map_or(FieldValue::Null, Into::into)
	}
}
impl<T> From<Vec<T>> for FieldValue
where
	T: Into<FieldValue>,
{
	fn from(value: Vec<T>) -> Self {
		FieldValue::List(value.into_iter().map(Into::into).collect())
	}
}

/// Ordered mapping of field names to rule sequences.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(Vec<(String, Vec<Rule>)>);
impl RuleSet {
	/// Creates an empty rule set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends the rules of `field`; a repeated field replaces its rules in place.
	pub fn field(
		mut self,
		field: impl Into<String>,
		rules: impl IntoIterator<Item = Rule>,
	) -> Self {
		let field = field.into();
		let rules = rules.into_iter().collect::<Vec<_>>();

		match self.0.iter_mut().find(|(name, _)| *name == field) {
			Some((_, existing)) => *existing = rules,
			None => self.0.push((field, rules)),
		}

		self
	}

	/// Rules of `field`, if any are registered.
	pub fn rules(&self, field: &str) -> Option<&[Rule]> {
		self.0.iter().find(|(name, _)| name == field).map(|(_, rules)| rules.as_slice())
	}

	/// Iterates fields in evaluation order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
		self.0.iter().map(|(name, rules)| (name.as_str(), rules.as_slice()))
	}
}

/// Returns the first failing rule's message.
pub fn validate_field(value: &FieldValue, rules: &[Rule]) -> Option<String> {
	validate_field_at(value, rules, current_year())
}

/// [`validate_field`] with an explicit reference year for [`RuleKind::Year`].
pub fn validate_field_at(value: &FieldValue, rules: &[Rule], current_year: i32) -> Option<String> {
	rules.iter().find_map(|rule| rule.check_at(value, current_year))
}

/// Validates every field of `rules` against `data`.
pub fn validate_form(data: &FormData, rules: &RuleSet) -> FieldErrors {
	let current_year = current_year();

	rules
		.iter()
		.filter_map(|(field, field_rules)| {
			let value = data.get(field).unwrap_or(&FieldValue::Null);

			validate_field_at(value, field_rules, current_year).map(|msg| (field.to_owned(), msg))
		})
		.collect()
}

/// Returns `true` when at least one field failed.
pub fn has_errors(errors: &FieldErrors) -> bool {
	!errors.is_empty()
}

pub(crate) fn current_year() -> i32 {
	OffsetDateTime::now_utc().year()
}
