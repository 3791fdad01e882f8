//! Stateful form validation with blur-time re-checks.

// self
use crate::validate::{self, FieldErrors, FieldValue, FormData, RuleSet};

/// Tracks per-field errors for one form.
///
/// Fields are only re-validated on blur once the form has been submitted, or when the field
/// already shows an error. This keeps first-time typing free of noise.
#[derive(Clone, Debug, Default)]
pub struct FormValidator {
	rules: RuleSet,
	errors: FieldErrors,
	submitted: bool,
}
impl FormValidator {
	/// Creates a validator with an empty error state.
	pub fn new(rules: RuleSet) -> Self {
		Self { rules, errors: FieldErrors::new(), submitted: false }
	}

	/// Validates the whole form, replacing the error state. Returns `true` when valid.
	pub fn validate(&mut self, data: &FormData) -> bool {
		self.submitted = true;
		self.errors = validate::validate_form(data, &self.rules);

		self.errors.is_empty()
	}

	/// Re-validates `field` only after a submit or when it already carries an error.
	pub fn validate_on_blur(&mut self, field: &str, value: &FieldValue) {
		if self.submitted || self.errors.contains_key(field) {
			self.validate_single_field(field, value);
		}
	}

	/// Validates one field and updates its entry; fields without rules are left untouched.
	pub fn validate_single_field(&mut self, field: &str, value: &FieldValue) -> Option<String> {
		let rules = self.rules.rules(field)?;
		let error = validate::validate_field(value, rules);

		match &error {
			Some(message) => {
				self.errors.insert(field.to_owned(), message.clone());
			},
			None => {
				self.errors.remove(field);
			},
		}

		error
	}

	/// Clears every error and the submitted flag.
	pub fn clear_errors(&mut self) {
		self.errors.clear();
		self.submitted = false;
	}

	/// Clears the error of `field`.
	pub fn clear_field_error(&mut self, field: &str) {
		self.errors.remove(field);
	}

	/// Sets an error from outside the rules, e.g. a server-side rejection.
	pub fn set_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
		self.errors.insert(field.into(), message.into());
	}

	/// Current error of `field`.
	pub fn field_error(&self, field: &str) -> Option<&str> {
		self.errors.get(field).map(String::as_str)
	}

	/// Returns `true` when `field` carries an error.
	pub fn has_error(&self, field: &str) -> bool {
		self.errors.contains_key(field)
	}

	/// Returns `true` when any field carries an error.
	pub fn has_errors(&self) -> bool {
		validate::has_errors(&self.errors)
	}

	/// Current error state.
	pub fn errors(&self) -> &FieldErrors {
		&self.errors
	}

	/// Returns `true` after [`validate`](Self::validate) until
	/// [`clear_errors`](Self::clear_errors).
	pub fn is_submitted(&self) -> bool {
		self.submitted
	}

	/// Rules this validator evaluates.
	pub fn rules(&self) -> &RuleSet {
		&self.rules
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::validate::common_rules;

	fn validator() -> FormValidator {
		FormValidator::new(
			RuleSet::new()
				.field("title", common_rules::title())
				.field("description", common_rules::description()),
		)
	}

	fn data(title: &str) -> FormData {
		FormData::from([("title".to_string(), FieldValue::from(title))])
	}

	#[test]
	fn validate_reports_first_failures_and_marks_submitted() {
		let mut form = validator();

		assert!(!form.validate(&data("")));
		assert!(form.is_submitted());
		assert!(form.has_error("title"));
		assert!(!form.has_error("description"));
		assert_eq!(form.field_error("title"), Some("Please enter a title."));
		assert!(form.validate(&data("ok")));
		assert!(!form.has_errors());
	}

	#[test]
	fn blur_is_quiet_before_the_first_submit() {
		let mut form = validator();

		form.validate_on_blur("title", &"".into());

		assert!(!form.has_errors());

		form.set_field_error("title", "server says no");
		form.validate_on_blur("title", &"fixed".into());

		assert_eq!(form.field_error("title"), None);

		form.validate(&data("ok"));
		form.validate_on_blur("title", &"".into());

		assert_eq!(form.field_error("title"), Some("Please enter a title."));
	}

	#[test]
	fn clear_errors_is_idempotent() {
		let mut form = validator();

		form.validate(&data(""));
		form.clear_errors();

		let once = (form.errors().clone(), form.is_submitted());

		form.clear_errors();

		assert_eq!((form.errors().clone(), form.is_submitted()), once);
		assert!(once.0.is_empty());
		assert!(!once.1);
	}

	#[test]
	fn single_field_helpers_update_one_entry() {
		let mut form = validator();

		assert_eq!(form.validate_single_field("unknown", &FieldValue::Null), None);
		assert_eq!(
			form.validate_single_field("description", &"d".repeat(501).into()).as_deref(),
			Some("Description must not exceed 500 characters.")
		);

		form.set_field_error("title", "taken");
		form.clear_field_error("description");

		assert_eq!(form.errors().len(), 1);
		assert_eq!(form.field_error("title"), Some("taken"));
	}
}
