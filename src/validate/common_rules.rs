//! Rule sequences shared by the gallery's photo and album forms.

// self
use crate::validate::Rule;

/// Media types accepted for photo uploads.
pub const IMAGE_MEDIA_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Required title of at most 100 characters.
pub fn title() -> Vec<Rule> {
	vec![
		Rule::required().with_message("Please enter a title."),
		Rule::max_length(100).with_message("Title must not exceed 100 characters."),
	]
}

/// Optional description of at most 500 characters.
pub fn description() -> Vec<Rule> {
	vec![Rule::max_length(500).with_message("Description must not exceed 500 characters.")]
}

/// Optional shot year.
pub fn year() -> Vec<Rule> {
	vec![Rule::year().with_message("Please enter a valid year.")]
}

/// JPEG, PNG, or WebP image of at most 10 MB.
pub fn image_file() -> Vec<Rule> {
	vec![
		Rule::file_size(10).with_message("Image size must not exceed 10 MB."),
		Rule::file_type(IMAGE_MEDIA_TYPES)
			.with_message("Only JPG, PNG, and WebP images are supported."),
	]
}

/// Plain required field with the default message.
pub fn required() -> Vec<Rule> {
	vec![Rule::required()]
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::validate::{FieldValue, FileInfo, validate_field};

	#[test]
	fn image_rules_check_size_before_type() {
		let huge_gif: FieldValue = FileInfo::new("a.gif", 11 * 1_048_576, "image/gif").into();
		let small_gif: FieldValue = FileInfo::new("a.gif", 10, "image/gif").into();
		let webp: FieldValue = FileInfo::new("a.webp", 10, "image/webp").into();

		assert_eq!(
			validate_field(&huge_gif, &image_file()).as_deref(),
			Some("Image size must not exceed 10 MB.")
		);
		assert_eq!(
			validate_field(&small_gif, &image_file()).as_deref(),
			Some("Only JPG, PNG, and WebP images are supported.")
		);
		assert_eq!(validate_field(&webp, &image_file()), None);
	}

	#[test]
	fn description_is_optional_but_bounded() {
		assert_eq!(validate_field(&FieldValue::Null, &description()), None);
		assert!(validate_field(&"d".repeat(501).into(), &description()).is_some());
		assert_eq!(
			validate_field(&FieldValue::Null, &required()).as_deref(),
			Some("This field is required.")
		);
	}
}
