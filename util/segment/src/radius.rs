use serde::{Deserialize, Serialize};

/// Smallest radius a segment may carry.
pub const MIN_RADIUS: f32 = 0.001;

/// Largest radius a segment may carry.
pub const MAX_RADIUS: f32 = 100.0;

/// Radius used when the raw input is not a number at all.
pub const DEFAULT_RADIUS: f32 = 0.2;

/// A radius exactly as it arrived from the outside world.
///
/// Radii are typed into free-text fields, so both forms are accepted. Config files may carry
/// either a string or a number for the same field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRadius {
	Number(f64),
	Text(String),
}

impl RawRadius {
	/// Interprets the raw value as a number. `None` means "not a number".
	///
	/// Text follows form-field semantics: surrounding whitespace is ignored and an empty
	/// field reads as zero.
	pub fn as_number(&self) -> Option<f64> {
		let value = match self {
			RawRadius::Number(value) => *value,
			RawRadius::Text(text) => {
				let trimmed = text.trim();
				if trimmed.is_empty() {
					0.0
				} else {
					parse_text(trimmed)?
				}
			}
		};

		(!value.is_nan()).then_some(value)
	}

	/// Repairs the raw value into a usable radius. See [`sanitize_radius`].
	pub fn sanitize(&self) -> f32 {
		match self.as_number() {
			Some(value) => value.abs().clamp(MIN_RADIUS as f64, MAX_RADIUS as f64) as f32,
			None => DEFAULT_RADIUS,
		}
	}
}

fn parse_text(text: &str) -> Option<f64> {
	match text {
		"Infinity" | "+Infinity" => Some(f64::INFINITY),
		"-Infinity" => Some(f64::NEG_INFINITY),
		// `str::parse` also takes spellings like "inf" and "nan" that a form field would not
		_ if text.chars().any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E')) => None,
		_ => text.parse::<f64>().ok(),
	}
}

impl Default for RawRadius {
	fn default() -> Self {
		RawRadius::Number(DEFAULT_RADIUS as f64)
	}
}

impl From<&str> for RawRadius {
	fn from(text: &str) -> Self {
		RawRadius::Text(text.to_string())
	}
}

impl From<String> for RawRadius {
	fn from(text: String) -> Self {
		RawRadius::Text(text)
	}
}

impl From<f32> for RawRadius {
	fn from(value: f32) -> Self {
		RawRadius::Number(value as f64)
	}
}

impl From<f64> for RawRadius {
	fn from(value: f64) -> Self {
		RawRadius::Number(value)
	}
}

/// Turns any raw radius into one inside `[MIN_RADIUS, MAX_RADIUS]`.
///
/// Never fails: non-numbers become [`DEFAULT_RADIUS`], negative values are taken by magnitude,
/// everything else is clamped.
pub fn sanitize_radius(raw: impl Into<RawRadius>) -> f32 {
	raw.into().sanitize()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_non_numeric_falls_back_to_default() {
		assert_eq!(sanitize_radius("abc"), DEFAULT_RADIUS);
		assert_eq!(sanitize_radius("5px"), DEFAULT_RADIUS);
		assert_eq!(sanitize_radius("NaN"), DEFAULT_RADIUS);
		assert_eq!(sanitize_radius("inf"), DEFAULT_RADIUS);
		assert_eq!(sanitize_radius("0x10"), DEFAULT_RADIUS);
		assert_eq!(sanitize_radius("0b101"), DEFAULT_RADIUS);
		assert_eq!(sanitize_radius(f64::NAN), DEFAULT_RADIUS);
	}

	#[test]
	fn test_negative_is_taken_by_magnitude() {
		assert_eq!(sanitize_radius("-3"), 3.0);
		assert_eq!(sanitize_radius(-2.5_f32), 2.5);
	}

	#[test]
	fn test_clamps_into_range() {
		assert_eq!(sanitize_radius(0.0_f32), MIN_RADIUS);
		assert_eq!(sanitize_radius("0.0000001"), MIN_RADIUS);
		assert_eq!(sanitize_radius(250.0_f32), MAX_RADIUS);
		assert_eq!(sanitize_radius("Infinity"), MAX_RADIUS);
		assert_eq!(sanitize_radius("-Infinity"), MAX_RADIUS);
	}

	#[test]
	fn test_text_follows_form_semantics() {
		// an empty field reads as zero, which is then clamped
		assert_eq!(sanitize_radius(""), MIN_RADIUS);
		assert_eq!(sanitize_radius("   "), MIN_RADIUS);
		assert_eq!(sanitize_radius(" 5 "), 5.0);
		assert_eq!(sanitize_radius("1e1"), 10.0);
	}

	#[test]
	fn test_sign_insensitive_and_always_in_range() {
		let samples = [-1000.0, -100.0, -3.5, -0.01, -0.0001, 0.0, 0.0005, 0.2, 7.25, 99.9, 1e9];
		for value in samples {
			let positive = sanitize_radius(value);
			let negative = sanitize_radius(-value);
			assert_eq!(positive, negative, "sign changed the result for {value}");
			assert!((MIN_RADIUS..=MAX_RADIUS).contains(&positive));
		}
	}

	#[test]
	fn test_raw_radius_deserializes_from_text_or_number() {
		let number: RawRadius = serde_json::from_str("4.5").unwrap();
		let text: RawRadius = serde_json::from_str("\"-3\"").unwrap();
		assert_eq!(number, RawRadius::Number(4.5));
		assert_eq!(text.sanitize(), 3.0);
	}
}
