//! Number spelling shared by every numeric body.

/// Shortest decimal that reads back to the same `f64`, spelled the way the
/// engine spells non-finite values.
pub(crate) fn format_double(value: f64) -> String {
	if value.is_nan() {
		return "NaN".into();
	}
	if value.is_infinite() {
		return if value > 0.0 { "Inf".into() } else { "-Inf".into() };
	}
	let magnitude = value.abs();
	if magnitude == 0.0 || (1e-5..1e15).contains(&magnitude) {
		format!("{value}")
	} else {
		format!("{value:e}")
	}
}

pub(crate) fn parse_double(token: &str) -> Option<f64> {
	match token {
		"Inf" | "inf" => Some(f64::INFINITY),
		"-Inf" | "-inf" => Some(f64::NEG_INFINITY),
		"NaN" | "nan" | "NA" => Some(f64::NAN),
		_ => token.parse().ok(),
	}
}

pub(crate) fn parse_bool(token: &str) -> Option<bool> {
	match token {
		"1" => Some(true),
		"0" => Some(false),
		_ => None,
	}
}

/// Complex element spelled `(re,im)`.
pub(crate) fn format_complex(re: f64, im: f64) -> String {
	format!("({},{})", format_double(re), format_double(im))
}

pub(crate) fn parse_complex(token: &str) -> Option<(f64, f64)> {
	let inner = token.strip_prefix('(')?.strip_suffix(')')?;
	let (re, im) = inner.split_once(',')?;
	Some((parse_double(re.trim())?, parse_double(im.trim())?))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn doubles_read_back_exactly() {
		for value in [0.0, -0.0, 1.0, 42.0, 0.1, -2.5, 1e-7, 1.5e300, 123456789.125, f64::MIN_POSITIVE] {
			let text = format_double(value);
			assert_eq!(parse_double(&text).map(f64::to_bits), Some(value.to_bits()), "{text}");
		}
	}

	#[test]
	fn special_values() {
		assert_eq!(format_double(f64::INFINITY), "Inf");
		assert_eq!(format_double(f64::NEG_INFINITY), "-Inf");
		assert_eq!(format_double(f64::NAN), "NaN");
		assert_eq!(format_double(42.0), "42");
		assert!(parse_double("NA").is_some_and(f64::is_nan));
		assert_eq!(parse_double("1e+3"), Some(1000.0));
		assert_eq!(parse_double("x"), None);
	}

	#[test]
	fn complex_tokens() {
		assert_eq!(format_complex(1.0, -2.0), "(1,-2)");
		assert_eq!(parse_complex("(1,-2)"), Some((1.0, -2.0)));
		assert_eq!(parse_complex("(Inf,NaN)").map(|(re, _)| re), Some(f64::INFINITY));
		assert_eq!(parse_complex("1,2"), None);
	}
}
