//! Contact-field normalization.
//!
//! Both functions produce canonical comparable forms for duplicate
//! matching. Neither output is meant for display.

/// Normalize a phone number into a `+`-prefixed digit string.
///
/// This is a heuristic tuned for Turkish mobile numbers (the clinic's
/// domestic case), not general E.164 normalization:
/// - a leading `+` preserves the digits verbatim behind it
/// - `00` international prefixes become `+`
/// - numbers already carrying country code `90` gain a `+`
/// - national trunk `0...` numbers become `+90...`
/// - bare 10-digit mobiles starting with `5` become `+90...`
/// - anything else gets `+` prepended as a best-effort fallback, which can
///   be wrong for foreign numbers lacking a recognizable prefix
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let has_plus = trimmed.starts_with('+');
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    if has_plus {
        return Some(format!("+{digits}"));
    }

    if digits.starts_with("00") && digits.len() > 2 {
        return Some(format!("+{}", &digits[2..]));
    }

    if digits.starts_with("90") && digits.len() >= 10 {
        return Some(format!("+{digits}"));
    }

    if digits.starts_with('0') && digits.len() >= 10 {
        return Some(format!("+90{}", &digits[1..]));
    }

    if digits.len() == 10 && digits.starts_with('5') {
        return Some(format!("+90{digits}"));
    }

    Some(format!("+{digits}"))
}

/// Normalize a person's name for equivalence comparison: trim, lowercase,
/// collapse internal whitespace runs to single spaces.
pub fn normalize_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_digitless_input_is_absent() {
        assert_eq!(normalize_phone(""), None);
        assert_eq!(normalize_phone("   "), None);
        assert_eq!(normalize_phone("call me"), None);
    }

    #[test]
    fn leading_plus_preserves_digits_verbatim() {
        assert_eq!(
            normalize_phone("+90 532 123 45 67").as_deref(),
            Some("+905321234567")
        );
        assert_eq!(normalize_phone("+1 (555) 000-1234").as_deref(), Some("+15550001234"));
    }

    #[test]
    fn double_zero_becomes_international_prefix() {
        assert_eq!(
            normalize_phone("0090 532 123 45 67").as_deref(),
            Some("+905321234567")
        );
    }

    #[test]
    fn country_code_without_plus_gains_one() {
        assert_eq!(
            normalize_phone("90 532 123 45 67").as_deref(),
            Some("+905321234567")
        );
    }

    #[test]
    fn national_trunk_zero_maps_to_plus_90() {
        assert_eq!(
            normalize_phone("0532 123 45 67").as_deref(),
            Some("+905321234567")
        );
        // Landline-style trunk numbers take the same path
        assert_eq!(
            normalize_phone("0212 345 67 89").as_deref(),
            Some("+902123456789")
        );
    }

    #[test]
    fn bare_mobile_pattern_maps_to_plus_90() {
        assert_eq!(
            normalize_phone("532 123 45 67").as_deref(),
            Some("+905321234567")
        );
    }

    #[test]
    fn unrecognized_digits_fall_back_to_plus() {
        assert_eq!(normalize_phone("12345").as_deref(), Some("+12345"));
    }

    #[test]
    fn name_normalization_is_idempotent_and_whitespace_insensitive() {
        assert_eq!(normalize_name("  Jane   Doe "), "jane doe");
        assert_eq!(normalize_name("jane doe"), "jane doe");
        let once = normalize_name("  Jane \t  DOE ");
        assert_eq!(normalize_name(&once), once);
    }
}
