//! Splits an event description into a phone number and residual notes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::normalize_phone;

/// Phone-like substring: optional `+`, then 10+ characters of digits,
/// spaces, parentheses, dots and hyphens, bracketed by digits.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d\s().-]{8,}\d").expect("phone pattern is valid"));

/// Separator junk excised together with the phone substring.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ';' | '.' | '-')
}

/// Extract `(phone, notes)` from a raw DESCRIPTION value.
///
/// The first phone-like run carrying at least 9 digits is normalized and
/// excised from the text, together with the separator punctuation and
/// whitespace around it; whatever survives becomes the notes. Either side
/// can come back absent.
pub fn split_description(description: Option<&str>) -> (Option<String>, Option<String>) {
    let text = match description {
        Some(d) => d.replace('\r', ""),
        None => return (None, None),
    };
    let text = text.trim();
    if text.is_empty() {
        return (None, None);
    }

    let phone_match = PHONE_PATTERN
        .find_iter(text)
        .find(|m| m.as_str().chars().filter(|c| c.is_ascii_digit()).count() >= 9);

    let (phone, notes) = match phone_match {
        Some(m) => {
            let before = text[..m.start()].trim_end_matches(is_separator);
            let after = text[m.end()..].trim_start_matches(is_separator);
            let notes = match (before.is_empty(), after.is_empty()) {
                (true, _) => after.to_string(),
                (_, true) => before.to_string(),
                _ => format!("{before} {after}"),
            };
            (normalize_phone(m.as_str()), notes)
        }
        None => (None, text.to_string()),
    };

    let notes = if notes.is_empty() { None } else { Some(notes) };
    (phone, notes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_blank_description_yields_nothing() {
        assert_eq!(split_description(None), (None, None));
        assert_eq!(split_description(Some("")), (None, None));
        assert_eq!(split_description(Some("  \r\n ")), (None, None));
    }

    #[test]
    fn extracts_and_normalizes_phone_leaving_notes() {
        let (phone, notes) = split_description(Some("Rhinoplasty, 0532 123 45 67, arrives Tue"));
        assert_eq!(phone.as_deref(), Some("+905321234567"));
        assert_eq!(notes.as_deref(), Some("Rhinoplasty arrives Tue"));
    }

    #[test]
    fn phone_only_description_yields_absent_notes() {
        let (phone, notes) = split_description(Some("+90 (532) 123-45-67"));
        assert_eq!(phone.as_deref(), Some("+905321234567"));
        assert_eq!(notes, None);
    }

    #[test]
    fn phone_at_the_end_trims_trailing_separators() {
        let (phone, notes) = split_description(Some("call before surgery: 0532 123 45 67"));
        assert_eq!(phone.as_deref(), Some("+905321234567"));
        assert_eq!(notes.as_deref(), Some("call before surgery:"));
    }

    #[test]
    fn text_without_phone_keeps_full_notes() {
        let (phone, notes) = split_description(Some("Follow-up consult only"));
        assert_eq!(phone, None);
        assert_eq!(notes.as_deref(), Some("Follow-up consult only"));
    }

    #[test]
    fn short_digit_runs_are_not_phones() {
        // Dates and room numbers must not be mistaken for contact numbers
        let (phone, notes) = split_description(Some("Room 1203, bed 4"));
        assert_eq!(phone, None);
        assert_eq!(notes.as_deref(), Some("Room 1203, bed 4"));
    }

    #[test]
    fn carriage_returns_are_normalized_away() {
        let (phone, notes) = split_description(Some("line one\r\n0532 123 45 67\r\n"));
        assert_eq!(phone.as_deref(), Some("+905321234567"));
        assert_eq!(notes.as_deref(), Some("line one"));
    }
}
