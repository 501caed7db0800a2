use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::ContactInfo;
use crate::parsing::nlp::NlpModel;

/// How much of the document the entity recogniser sees when looking for a location.
const LOCATION_WINDOW_CHARS: usize = 1000;

pub(crate) static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

// Optional country code, optional parenthesised area code, `.`/`-`/space separators.
// The leading guard keeps the tail of a longer digit run from matching.
pub(crate) static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[^\d])(?P<phone>(?:\+?\d{1,3}[ .-]?)?(?:\(\d{3}\)|\d{3})[ .-]?\d{3}[ .-]?\d{4})\b",
    )
    .expect("valid phone regex")
});

/// Pulls contact details from the full document text.
pub fn extract_contact(text: &str, nlp: &dyn NlpModel) -> ContactInfo {
    let email = EMAIL_REGEX.find(text).map(|m| m.as_str().to_string());
    let phone = PHONE_REGEX
        .captures(text)
        .and_then(|caps| caps.name("phone"))
        .map(|m| m.as_str().trim().to_string());

    let full_name = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !EMAIL_REGEX.is_match(line) && !PHONE_REGEX.is_match(line))
        .map(str::to_string);

    let window = match text.char_indices().nth(LOCATION_WINDOW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    };
    let location = nlp
        .extract_entities(window)
        .into_iter()
        .find(|e| e.is_place())
        .map(|e| e.text);

    ContactInfo {
        full_name,
        email,
        phone,
        location,
    }
}
