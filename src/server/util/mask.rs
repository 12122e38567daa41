//! US phone, zip and FEIN display masks.
//!
//! Values are stored unmasked. Masks are applied for export and removed from
//! user input. Input that does not match the expected shape is returned as-is.

use std::sync::LazyLock;

use regex::Regex;

static PHONE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{3})(\d{3})(\d{4})$").expect("valid phone regex"));
static PHONE_MASKED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\((\d{3})\) (\d{3})-(\d{4})$").expect("valid phone regex"));
static ZIP_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{5})(\d{4})?$").expect("valid zip regex"));
static ZIP_MASKED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{5})-(\d{4})$").expect("valid zip regex"));
static FEIN_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})(\d{7})$").expect("valid fein regex"));
static FEIN_MASKED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})-(\d{7})$").expect("valid fein regex"));

const SPECIAL_CHARACTERS: &str = "+-&|!(){}[]^\"~*?:\\/";

/// `1234567890` -> `(123) 456-7890`
pub fn apply_phone_mask(number: &str) -> String {
    match PHONE_DIGITS.captures(number) {
        Some(c) => format!("({}) {}-{}", &c[1], &c[2], &c[3]),
        None => number.to_string(),
    }
}

pub fn remove_phone_mask(number: &str) -> String {
    match PHONE_MASKED.captures(number) {
        Some(c) => format!("{}{}{}", &c[1], &c[2], &c[3]),
        None => number.to_string(),
    }
}

/// `12345` stays, `123456789` -> `12345-6789`
pub fn apply_zip_mask(zip: &str) -> String {
    match ZIP_DIGITS.captures(zip) {
        Some(c) => match c.get(2) {
            Some(plus_four) => format!("{}-{}", &c[1], plus_four.as_str()),
            None => c[1].to_string(),
        },
        None => zip.to_string(),
    }
}

pub fn remove_zip_mask(zip: &str) -> String {
    match ZIP_MASKED.captures(zip) {
        Some(c) => format!("{}{}", &c[1], &c[2]),
        None => zip.to_string(),
    }
}

/// `123456789` -> `12-3456789`
pub fn apply_fein_mask(fein: &str) -> String {
    match FEIN_DIGITS.captures(fein) {
        Some(c) => format!("{}-{}", &c[1], &c[2]),
        None => fein.to_string(),
    }
}

pub fn remove_fein_mask(fein: &str) -> String {
    match FEIN_MASKED.captures(fein) {
        Some(c) => format!("{}{}", &c[1], &c[2]),
        None => fein.to_string(),
    }
}

/// Prefixes every search-syntax character with a backslash.
pub fn escape_special_characters(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if SPECIAL_CHARACTERS.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_mask_formats_ten_digits() {
        assert_eq!(apply_phone_mask("1234567890"), "(123) 456-7890");
        assert_eq!(remove_phone_mask("(123) 456-7890"), "1234567890");
    }

    #[test]
    fn phone_mask_leaves_other_input() {
        assert_eq!(apply_phone_mask("+44 20 7946 0958"), "+44 20 7946 0958");
        assert_eq!(apply_phone_mask(""), "");
        assert_eq!(remove_phone_mask("123-456-7890"), "123-456-7890");
    }

    #[test]
    fn zip_mask_handles_five_and_nine_digits() {
        assert_eq!(apply_zip_mask("12345"), "12345");
        assert_eq!(apply_zip_mask("123456789"), "12345-6789");
        assert_eq!(apply_zip_mask("1234"), "1234");
        assert_eq!(remove_zip_mask("12345-6789"), "123456789");
        assert_eq!(remove_zip_mask("12345"), "12345");
    }

    #[test]
    fn fein_mask_inserts_dash() {
        assert_eq!(apply_fein_mask("123456789"), "12-3456789");
        assert_eq!(apply_fein_mask("12345"), "12345");
        assert_eq!(remove_fein_mask("12-3456789"), "123456789");
    }

    #[test]
    fn escapes_search_syntax() {
        assert_eq!(escape_special_characters("a+b"), r"a\+b");
        assert_eq!(escape_special_characters("(x)"), r"\(x\)");
        assert_eq!(escape_special_characters(r"c:\d"), r"c\:\\d");
        assert_eq!(escape_special_characters("plain"), "plain");
    }
}
