//! Field normalization for raw table cells.
//!
//! Every function here is total: malformed input degrades to an empty or
//! default value instead of failing, so a bad cell never drops a record.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::reconstruct::RawRecord;
use crate::student::{Gender, Student};

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\((\d{2})\)\s*(\d{4,5})-(\d{4})").expect("phone pattern is valid")
    })
}

fn birthdate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{2})/(\d{2})/(\d{4})").expect("date pattern is valid"))
}

/// How extracted phone numbers are written out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PhoneFormat {
    /// `(27) 99999-8888`, one space after the area code.
    #[default]
    Display,
    /// `(27)99999-8888`, all whitespace removed.
    Compact,
    /// Digits only, prefixed with a country code: `5527999998888`.
    Dial { country_code: String },
}

/// Collapse whitespace runs (newlines included) to one space, trim, and
/// strip stray double quotes left by the extractor.
pub fn clean_text(s: &str) -> String {
    s.replace('"', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map the report's single-letter gender code.
pub fn normalize_gender(code: &str) -> Gender {
    match clean_text(code).to_uppercase().as_str() {
        "M" => Gender::Masculino,
        "F" => Gender::Feminino,
        _ => Gender::Unspecified,
    }
}

/// Parse an age cell such as `14 anos`; anything unparseable becomes 0.
pub fn normalize_age(text: &str) -> u32 {
    clean_text(text)
        .replace("anos", "")
        .trim()
        .parse()
        .unwrap_or(0)
}

/// Find every `(DD) NNNN[N]-NNNN` occurrence, in source order.
pub fn extract_phones(text: &str, format: &PhoneFormat) -> Vec<String> {
    phone_re()
        .captures_iter(text)
        .map(|caps| {
            let (ddd, prefix, suffix) = (&caps[1], &caps[2], &caps[3]);
            match format {
                PhoneFormat::Display => format!("({ddd}) {prefix}-{suffix}"),
                PhoneFormat::Compact => format!("({ddd}){prefix}-{suffix}"),
                PhoneFormat::Dial { country_code } => {
                    format!("{country_code}{ddd}{prefix}{suffix}")
                }
            }
        })
        .collect()
}

/// First `DD/MM/YYYY` in the text, rewritten as `YYYY-MM-DD`.
pub fn extract_birthdate(text: &str) -> Option<String> {
    birthdate_re()
        .captures(text)
        .map(|caps| format!("{}-{}-{}", &caps[3], &caps[2], &caps[1]))
}

/// Turn a reconstructed raw record into a [`Student`].
pub fn normalize_record(raw: &RawRecord, format: &PhoneFormat) -> Student {
    Student::new(
        clean_text(&raw.name),
        extract_birthdate(&raw.birth_date),
        normalize_gender(&raw.gender),
        normalize_age(&raw.age),
        extract_phones(&raw.phones, format),
    )
}

/// Capitalize the first letter of each word and lowercase the rest.
pub fn title_case(name: &str) -> String {
    clean_text(name)
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Strip accents and punctuation: NFKD, drop combining marks, lowercase,
/// keep only ASCII letters, digits and spaces.
pub fn ascii_fold(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect()
}
