//! Helpers for the identification input

use crate::domain::entities::IdentificationMethod;

const PHONE_DIGITS: usize = 10;

pub const COMMON_EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "free.fr",
    "yahoo.fr",
    "live.fr",
    "hotmail.fr",
    "outlook.fr",
    "orange.fr",
    "wanadoo.fr",
    "laposte.net",
    "sfr.fr",
];

/// Keep at most ten digits, grouped by pairs ("06 12 34 56 78")
pub fn format_phone_number(value: &str) -> String {
    let digits: Vec<char> = value
        .chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect();

    digits
        .chunks(2)
        .map(|pair| pair.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_phone_number(value: &str) -> bool {
    value.chars().filter(char::is_ascii_digit).count() == PHONE_DIGITS
}

/// Complete the domain after the last `@` from the common French providers
pub fn email_suggestions(partial: &str) -> Vec<String> {
    let Some(at) = partial.rfind('@') else {
        return Vec::new();
    };
    let (local, domain) = (&partial[..at], &partial[at + 1..]);
    if domain.is_empty() {
        return Vec::new();
    }

    let domain = domain.to_lowercase();
    COMMON_EMAIL_DOMAINS
        .iter()
        .filter(|candidate| candidate.starts_with(domain.as_str()))
        .map(|candidate| format!("{}@{}", local, candidate))
        .collect()
}

/// Whether the submit button may be enabled
pub fn validate_identification(method: IdentificationMethod, value: &str) -> bool {
    match method {
        IdentificationMethod::Phone => validate_phone_number(value),
        IdentificationMethod::Email => is_valid_email(value),
    }
}

/// Syntax check plus a dotted domain, so `jean@gmail` is still incomplete
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    email_address::EmailAddress::is_valid(value)
        && value
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'))
}
