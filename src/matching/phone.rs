// src/matching/phone.rs
use log::debug;

/// Normalise North American numbers to E.164 (`+1XXXXXXXXXX`).
/// Anything that is not 10 digits, or 11 digits with a leading `1`, is
/// returned unchanged.
pub fn format_phone(raw: &str) -> String {
    let digits_only: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits_only.len() == 10 {
        return format!("+1{}", digits_only);
    }
    if digits_only.len() == 11 && digits_only.starts_with('1') {
        return format!("+{}", digits_only);
    }
    debug!(
        "Phone number '{}' has {} digits, keeping original",
        raw,
        digits_only.len()
    );
    raw.to_string()
}
