// src/matching/name.rs - Canonical comparison form for facility and place names
use once_cell::sync::Lazy;
use regex::Regex;

/// Corporate suffixes dropped when they are the last word of a name.
pub const CORPORATE_SUFFIXES: [&str; 15] = [
    "llc",
    "inc",
    "corp",
    "co",
    "ltd",
    "company",
    "industries",
    "services",
    "group",
    "solutions",
    "international",
    "enterprises",
    "holdings",
    "partners",
    "associates",
];

static TRAILING_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?i)\b({})\b\.?$", CORPORATE_SUFFIXES.join("|"));
    Regex::new(&pattern).expect("corporate suffix pattern is valid")
});

/// Lowercase, drop a trailing corporate suffix, turn punctuation into spaces and
/// collapse whitespace. Total: empty input gives an empty string.
///
/// The single pass can expose a new trailing suffix ("acme co llc", or a suffix
/// followed by punctuation), so the pass is repeated until it reaches a fixed
/// point. That makes `normalize_name(normalize_name(x)) == normalize_name(x)`.
pub fn normalize_name(name: &str) -> String {
    let mut current = normalize_once(name);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(name: &str) -> String {
    let lowered = name.to_lowercase();
    let trimmed = lowered.trim().trim_end_matches(['.', ',']);
    let without_suffix = TRAILING_SUFFIX_REGEX.replace(trimmed, "");
    let spaced: String = without_suffix
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
