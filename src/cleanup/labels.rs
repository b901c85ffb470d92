// src/cleanup/labels.rs - Human-readable names for facility type codes

pub const TYPE_LABELS: [(&str, &str); 11] = [
    ("TRANSLOAD", "transload"),
    ("TEAM_TRACK", "team track"),
    ("STORAGE", "rail storage"),
    ("WAREHOUSE", "warehouse"),
    ("REPAIR", "rail repair"),
    ("INTERMODAL", "intermodal"),
    ("PORT", "port"),
    ("INDUSTRIAL", "industrial"),
    ("YARD", "rail yard"),
    ("GRAIN_ELEVATOR", "grain elevator"),
    ("BULK_TRANSFER", "bulk transfer"),
];

/// Label for a known type code only.
pub fn known_type_label(code: &str) -> Option<&'static str> {
    TYPE_LABELS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| *label)
}

/// Known label, or the code itself lowercased with underscores as spaces.
/// Empty when there is no code.
pub fn type_label(code: Option<&str>) -> String {
    match code {
        None | Some("") => String::new(),
        Some(code) => known_type_label(code)
            .map(str::to_string)
            .unwrap_or_else(|| code.replace('_', " ").to_lowercase()),
    }
}

/// Uppercase the first letter of each word, lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
