// src/matching/confidence.rs - Scores how likely a place candidate is the facility
use log::debug;

use crate::matching::name::normalize_name;

pub const NAME_WEIGHT: f64 = 0.8;
pub const CITY_WEIGHT: f64 = 0.2;

/// `0.8 * name_similarity + 0.2 * city_match`, always within [0, 1].
pub fn match_confidence(
    facility_name: &str,
    facility_city: &str,
    place_name: &str,
    place_address: &str,
) -> f64 {
    let facility_normalized = normalize_name(facility_name);
    let place_normalized = normalize_name(place_name);
    let name_sim = name_similarity(&facility_normalized, &place_normalized);
    let city_match = if city_matches(facility_city, place_address) {
        1.0
    } else {
        0.0
    };

    let score = (NAME_WEIGHT * name_sim + CITY_WEIGHT * city_match).clamp(0.0, 1.0);
    debug!(
        "Confidence '{}' vs '{}': name={:.4}, city={}, score={:.4}",
        facility_normalized, place_normalized, name_sim, city_match, score
    );
    score
}

/// Symmetric longest-common-subsequence ratio: `2 * lcs / (len_a + len_b)`.
/// Two empty strings are identical (1.0); one empty string shares nothing (0.0).
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();
    if total == 0 {
        return 1.0;
    }
    let lcs = lcs_length(&a_chars, &b_chars);
    (2 * lcs) as f64 / total as f64
}

fn lcs_length(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    // Two rolling rows over the shorter string.
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut previous = vec![0usize; inner.len() + 1];
    let mut current = vec![0usize; inner.len() + 1];

    for outer_char in outer {
        for (j, inner_char) in inner.iter().enumerate() {
            current[j + 1] = if outer_char == inner_char {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[inner.len()]
}

/// True when the facility city appears as a whole word in the candidate address.
pub fn city_matches(facility_city: &str, place_address: &str) -> bool {
    let city = facility_city.trim().to_lowercase();
    if city.is_empty() {
        return false;
    }
    let address = place_address.to_lowercase();
    address.char_indices().any(|(start, _)| {
        if !address[start..].starts_with(&city) {
            return false;
        }
        let before = address[..start].chars().next_back();
        let after = address[start + city.len()..].chars().next();
        is_boundary(before, city.chars().next()) && is_boundary(city.chars().next_back(), after)
    })
}

/// Same rule as regex `\b`: exactly one side is a word character.
fn is_boundary(left: Option<char>, right: Option<char>) -> bool {
    is_word_char(left) != is_word_char(right)
}

fn is_word_char(c: Option<char>) -> bool {
    c.map_or(false, |c| c.is_alphanumeric() || c == '_')
}
