//! Field extraction from raw result-row text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Length of the `dd/mm/yyyy` publication date at the end of its label.
pub const DATE_LEN: usize = 10;

static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d.]*").expect("valid regex"));
static ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Decree number from a label such as `Decreto nº 51.234`.
///
/// Takes the first run of digits and dots, drops the separators and parses
/// the rest. Returns `-1` when no number can be read.
pub fn decree_number(label: &str) -> i64 {
    NUMBER_REGEX
        .find(label)
        .and_then(|m| m.as_str().replace('.', "").parse().ok())
        .unwrap_or(-1)
}

/// Trailing fixed-width date of a publication label.
pub fn publish_date(text: &str) -> String {
    let text = text.trim();
    let chars: Vec<char> = text.chars().collect();
    let start = chars.len().saturating_sub(DATE_LEN);
    chars[start..].iter().collect()
}

/// First integer of a detail link's query string, used as the decree's stable id.
///
/// Links without a query string are searched whole.
pub fn link_id(href: &str) -> Option<i64> {
    let query = href.split_once('?').map_or(href, |(_, query)| query);
    ID_REGEX.find(query).and_then(|m| m.as_str().parse().ok())
}
