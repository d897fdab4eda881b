//! Small text helpers shared by the dictionary and the formatters.

use chrono::{DateTime, Utc};

/// Split an identifier into words on camelCase boundaries, underscores,
/// hyphens and whitespace. Acronym runs stay together (`DBSNumber` →
/// `DBS`, `Number`).
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Upper-case the first character, leave the rest untouched.
pub fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `permanentDriver` → `Permanent Driver`.
pub fn humanize(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| upper_first(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title-case each dot-separated segment and join with spaces.
pub fn humanize_path(path: &str) -> String {
    path.split('.')
        .filter(|seg| !seg.is_empty())
        .map(humanize)
        .filter(|seg| !seg.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `MOTHER` → `Mother`.
pub fn capitalize(s: &str) -> String {
    upper_first(&s.trim().to_lowercase())
}

/// `ON_HOLD` → `on hold`.
pub fn humanize_enum(s: &str) -> String {
    s.trim().replace('_', " ").to_lowercase()
}

/// Whole amounts render without decimals (`£50`), others with two (`£45.50`).
pub fn format_currency(amount: f64, symbol: &str) -> String {
    if amount.fract() == 0.0 {
        format!("{symbol}{amount:.0}")
    } else {
        format!("{symbol}{amount:.2}")
    }
}

/// Render a date with a `chrono` format string.
pub fn format_date(at: &DateTime<Utc>, format: &str) -> String {
    at.format(format).to_string()
}

/// Join the non-empty parts with `sep`.
pub fn join_present<I, S>(parts: I, sep: &str) -> String
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .flatten()
        .filter(|p| !p.as_ref().trim().is_empty())
        .map(|p| p.as_ref().trim().to_string())
        .collect::<Vec<_>>()
        .join(sep)
}
