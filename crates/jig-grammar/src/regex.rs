//! Regex text helpers for generated patterns.
//!
//! Generated grammars are plain data, so regexes are assembled as strings
//! here rather than compiled.

/// Escapes every Oniguruma metacharacter in `text`.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '.' | '^' | '$' | '|' | '?' | '*' | '+' | '(' | ')' | '[' | ']' | '{' | '}'
                | '-' | '/' | '#'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Joins `names` into an alternation body, longest first.
///
/// Names are deduplicated case-insensitively and escaped. Longest-first
/// ordering keeps a short name from shadowing a longer one that shares its
/// prefix when the alternation is not followed by a boundary.
#[must_use]
pub fn alternation<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut unique: Vec<&str> = Vec::new();
    for name in names {
        if !unique
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(name))
        {
            unique.push(name);
        }
    }
    unique.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    unique
        .into_iter()
        .map(escape)
        .collect::<Vec<_>>()
        .join("|")
}

/// Wraps `body` in a case-insensitive group.
#[must_use]
pub fn case_insensitive(body: &str) -> String {
    format!("(?i:{body})")
}
