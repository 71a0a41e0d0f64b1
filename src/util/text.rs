// src/util/text.rs
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::LazyLock;

static SHARE_ROUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:n|public|shared)/([^/]+)/?$").expect("share route pattern is valid")
});

/// Extract the first non-empty line of a note body, shortened to `max_chars`.
///
/// # Examples
///
/// ```
/// use noteshare::util::text::preview;
///
/// assert_eq!(preview("\n  Buy milk\nand eggs", 40), "Buy milk");
/// assert_eq!(preview("abcdefgh", 4), "abc…");
/// ```
pub fn preview(content: &str, max_chars: usize) -> String {
    let line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    if line.chars().count() <= max_chars {
        return line.to_string();
    }

    let mut shortened: String = line.chars().take(max_chars.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}

/// Extract a share token from either a bare token or a public share URL.
///
/// Recognises the `/n/{token}`, `/public/{token}` and `/shared/{token}`
/// routes and otherwise falls back to the last path segment. The token is
/// returned percent-decoded, ready to be placed in a request path again.
///
/// # Examples
///
/// ```
/// use noteshare::util::text::extract_share_token;
///
/// assert_eq!(extract_share_token("https://notes.example/n/k3y"), Some("k3y".to_string()));
/// assert_eq!(extract_share_token("k3y"), Some("k3y".to_string()));
/// assert_eq!(extract_share_token("  "), None);
/// ```
pub fn extract_share_token(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let without_suffix = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let path = match without_suffix.split_once("://") {
        Some((_, rest)) => match rest.find('/') {
            Some(idx) => &rest[idx..],
            None => return None,
        },
        None => without_suffix,
    };

    let segment = match SHARE_ROUTE.captures(path).and_then(|caps| caps.get(1)) {
        Some(m) => m.as_str(),
        None => path.split('/').rev().find(|segment| !segment.is_empty())?,
    };

    Some(percent_decode_str(segment).decode_utf8_lossy().into_owned())
}
