//! Cleanup of raw completions into one presentable line.
//!
//! Hosted models often prepend a label or wrap the answer in quotes even when the
//! prompt asks them not to. [`normalize`] removes those artifacts and nothing else.

/// Labels stripped from the start of a completion, tried in this order.
pub const KNOWN_PREFIXES: [&str; 7] = [
    "Improved Resume Bullet:",
    "Improved Bullet:",
    "Improved:",
    "Resume Bullet:",
    "Bullet:",
    "Output:",
    "Result:",
];

const QUOTES: [char; 6] = ['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

fn is_separator(ch: char) -> bool {
    matches!(ch, ':' | '-' | '\u{2013}' | '\u{2014}') || ch.is_whitespace()
}

/// Turns a raw completion into the final bullet text.
///
/// The function never fails and is idempotent: `normalize(&normalize(s)) == normalize(s)`.
///
/// # Examples
///
/// ```
/// use bullet_forge::normalize;
///
/// assert_eq!(
///     normalize("Improved Bullet: \"Cut deployment time by 40%.\""),
///     "Cut deployment time by 40%."
/// );
/// assert_eq!(normalize("  Result: - Improved onboarding. -  "), "Improved onboarding.");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut current = clean_once(raw);
    // Each pass only removes characters, so this reaches a fixed point.
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(raw: &str) -> String {
    let text = raw.trim();
    let text = strip_known_prefix(text).trim();
    let text = text.trim_matches(&QUOTES[..]);
    let text = text.trim_matches(is_separator);
    text.trim().to_string()
}

fn strip_known_prefix(text: &str) -> &str {
    for prefix in KNOWN_PREFIXES {
        if let Some(head) = text.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                return &text[prefix.len()..];
            }
        }
    }
    text
}
