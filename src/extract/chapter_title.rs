use std::sync::LazyLock;

use regex::Regex;

/// "C12:", "c7 -", "C3 "
static SHORT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^C\d+\s*[:\-]?\s*").expect("valid short prefix regex"));

/// "Chapter 12:", "chapter 12.5 -", "Chapter IV "
static LONG_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^Chapter\s+[\w.]+\s*[:\-]?\s*").expect("valid long prefix regex")
});

/// Strip a leading chapter-number prefix from a chapter link's text.
///
/// The short form wins over the long form; text with no recognised prefix is
/// returned trimmed but otherwise unchanged.
pub fn clean_chapter_title(raw: &str) -> String {
    let title = raw.trim();

    for prefix in [&*SHORT_PREFIX, &*LONG_PREFIX] {
        if let Some(m) = prefix.find(title) {
            return title[m.end()..].trim().to_string();
        }
    }

    title.to_string()
}
