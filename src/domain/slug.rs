/// Derive a storage-safe document key from a URL.
///
/// Every character that is not alphanumeric, `_` or `-` becomes `-`, then
/// leading and trailing hyphens are trimmed. Runs are not collapsed, so the
/// mapping stays one character to one character.
pub fn slug_from_url(url: &str) -> String {
    let replaced: String = url
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();

    replaced.trim_matches('-').to_string()
}

/// Drop everything from the first `?` onward.
pub fn canonical_novel_url(url: &str) -> &str {
    match url.find('?') {
        Some(idx) => &url[..idx],
        None => url,
    }
}
