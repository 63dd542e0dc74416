use crate::domain::novel::MAX_TAGS;

/// Keyword → tag label table, matched as lowercase substrings of the title
/// and synopsis. Order matters: it decides which labels survive the cap.
pub const KEYWORD_TAGS: &[(&str, &str)] = &[
    ("reincarnat", "Reincarnation"),
    ("transmigrat", "Transmigration"),
    ("villain", "Villain"),
    ("system", "System"),
    ("cultivat", "Cultivation"),
    ("apocalyp", "Apocalypse"),
    ("game", "Game Elements"),
    ("magic", "Magic"),
    ("sword", "Sword & Magic"),
    ("god", "Gods"),
    ("demon", "Demons"),
    ("revenge", "Revenge"),
    ("academy", "Academy"),
    ("school", "School Life"),
    ("funny", "Comedy"),
    ("comedy", "Comedy"),
    ("horror", "Horror"),
    ("mystery", "Mystery"),
    ("slice of life", "Slice of Life"),
    ("bl", "BL"),
    ("boys love", "BL"),
];

/// Build a novel's tag list: the secondary genres first, in page order, then
/// one label per matching keyword. Unique, at most [`MAX_TAGS`] entries.
pub fn classify_tags(title: &str, synopsis: &str, genres: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(MAX_TAGS);

    for genre in genres {
        let genre = genre.trim();
        if !genre.is_empty() && !tags.iter().any(|t| t == genre) {
            tags.push(genre.to_string());
        }
    }

    let haystack = format!("{title} {synopsis}").to_lowercase();
    for (keyword, label) in KEYWORD_TAGS {
        if haystack.contains(keyword) && !tags.iter().any(|t| t == label) {
            tags.push(label.to_string());
        }
    }

    tags.truncate(MAX_TAGS);
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genres(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reincarnated_villain_example() {
        let tags = classify_tags(
            "The Reincarnated Villain's System",
            "...cultivation and revenge...",
            &genres(&["Fantasy"]),
        );
        assert_eq!(
            tags,
            vec!["Fantasy", "Reincarnation", "Villain", "System", "Cultivation", "Revenge"]
        );
    }

    #[test]
    fn test_genres_seed_in_order_and_trimmed() {
        let tags = classify_tags("Quiet", "", &genres(&[" Action ", "Romance"]));
        assert_eq!(tags, vec!["Action", "Romance"]);
    }

    #[test]
    fn test_duplicate_genres_collapse() {
        let tags = classify_tags("Quiet", "", &genres(&["Action", "Action", ""]));
        assert_eq!(tags, vec!["Action"]);
    }

    #[test]
    fn test_keyword_label_already_present_is_not_repeated() {
        let tags = classify_tags("A Magic Tale", "", &genres(&["Magic"]));
        assert_eq!(tags, vec!["Magic"]);
    }

    #[test]
    fn test_two_keywords_same_label() {
        let tags = classify_tags("Funny Comedy", "", &[]);
        assert_eq!(tags, vec!["Comedy"]);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let tags = classify_tags("HORROR", "<p>MYSTERY</p>", &[]);
        assert_eq!(tags, vec!["Horror", "Mystery"]);
    }

    #[test]
    fn test_cap_follows_table_order() {
        let tags = classify_tags(
            "Demon God Sword Magic Game",
            "apocalypse of the academy",
            &genres(&["Action", "Drama"]),
        );
        assert_eq!(
            tags,
            vec!["Action", "Drama", "Apocalypse", "Game Elements", "Magic", "Sword & Magic"]
        );
    }

    #[test]
    fn test_never_more_than_six_and_no_duplicates() {
        let text: String = KEYWORD_TAGS.iter().map(|(k, _)| *k).collect::<Vec<_>>().join(" ");
        let tags = classify_tags(&text, &text, &genres(&["Fantasy"]));
        assert_eq!(tags.len(), MAX_TAGS);
        let mut unique = tags.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), tags.len());
    }

    #[test]
    fn test_no_matches_no_genres() {
        assert!(classify_tags("Quiet", "<p>A calm story.</p>", &[]).is_empty());
    }
}
