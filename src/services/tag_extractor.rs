//! Word-frequency tag suggestions for bookmark descriptions and bits.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

const MIN_WORD_LEN: usize = 3;

const STOPWORDS: &[&str] = &[
    "about", "after", "all", "also", "and", "any", "are", "because", "been", "before", "but",
    "can", "could", "did", "does", "for", "from", "had", "has", "have", "her", "his", "how",
    "into", "its", "just", "like", "more", "most", "not", "now", "only", "other", "our", "out",
    "over", "she", "should", "some", "such", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "those", "through", "too", "under", "very", "was", "way",
    "were", "what", "when", "where", "which", "while", "who", "why", "will", "with", "would",
    "you", "your",
];

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[\p{L}][\p{L}\p{N}'-]*").expect("static regex"))
}

/// Returns up to `limit` tags: the most frequent non-stopwords in `text`,
/// ties broken alphabetically.
pub fn extract_tags(text: &str, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for m in word_pattern().find_iter(text) {
        let word = m.as_str().trim_matches(|c| c == '\'' || c == '-').to_lowercase();
        if word.chars().count() < MIN_WORD_LEN || STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(word, _)| word).collect()
}
