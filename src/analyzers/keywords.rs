//! View-weighted keyword salience over upload titles.
//!
//! Naive frequency counting surfaces generic words; weighting by the views of
//! the titles a token appears in surfaces words correlated with performance.
//! Score: `frequency * ln(1 + total views of containing titles)`, monotonic
//! in both frequency and views.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::stats::UploadItem;

/// Keywords returned per summary; callers typically display the top 5.
pub const MAX_KEYWORDS: usize = 12;

const MIN_TOKEN_LEN: usize = 3;

/// Common function words excluded from keyword scoring. English only.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "you", "your", "how", "what", "why", "when",
    "this", "that", "these", "those", "are", "was", "were", "not", "but",
    "all", "can", "get", "got", "has", "have", "had", "off", "out", "our",
    "its", "new", "now", "one", "two", "too", "from", "into", "over", "will",
    "more", "most", "just", "than", "then", "them", "they", "there", "here",
    "about", "after", "before", "best", "top",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordScore {
    pub keyword: String,
    pub score: f64,
}

/// Scores every title token and returns the strongest keywords, descending.
///
/// A token counts once per title it appears in; ties break by title
/// frequency, then lexicographically, so output is deterministic.
pub fn top_keywords(items: &[UploadItem]) -> Vec<KeywordScore> {
    // token -> (titles containing it, summed views of those titles)
    let mut tally: HashMap<String, (u64, u64)> = HashMap::new();

    for item in items {
        let unique: HashSet<String> = tokenize(&item.title).into_iter().collect();
        for token in unique {
            let entry = tally.entry(token).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += item.views;
        }
    }

    let mut scored: Vec<(String, u64, f64)> = tally
        .into_iter()
        .map(|(token, (freq, views))| {
            let score = freq as f64 * (1.0 + views as f64).ln();
            (token, freq, score)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.2.total_cmp(&a.2)
            .then(b.1.cmp(&a.1))
            .then(a.0.cmp(&b.0))
    });
    scored.truncate(MAX_KEYWORDS);

    scored
        .into_iter()
        .map(|(keyword, _, score)| KeywordScore { keyword, score })
        .collect()
}

/// Splits a title into lowercase word-like tokens, dropping short tokens,
/// pure numbers, and stopwords.
pub fn tokenize(title: &str) -> Vec<String> {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
        .filter(|t| t.chars().any(char::is_alphabetic))
        .filter(|t| !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(title: &str, views: u64) -> UploadItem {
        UploadItem {
            title: title.to_string(),
            published_at: Utc::now(),
            views,
            url: String::new(),
        }
    }

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        assert_eq!(
            tokenize("Rust Tutorial: Ownership & Borrowing!"),
            vec!["rust", "tutorial", "ownership", "borrowing"]
        );
    }

    #[test]
    fn test_tokenize_drops_stopwords_and_short_tokens() {
        assert_eq!(tokenize("How to do the thing"), vec!["thing"]);
    }

    #[test]
    fn test_tokenize_drops_pure_numbers() {
        assert_eq!(tokenize("2024 budget pc build"), vec!["budget", "build"]);
    }

    #[test]
    fn test_frequent_token_outscores_rare_one() {
        let items = vec![
            item("rust tutorial basics", 100),
            item("rust tutorial advanced", 100),
            item("unboxing video", 100),
        ];

        let keywords = top_keywords(&items);
        let rust_pos = keywords.iter().position(|k| k.keyword == "rust").unwrap();
        let unboxing_pos = keywords
            .iter()
            .position(|k| k.keyword == "unboxing")
            .unwrap();
        assert!(rust_pos < unboxing_pos);
    }

    #[test]
    fn test_high_view_title_outscores_equal_frequency() {
        let items = vec![item("winner take", 1_000_000), item("loser word", 10)];

        let keywords = top_keywords(&items);
        let winner = keywords.iter().find(|k| k.keyword == "winner").unwrap();
        let loser = keywords.iter().find(|k| k.keyword == "loser").unwrap();
        assert!(winner.score > loser.score);
    }

    #[test]
    fn test_repeated_token_in_one_title_counts_once() {
        let items = vec![item("vlog vlog vlog", 100), item("cooking stream", 100)];

        let keywords = top_keywords(&items);
        let vlog = keywords.iter().find(|k| k.keyword == "vlog").unwrap();
        let cooking = keywords.iter().find(|k| k.keyword == "cooking").unwrap();
        assert_eq!(vlog.score, cooking.score);
    }

    #[test]
    fn test_output_sorted_descending_and_deduplicated() {
        let items = vec![
            item("alpha beta gamma", 500),
            item("alpha beta", 500),
            item("alpha", 500),
        ];

        let keywords = top_keywords(&items);

        for pair in keywords.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }

        let mut names: Vec<&str> = keywords.iter().map(|k| k.keyword.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), keywords.len());
    }

    #[test]
    fn test_ties_break_lexicographically() {
        let items = vec![item("zebra apple", 100)];

        let keywords = top_keywords(&items);
        assert_eq!(keywords[0].keyword, "apple");
        assert_eq!(keywords[1].keyword, "zebra");
    }

    #[test]
    fn test_cap_applies() {
        let title: String = (0..30).map(|i| format!("word{i:02} ")).collect();
        let items = vec![item(&title, 100)];

        assert_eq!(top_keywords(&items).len(), MAX_KEYWORDS);
    }

    #[test]
    fn test_empty_items_yield_no_keywords() {
        assert!(top_keywords(&[]).is_empty());
    }
}
