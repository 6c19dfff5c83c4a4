use chat_stats::models::{Message, MessageTable, Sender};
use chat_stats::nlp::{
    is_cjk_word, load_stop_words, parse_stop_words, top_words, word_frequencies, TextAnalyzer,
};
use chrono::NaiveDateTime;
use proptest::prelude::*;
use std::collections::HashSet;
use std::io::Write;

fn analyzer(stop: &[&str]) -> TextAnalyzer {
    TextAnalyzer::new(stop.iter().map(ToString::to_string).collect())
        .expect("Failed to create text analyzer")
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

#[test]
fn test_load_stop_words_trims_lines() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(file, "的\r\n  我们 \n\n了\n").unwrap();

    let stop = load_stop_words(file.path()).unwrap();
    assert_eq!(stop.len(), 3);
    assert!(stop.contains("我们"));
    assert!(stop.contains("的"));
    assert!(!stop.contains(""));
}

#[test]
fn test_load_stop_words_missing_file() {
    assert!(load_stop_words(std::path::Path::new("/nonexistent/stop.txt")).is_err());
}

#[test]
fn test_segment_keeps_all_text() {
    let analyzer = analyzer(&[]);
    let tokens = analyzer.segment("我们今天去吃火锅");
    assert_eq!(tokens.concat(), "我们今天去吃火锅");
    assert!(tokens.len() > 1);
}

#[test]
fn test_filter_tokens() {
    let analyzer = analyzer(&["我们"]);
    let filtered = analyzer.filter_tokens(words(&["我们", "火锅", "去", "hello", "ok好", "今天", "，"]));
    assert_eq!(filtered, words(&["火锅", "今天"]));
    assert_eq!(analyzer.stop_word_count(), 1);
}

#[test]
fn test_corpus_splits_by_sender() {
    let ts = NaiveDateTime::parse_from_str("2023-05-03 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
    let table = MessageTable::new(vec![
        Message::new(Sender::SelfUser, "火锅", ts),
        Message::new(Sender::Other, "火锅 火锅", ts),
        Message::new(Sender::Other, "", ts),
    ]);
    let corpus = analyzer(&[]).corpus(&table);

    assert_eq!(corpus.all.len(), 3);
    assert_eq!(corpus.self_user, words(&["火锅"]));
    assert_eq!(corpus.other.len(), 2);
}

#[test]
fn test_top_words_ties_keep_first_seen_order() {
    let tokens = words(&["火锅", "电影", "电影", "火锅", "晚安", "周末"]);
    assert_eq!(
        top_words(&tokens, 3),
        vec![
            ("火锅".to_string(), 2),
            ("电影".to_string(), 2),
            ("晚安".to_string(), 1)
        ]
    );
}

#[test]
fn test_word_frequencies_full_table() {
    let tokens = words(&["晚安", "火锅", "火锅"]);
    let freq = word_frequencies(&tokens);
    assert_eq!(freq.len(), 2);
    assert_eq!(freq[0], ("火锅".to_string(), 2));
}

#[test]
fn test_parse_stop_words_empty() {
    assert!(parse_stop_words("\n\n  \n").is_empty());
}

proptest! {
    // Building the jieba dictionary dominates each case
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_filter_removes_short_and_stop_words(
        tokens in proptest::collection::vec("[a-z\u{4e00}-\u{4e20}，]{0,3}", 0..50),
        stop in proptest::collection::hash_set("[\u{4e00}-\u{4e20}]{2}", 0..10),
    ) {
        let stop_list: Vec<&str> = stop.iter().map(String::as_str).collect();
        let filtered = analyzer(&stop_list).filter_tokens(tokens.clone());

        for word in &filtered {
            prop_assert!(word.chars().count() > 1);
            prop_assert!(is_cjk_word(word));
            prop_assert!(!stop.contains(word));
        }
        let expected: Vec<&String> = tokens
            .iter()
            .filter(|w| w.chars().count() > 1 && is_cjk_word(w) && !stop.contains(*w))
            .collect();
        prop_assert_eq!(filtered.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn prop_top_words_sorted_and_bounded(
        tokens in proptest::collection::vec("[\u{4e00}-\u{4e08}]{2}", 0..100),
        n in 1usize..20,
    ) {
        let top = top_words(&tokens, n);
        prop_assert!(top.len() <= n);
        prop_assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));

        // Equal counts appear in first-occurrence order
        let first_seen = |word: &str| tokens.iter().position(|t| t == word);
        for w in top.windows(2).filter(|w| w[0].1 == w[1].1) {
            prop_assert!(first_seen(&w[0].0) < first_seen(&w[1].0));
        }

        let distinct: HashSet<&String> = tokens.iter().collect();
        prop_assert_eq!(top.len(), n.min(distinct.len()));
    }
}
