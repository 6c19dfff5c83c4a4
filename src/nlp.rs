use anyhow::{Context, Result};
use jieba_rs::Jieba;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

use crate::models::{Message, MessageTable, Sender};

/// Load a stop-word list, one word per line
pub fn load_stop_words(path: &Path) -> Result<HashSet<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read stop-word list {}", path.display()))?;
    Ok(parse_stop_words(&content))
}

/// Parse stop words from text, skipping blank lines
#[must_use]
pub fn parse_stop_words(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// True when every character is a CJK unified ideograph (U+4E00..=U+9FFF)
#[must_use]
pub fn is_cjk_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}

/// Chinese text segmentation and token filtering
pub struct TextAnalyzer {
    jieba: Jieba,
    whitespace_regex: Regex,
    stop_words: HashSet<String>,
}

impl TextAnalyzer {
    /// Create an analyzer with the bundled jieba dictionary
    pub fn new(stop_words: HashSet<String>) -> Result<Self> {
        let whitespace_regex = Regex::new(r"\s+")
            .map_err(|e| anyhow::anyhow!("Failed to compile whitespace regex: {e}"))?;

        Ok(Self {
            jieba: Jieba::new(),
            whitespace_regex,
            stop_words,
        })
    }

    /// Number of loaded stop words
    #[must_use]
    pub fn stop_word_count(&self) -> usize {
        self.stop_words.len()
    }

    /// Split text into words (precise mode, HMM for unknown words)
    #[must_use]
    pub fn segment(&self, text: &str) -> Vec<String> {
        // Normalize Unicode characters
        let normalized = text.nfc().collect::<String>();
        let collapsed = self.whitespace_regex.replace_all(&normalized, " ");

        self.jieba
            .cut(&collapsed, true)
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Drop single characters, non-CJK tokens and stop words
    #[must_use]
    pub fn filter_tokens(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|word| {
                word.chars().count() > 1 && is_cjk_word(word) && !self.stop_words.contains(word)
            })
            .collect()
    }

    /// Segment and filter a sequence of messages
    pub fn tokens_for<'a, I>(&self, messages: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a Message>,
    {
        messages
            .into_iter()
            .flat_map(|m| self.filter_tokens(self.segment(&m.content)))
            .collect()
    }

    /// Build the token lists for everyone and for each side
    #[must_use]
    pub fn corpus(&self, table: &MessageTable) -> WordCorpus {
        WordCorpus {
            all: self.tokens_for(table.messages()),
            self_user: self.tokens_for(table.by_sender(Sender::SelfUser)),
            other: self.tokens_for(table.by_sender(Sender::Other)),
        }
    }
}

/// Filtered tokens per audience
#[derive(Debug, Clone, Default)]
pub struct WordCorpus {
    /// Every message
    pub all: Vec<String>,
    /// Messages sent by the exporting user
    pub self_user: Vec<String>,
    /// Messages sent by the other side
    pub other: Vec<String>,
}

/// Count every word; most frequent first, ties in first-seen order
#[must_use]
pub fn word_frequencies(tokens: &[String]) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for token in tokens {
        if let Some(&i) = index.get(token.as_str()) {
            counts[i].1 += 1;
        } else {
            index.insert(token.as_str(), counts.len());
            counts.push((token.clone(), 1));
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// The `n` most frequent words
#[must_use]
pub fn top_words(tokens: &[String], n: usize) -> Vec<(String, usize)> {
    let mut counts = word_frequencies(tokens);
    counts.truncate(n);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer(stop: &[&str]) -> TextAnalyzer {
        TextAnalyzer::new(stop.iter().map(ToString::to_string).collect())
            .expect("Failed to create text analyzer")
    }

    #[test]
    fn test_is_cjk_word() {
        assert!(is_cjk_word("你好"));
        assert!(!is_cjk_word("你好a"));
        assert!(!is_cjk_word("hello"));
        assert!(!is_cjk_word("，"));
        assert!(!is_cjk_word(""));
    }

    #[test]
    fn test_filter_tokens() {
        let processor = analyzer(&["我们"]);
        let tokens = ["我们", "公园", "去", "ok", "散步", "！！", "2023"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let filtered = processor.filter_tokens(tokens);
        assert_eq!(filtered, vec!["公园".to_string(), "散步".to_string()]);
    }

    #[test]
    fn test_segment_covers_input() {
        let processor = analyzer(&[]);
        let text = "我们今天去公园散步";
        let tokens = processor.segment(text);
        assert!(tokens.len() > 1);
        assert_eq!(tokens.concat(), text);
    }

    #[test]
    fn test_top_words_ties_keep_first_seen() {
        let tokens: Vec<String> = ["苹果", "香蕉", "香蕉", "橘子", "苹果", "葡萄"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let top = top_words(&tokens, 3);
        assert_eq!(
            top,
            vec![
                ("苹果".to_string(), 2),
                ("香蕉".to_string(), 2),
                ("橘子".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_parse_stop_words() {
        let words = parse_stop_words("的\r\n了\n\n  吗  \n");
        assert_eq!(words.len(), 3);
        assert!(words.contains("吗"));
    }
}
