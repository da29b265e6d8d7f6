//! Tokenizer: free text to content words.

/// Common English function words dropped by the default tokenizer.
pub const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "have", "his", "how", "its", "may", "who", "did", "does", "with",
    "from", "that", "this", "they", "them", "then", "than", "there", "their", "what", "when",
    "where", "which", "while", "will", "would", "could", "should", "been", "being", "were",
    "into", "onto", "upon", "about", "over", "under", "your", "just", "also", "very", "some",
];

/// Tokens with this many characters or fewer are dropped.
const MAX_SHORT_TOKEN_LEN: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    stopwords: &'a [&'a str],
}

impl Default for Tokenizer<'static> {
    fn default() -> Self {
        Self {
            stopwords: STOPWORDS,
        }
    }
}

impl<'a> Tokenizer<'a> {
    pub fn with_stopwords(stopwords: &'a [&'a str]) -> Self {
        Self { stopwords }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        normalized
            .split_whitespace()
            .filter(|t| t.len() > MAX_SHORT_TOKEN_LEN)
            .filter(|t| !self.stopwords.contains(t))
            .map(str::to_string)
            .collect()
    }
}

/// Tokenizes with the default stopword list.
pub fn tokenize(text: &str) -> Vec<String> {
    Tokenizer::default().tokenize(text)
}
