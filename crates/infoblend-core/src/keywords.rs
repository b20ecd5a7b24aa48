/// Keyword candidates tried per phrase
pub const MAX_KEYWORDS: usize = 4;
/// Keyword definitions collected before the composite answer is returned
pub const MAX_KEYWORD_DEFINITIONS: usize = 3;

const MIN_KEYWORD_CHARS: usize = 3;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "of", "in", "on", "and", "or", "for", "to", "with", "by", "at", "from", "is",
    "are", "was", "were", "that", "this", "it",
];

const PUNCTUATION: &[char] = &[
    '"', '\'', '“', '”', '‘', '’', '(', ')', '[', ']', '{', '}', ',', ':', ';', '!', '?',
];

pub fn is_phrase(text: &str) -> bool {
    text.chars().any(char::is_whitespace)
}

/// Single-word lookups derived from a phrase, in first-seen order
pub fn keyword_candidates(text: &str) -> Vec<String> {
    let cleaned = text.to_lowercase().replace(PUNCTUATION, " ");
    let mut keywords: Vec<String> = Vec::new();

    for word in cleaned.split_whitespace() {
        if word.chars().count() < MIN_KEYWORD_CHARS || STOP_WORDS.contains(&word) {
            continue;
        }
        if !keywords.iter().any(|k| k == word) {
            keywords.push(word.to_string());
        }
        if keywords.len() >= MAX_KEYWORDS {
            break;
        }
    }

    keywords
}
