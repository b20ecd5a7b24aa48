use std::env;

pub const TEXT_PLACEHOLDER: &str = "{text}";

fn default_word() -> String {
    "What is \"{text}\"? Give a very short, simple definition.".to_string()
}

fn default_phrase() -> String {
    "Explain this in one short, simple line: '{text}'".to_string()
}

/// Prompt templates for the chat endpoint. `{text}` is replaced with the
/// selection.
#[derive(Clone, Debug)]
pub struct PromptConfig {
    pub word: String,
    pub phrase: String,
}

impl PromptConfig {
    pub fn new() -> Self {
        let word = env::var("INFOBLEND_PROMPT_WORD")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_word);

        let phrase = env::var("INFOBLEND_PROMPT_PHRASE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_phrase);

        Self { word, phrase }
    }

    /// Render the prompt for `text`, picking the phrase template when the
    /// text contains whitespace.
    pub fn render(&self, text: &str) -> String {
        let template = if text.chars().any(char::is_whitespace) {
            &self.phrase
        } else {
            &self.word
        };
        template.replace(TEXT_PLACEHOLDER, text)
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            word: default_word(),
            phrase: default_phrase(),
        }
    }
}
