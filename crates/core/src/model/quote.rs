use serde::{Deserialize, Serialize};

/// A motivational quote as returned by the quote API (`content`, `author`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub content: String,
    pub author: String,
}

impl Quote {
    #[must_use]
    pub fn new(content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: author.into(),
        }
    }
}

/// Local quotes used when the quote API cannot be reached.
pub const FALLBACK_QUOTES: [(&str, &str); 5] = [
    (
        "Education is the most powerful weapon which you can use to change the world.",
        "Nelson Mandela",
    ),
    (
        "The beautiful thing about learning is that no one can take it away from you.",
        "B.B. King",
    ),
    (
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Winston Churchill",
    ),
    ("The expert in anything was once a beginner.", "Helen Hayes"),
    (
        "Don't let what you cannot do interfere with what you can do.",
        "John Wooden",
    ),
];

/// The fallback quote at `index`, wrapping around.
#[must_use]
pub fn fallback_quote(index: usize) -> Quote {
    let (content, author) = FALLBACK_QUOTES[index % FALLBACK_QUOTES.len()];
    Quote::new(content, author)
}
