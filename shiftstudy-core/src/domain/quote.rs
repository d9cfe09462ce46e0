//! Motivational quote model

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A quote shown on the home dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub content: String,
    pub author: String,
}

impl Quote {
    pub fn new(content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: author.into(),
        }
    }
}

/// Quotes used when the remote service cannot be reached
pub const FALLBACK_QUOTES: [(&str, &str); 10] = [
    (
        "Education is the most powerful weapon which you can use to change the world.",
        "Nelson Mandela",
    ),
    (
        "The beautiful thing about learning is that no one can take it away from you.",
        "B.B. King",
    ),
    (
        "Live as if you were to die tomorrow. Learn as if you were to live forever.",
        "Mahatma Gandhi",
    ),
    (
        "An investment in knowledge pays the best interest.",
        "Benjamin Franklin",
    ),
    (
        "The more that you read, the more things you will know. The more that you learn, the more places you'll go.",
        "Dr. Seuss",
    ),
    (
        "Education is not preparation for life; education is life itself.",
        "John Dewey",
    ),
    (
        "The mind is not a vessel to be filled, but a fire to be kindled.",
        "Plutarch",
    ),
    ("Learning never exhausts the mind.", "Leonardo da Vinci"),
    ("The expert in anything was once a beginner.", "Helen Hayes"),
    (
        "Success is the sum of small efforts repeated day in and day out.",
        "Robert Collier",
    ),
];

/// Pick one of the fallback quotes at random
pub fn fallback_quote<R: Rng + ?Sized>(rng: &mut R) -> Quote {
    let (content, author) = FALLBACK_QUOTES
        .choose(rng)
        .copied()
        .unwrap_or(FALLBACK_QUOTES[0]);
    Quote::new(content, author)
}
