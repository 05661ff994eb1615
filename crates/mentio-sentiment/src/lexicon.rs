//! Polarity lexicon and the deterministic fallback scorer.

use mentio_core::SentimentLabel;

/// Word weights for general product-opinion language.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The raw score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("great", 0.4),
    ("good", 0.3),
    ("excellent", 0.5),
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("love", 0.5),
    ("loved", 0.5),
    ("like", 0.2),
    ("best", 0.5),
    ("perfect", 0.5),
    ("recommend", 0.4),
    ("solid", 0.3),
    ("fast", 0.3),
    ("reliable", 0.4),
    ("sturdy", 0.3),
    ("comfortable", 0.3),
    ("beautiful", 0.4),
    ("worth", 0.3),
    ("happy", 0.4),
    ("impressed", 0.4),
    // Negative signals
    ("bad", -0.4),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("worst", -0.6),
    ("hate", -0.5),
    ("broken", -0.5),
    ("defective", -0.6),
    ("useless", -0.5),
    ("slow", -0.3),
    ("cheap", -0.2),
    ("flimsy", -0.4),
    ("disappointed", -0.5),
    ("disappointing", -0.5),
    ("refund", -0.4),
    ("return", -0.3),
    ("scam", -0.7),
    ("waste", -0.5),
    ("poor", -0.4),
    ("overpriced", -0.4),
    ("uncomfortable", -0.3),
    ("dangerous", -0.6),
    ("recall", -0.6),
];

/// Score a text with the lexicon.
///
/// Splits text into lowercase words, sums matching weights, and clamps the
/// result to `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> f64 {
    let mut score = 0.0_f64;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        for &(lex_word, weight) in LEXICON {
            if w == lex_word {
                score += weight;
                break;
            }
        }
    }
    score.clamp(-1.0, 1.0)
}

/// Map a `[-1, 1]` lexicon polarity onto the engine's `[0, 1]` scale
/// (0.5 is neutral).
#[must_use]
pub fn polarity_to_unit(polarity: f64) -> f64 {
    ((polarity + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Classify a `[0, 1]` score into a label.
#[must_use]
pub fn label_for_score(score: f64) -> SentimentLabel {
    if score >= 0.6 {
        SentimentLabel::Positive
    } else if score <= 0.4 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
