//! Heuristic credibility scoring.
//!
//! A pure function of text features, independent of sentiment polarity.
//! Starts at a baseline, applies penalties and rewards, clamps to [0, 100],
//! and always returns human-readable reason codes.

const BASELINE: f64 = 70.0;

const SHORT_TEXT_CHARS: usize = 20;
const SHORT_TEXT_PENALTY: f64 = 25.0;

const CAPS_RATIO_THRESHOLD: f64 = 0.5;
const CAPS_MIN_LETTERS: usize = 5;
const CAPS_PENALTY: f64 = 20.0;

const SPAM_PHRASE_PENALTY: f64 = 15.0;
const SPAM_PENALTY_CAP: f64 = 45.0;

const DETAILED_WORDS: usize = 30;
const DETAIL_REWARD: f64 = 10.0;

/// Phrases that strongly correlate with promotional/bot content.
const SPAM_PHRASES: &[&str] = &[
    "click here",
    "free",
    "win",
    "buy now",
    "limited offer",
    "discount code",
    "dm me",
    "follow me",
    "giveaway",
    "check out my",
];

/// Score a cleaned text's credibility on a 0–100 scale.
///
/// Returns the clamped score together with the reason codes that fired;
/// a text that triggers no rule reports `["baseline"]`.
#[must_use]
pub fn credibility_score(text: &str) -> (f64, Vec<String>) {
    let mut score = BASELINE;
    let mut reasons: Vec<String> = Vec::new();

    if text.chars().count() < SHORT_TEXT_CHARS {
        score -= SHORT_TEXT_PENALTY;
        reasons.push("very_short".to_string());
    }

    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() >= CAPS_MIN_LETTERS {
        #[allow(clippy::cast_precision_loss)]
        let caps_ratio =
            letters.iter().filter(|c| c.is_uppercase()).count() as f64 / letters.len() as f64;
        if caps_ratio > CAPS_RATIO_THRESHOLD {
            score -= CAPS_PENALTY;
            reasons.push("excessive_caps".to_string());
        }
    }

    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    let mut spam_penalty = 0.0;
    for phrase in SPAM_PHRASES {
        let hit = if phrase.contains(' ') {
            lowered.contains(phrase)
        } else {
            // Single-word indicators match whole words only, so "free"
            // does not fire on "freedom".
            words
                .iter()
                .any(|w| w.trim_matches(|c: char| !c.is_alphanumeric()) == *phrase)
        };
        if hit {
            spam_penalty += SPAM_PHRASE_PENALTY;
            reasons.push(format!("spam_phrase:{phrase}"));
        }
    }
    score -= spam_penalty.min(SPAM_PENALTY_CAP);

    if words.len() >= DETAILED_WORDS {
        score += DETAIL_REWARD;
        reasons.push("detailed".to_string());
    }

    if reasons.is_empty() {
        reasons.push("baseline".to_string());
    }

    (score.clamp(0.0, 100.0), reasons)
}
