//! Aspect-level sentiment extraction.
//!
//! Two interchangeable strategies implement one [`AspectExtractor`]
//! contract: descriptor-window pairing (preferred) and plain category
//! keyword matching. The strategy is selected once at startup from config;
//! business logic never branches on which one is active.

use mentio_core::{AspectMode, AspectScore};

use crate::lexicon::{lexicon_score, polarity_to_unit, LEXICON};

/// Known aspect categories and the nouns that signal them.
const ASPECT_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "quality",
        &[
            "quality", "build", "material", "materials", "construction", "finish", "durability",
        ],
    ),
    (
        "price",
        &["price", "cost", "value", "money", "expensive", "overpriced", "deal"],
    ),
    (
        "shipping",
        &["shipping", "delivery", "arrived", "package", "packaging", "courier"],
    ),
    (
        "service",
        &["service", "support", "staff", "warranty", "helpdesk", "refund"],
    ),
    (
        "design",
        &["design", "look", "looks", "style", "color", "size", "weight"],
    ),
    (
        "performance",
        &["performance", "battery", "speed", "screen", "sound", "camera"],
    ),
];

/// Extracts per-aspect sentiment from one cleaned text.
pub trait AspectExtractor: Send + Sync {
    /// Aspect scores in [0, 1], one entry per detected category.
    fn extract(&self, text: &str) -> Vec<AspectScore>;

    /// Strategy name for logging.
    fn name(&self) -> &'static str;
}

/// Pick the extractor implementation for the configured mode.
#[must_use]
pub fn select_aspect_extractor(mode: AspectMode) -> Box<dyn AspectExtractor> {
    match mode {
        AspectMode::Window => Box::new(WindowAspectExtractor),
        AspectMode::Keyword => Box::new(KeywordAspectExtractor),
    }
}

fn category_for(word: &str) -> Option<&'static str> {
    ASPECT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.contains(&word))
        .map(|(category, _)| *category)
}

fn fold_scores(collected: Vec<(&'static str, f64)>) -> Vec<AspectScore> {
    let mut sums: Vec<(&'static str, f64, usize)> = Vec::new();

    for (category, score) in collected {
        match sums.iter_mut().find(|(c, _, _)| *c == category) {
            Some((_, sum, n)) => {
                *sum += score;
                *n += 1;
            }
            None => sums.push((category, score, 1)),
        }
    }

    sums.into_iter()
        .map(|(category, sum, n)| AspectScore {
            aspect: category.to_string(),
            #[allow(clippy::cast_precision_loss)]
            score: sum / n as f64,
        })
        .collect()
}

fn normalized_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphabetic())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Pairs aspect nouns with sentiment descriptors found in a small window
/// around them. An aspect mention with no nearby descriptor is skipped —
/// "the battery exists" carries no opinion.
pub struct WindowAspectExtractor;

const DESCRIPTOR_WINDOW: usize = 3;

impl AspectExtractor for WindowAspectExtractor {
    fn extract(&self, text: &str) -> Vec<AspectScore> {
        let words = normalized_words(text);
        let mut collected: Vec<(&'static str, f64)> = Vec::new();

        for (idx, word) in words.iter().enumerate() {
            let Some(category) = category_for(word.as_str()) else {
                continue;
            };

            let start = idx.saturating_sub(DESCRIPTOR_WINDOW);
            let end = (idx + DESCRIPTOR_WINDOW + 1).min(words.len());

            let mut weights: Vec<f64> = Vec::new();
            for neighbor in &words[start..end] {
                if let Some(&(_, weight)) =
                    LEXICON.iter().find(|(lex_word, _)| *lex_word == neighbor)
                {
                    weights.push(weight);
                }
            }

            if weights.is_empty() {
                continue;
            }

            #[allow(clippy::cast_precision_loss)]
            let mean = weights.iter().sum::<f64>() / weights.len() as f64;
            collected.push((category, polarity_to_unit(mean)));
        }

        fold_scores(collected)
    }

    fn name(&self) -> &'static str {
        "window"
    }
}

/// Scores each category by the lexicon polarity of the sentences that
/// mention it.
pub struct KeywordAspectExtractor;

impl AspectExtractor for KeywordAspectExtractor {
    fn extract(&self, text: &str) -> Vec<AspectScore> {
        let mut collected: Vec<(&'static str, f64)> = Vec::new();

        for sentence in text.split(['.', '!', '?']) {
            if sentence.trim().is_empty() {
                continue;
            }

            let sentence_score = polarity_to_unit(lexicon_score(sentence));
            let words = normalized_words(sentence);

            let mut seen_in_sentence: Vec<&'static str> = Vec::new();
            for word in &words {
                if let Some(category) = category_for(word.as_str()) {
                    if !seen_in_sentence.contains(&category) {
                        seen_in_sentence.push(category);
                        collected.push((category, sentence_score));
                    }
                }
            }
        }

        fold_scores(collected)
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}
