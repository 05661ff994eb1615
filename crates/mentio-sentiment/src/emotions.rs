//! Keyword-based emotion distribution, the fallback when the inference
//! backend is unavailable.

use mentio_core::EmotionWeight;

const EMOTION_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "joy",
        &[
            "love", "loved", "great", "amazing", "awesome", "happy", "excellent", "perfect",
            "delighted", "fantastic",
        ],
    ),
    (
        "anger",
        &[
            "hate", "furious", "angry", "scam", "ripoff", "terrible", "worst", "unacceptable",
        ],
    ),
    (
        "sadness",
        &[
            "disappointed", "disappointing", "sad", "regret", "unfortunately", "waste",
        ],
    ),
    (
        "fear",
        &[
            "worried", "afraid", "dangerous", "unsafe", "scared", "concern", "recall",
        ],
    ),
    (
        "surprise",
        &["surprised", "unexpected", "wow", "unbelievable", "shocked"],
    ),
];

/// Build an emotion distribution from keyword hits, normalized so weights
/// sum to 1. Text with no emotional keywords gets a single `neutral` entry.
#[must_use]
pub(crate) fn heuristic_emotions(text: &str) -> Vec<EmotionWeight> {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        for &(emotion, keywords) in EMOTION_KEYWORDS {
            if keywords.contains(&w.as_str()) {
                match counts.iter_mut().find(|(e, _)| *e == emotion) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((emotion, 1)),
                }
                break;
            }
        }
    }

    if counts.is_empty() {
        return vec![EmotionWeight {
            emotion: "neutral".to_string(),
            weight: 1.0,
        }];
    }

    #[allow(clippy::cast_precision_loss)]
    let total: f64 = counts.iter().map(|(_, n)| *n as f64).sum();

    let mut weights: Vec<EmotionWeight> = counts
        .into_iter()
        .map(|(emotion, n)| EmotionWeight {
            emotion: emotion.to_string(),
            #[allow(clippy::cast_precision_loss)]
            weight: n as f64 / total,
        })
        .collect();

    weights.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    weights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_for_unemotional_text() {
        let emotions = heuristic_emotions("the box contains a charger");
        assert_eq!(emotions.len(), 1);
        assert_eq!(emotions[0].emotion, "neutral");
        assert_eq!(emotions[0].weight, 1.0);
    }

    #[test]
    fn joy_dominates_positive_text() {
        let emotions = heuristic_emotions("love it, amazing product, very happy");
        assert_eq!(emotions[0].emotion, "joy");
    }

    #[test]
    fn weights_sum_to_one() {
        let emotions = heuristic_emotions("love it but also disappointed and worried");
        let total: f64 = emotions.iter().map(|e| e.weight).sum();
        assert!((total - 1.0).abs() < 1e-9, "weights must sum to 1, got {total}");
        assert!(emotions.len() >= 2);
    }

    #[test]
    fn distribution_is_sorted_descending() {
        let emotions = heuristic_emotions("love love great but disappointed");
        for pair in emotions.windows(2) {
            assert!(pair[0].weight >= pair[1].weight);
        }
    }
}
