//! Batch-level topic extraction.
//!
//! A stopword-filtered term-frequency pass over one ingestion batch. Cheap,
//! deterministic, and good enough to feed the dashboard's top-keywords
//! panel; it runs as a post-commit phase with its own failure handling.

use mentio_core::NewTopic;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "that", "this", "with", "was", "are", "but", "not", "you", "its",
    "it's", "has", "have", "had", "get", "got", "just", "very", "really", "too", "out", "all",
    "can", "will", "would", "about", "after", "when", "what", "from", "they", "them", "there",
    "then", "than", "some", "one", "also", "been", "being", "only", "into", "over", "your",
    "our", "their", "his", "her", "she", "him", "who", "why", "how", "more", "most", "much",
    "any", "does", "did", "doing", "because", "while", "where", "which",
];

/// Minimum occurrences before a term counts as a topic.
const MIN_FREQUENCY: i64 = 2;

/// Extract the top terms across a batch of cleaned texts.
///
/// Terms shorter than 3 characters and stopwords are ignored; ties are
/// broken alphabetically so output is deterministic.
#[must_use]
pub fn extract_topics(texts: &[&str], max_topics: usize) -> Vec<NewTopic> {
    let mut counts: Vec<(String, i64)> = Vec::new();

    for text in texts {
        for word in text.split_whitespace() {
            let w = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if w.chars().count() < 3 || STOPWORDS.contains(&w.as_str()) {
                continue;
            }
            match counts.iter_mut().find(|(term, _)| *term == w) {
                Some((_, n)) => *n += 1,
                None => counts.push((w, 1)),
            }
        }
    }

    counts.retain(|(_, n)| *n >= MIN_FREQUENCY);
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts.truncate(max_topics);

    counts
        .into_iter()
        .map(|(term, frequency)| NewTopic {
            label: term.clone(),
            frequency,
            keywords: vec![term],
        })
        .collect()
}
