//! Data-driven alert evaluation.
//!
//! Rules are configuration ([`AlertRule`]), not code: the evaluator's
//! control flow never changes when a rule is added. The default rule
//! triggers on low polarity combined with a watch-keyword hit.

use mentio_core::{AlertRule, NewAlert, SentimentAnalysis};

/// Evaluate a mention against the rule set. The first matching rule wins.
///
/// A rule matches when the analysis score is below its threshold AND the
/// cleaned text contains at least one of its watch keywords. The alert
/// message names the matched keywords and the score.
#[must_use]
pub fn evaluate_rules(
    rules: &[AlertRule],
    product_id: i64,
    cleaned_text: &str,
    analysis: &SentimentAnalysis,
) -> Option<NewAlert> {
    let lowered = cleaned_text.to_lowercase();

    for rule in rules {
        if analysis.score >= rule.threshold {
            continue;
        }

        let matched: Vec<&str> = rule
            .watch_keywords
            .iter()
            .filter(|keyword| !keyword.trim().is_empty())
            .filter(|keyword| lowered.contains(&keyword.to_lowercase()))
            .map(String::as_str)
            .collect();

        if matched.is_empty() {
            continue;
        }

        return Some(NewAlert {
            product_id: Some(product_id),
            kind: rule.kind.clone(),
            message: format!(
                "sentiment {:.2} below threshold {:.2}; matched keywords: {}",
                analysis.score,
                rule.threshold,
                matched.join(", ")
            ),
            severity: rule.severity,
        });
    }

    None
}
