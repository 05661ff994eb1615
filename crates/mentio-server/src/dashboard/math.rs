//! Pure aggregation folds over sampled analyses.
//!
//! All functions are total: empty input yields the documented zero/empty
//! default, never NaN or a division by zero.

use mentio_core::{AnalysisSample, AspectAverage, CredibilityReport, EmotionSlice};

/// Analyses at or above this credibility count as verified.
const VERIFIED_THRESHOLD: f64 = 70.0;
/// Analyses below this credibility count as suspected bots.
const BOT_THRESHOLD: f64 = 30.0;
/// Aspect rows surfaced on the dashboard.
const TOP_ASPECTS: usize = 6;

/// Mean polarity over the sample on a 0–100 scale; 0 when empty.
#[must_use]
pub fn mean_sentiment(samples: &[AnalysisSample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let denom = samples.len() as f64;
    samples.iter().map(|s| s.score * 100.0).sum::<f64>() / denom
}

/// Day-over-day sentiment change on the 0–100 scale.
///
/// Exactly `0.0` when the baseline (prior-day) sample is empty — a product
/// with no history has no delta, not an infinite one.
#[must_use]
pub fn sentiment_delta(last_day: &[AnalysisSample], prior_day: &[AnalysisSample]) -> f64 {
    if prior_day.is_empty() || last_day.is_empty() {
        return 0.0;
    }
    mean_sentiment(last_day) - mean_sentiment(prior_day)
}

/// Mean credibility over the sample; 0 when empty.
#[must_use]
pub fn mean_credibility(samples: &[AnalysisSample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let denom = samples.len() as f64;
    samples.iter().map(|s| s.credibility).sum::<f64>() / denom
}

/// Credibility roll-up: overall mean plus verified/bot counts.
#[must_use]
pub fn credibility_report(samples: &[AnalysisSample]) -> CredibilityReport {
    let verified = samples
        .iter()
        .filter(|s| s.credibility >= VERIFIED_THRESHOLD)
        .count();
    let bots = samples
        .iter()
        .filter(|s| s.credibility < BOT_THRESHOLD)
        .count();

    CredibilityReport {
        overall_score: mean_credibility(samples),
        verified_reviews: i64::try_from(verified).unwrap_or(0),
        bots_detected: i64::try_from(bots).unwrap_or(0),
    }
}

/// Frequency histogram over each sample's primary emotion, with percentage
/// normalization, sorted by count descending.
#[must_use]
pub fn emotion_breakdown(samples: &[AnalysisSample]) -> Vec<EmotionSlice> {
    let mut counts: Vec<(String, i64)> = Vec::new();

    for sample in samples {
        let Some(primary) = sample
            .emotions
            .iter()
            .max_by(|a, b| a.weight.total_cmp(&b.weight))
        else {
            continue;
        };
        match counts.iter_mut().find(|(e, _)| *e == primary.emotion) {
            Some((_, n)) => *n += 1,
            None => counts.push((primary.emotion.clone(), 1)),
        }
    }

    let total: i64 = counts.iter().map(|(_, n)| *n).sum();
    if total == 0 {
        return Vec::new();
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    counts
        .into_iter()
        .map(|(emotion, count)| EmotionSlice {
            emotion,
            count,
            #[allow(clippy::cast_precision_loss)]
            percentage: (count as f64 / total as f64) * 100.0,
        })
        .collect()
}

/// Mean score per aspect category across the sample, sorted descending and
/// truncated to the dashboard's fixed top-N.
#[must_use]
pub fn aspect_scores(samples: &[AnalysisSample]) -> Vec<AspectAverage> {
    let mut sums: Vec<(String, f64, i64)> = Vec::new();

    for sample in samples {
        for aspect in &sample.aspects {
            match sums.iter_mut().find(|(a, _, _)| *a == aspect.aspect) {
                Some((_, sum, n)) => {
                    *sum += aspect.score;
                    *n += 1;
                }
                None => sums.push((aspect.aspect.clone(), aspect.score, 1)),
            }
        }
    }

    let mut averages: Vec<AspectAverage> = sums
        .into_iter()
        .map(|(aspect, sum, n)| AspectAverage {
            aspect,
            #[allow(clippy::cast_precision_loss)]
            score: sum / n as f64,
            mentions: n,
        })
        .collect();

    averages.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.aspect.cmp(&b.aspect)));
    averages.truncate(TOP_ASPECTS);
    averages
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mentio_core::{AspectScore, EmotionWeight};

    fn sample(score: f64, credibility: f64) -> AnalysisSample {
        AnalysisSample {
            score,
            credibility,
            emotions: vec![],
            aspects: vec![],
            created_at: Utc::now(),
        }
    }

    fn sample_with_emotion(emotion: &str) -> AnalysisSample {
        AnalysisSample {
            score: 0.5,
            credibility: 70.0,
            emotions: vec![EmotionWeight {
                emotion: emotion.to_string(),
                weight: 1.0,
            }],
            aspects: vec![],
            created_at: Utc::now(),
        }
    }

    fn sample_with_aspect(aspect: &str, score: f64) -> AnalysisSample {
        AnalysisSample {
            score: 0.5,
            credibility: 70.0,
            emotions: vec![],
            aspects: vec![AspectScore {
                aspect: aspect.to_string(),
                score,
            }],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn mean_sentiment_scales_to_hundred() {
        let samples = [sample(0.5, 70.0), sample(1.0, 70.0)];
        assert!((mean_sentiment(&samples) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn mean_sentiment_of_empty_sample_is_zero() {
        assert_eq!(mean_sentiment(&[]), 0.0);
    }

    #[test]
    fn delta_is_exactly_zero_when_baseline_is_empty() {
        let last = [sample(0.9, 70.0)];
        let delta = sentiment_delta(&last, &[]);
        assert_eq!(delta, 0.0, "empty baseline must yield exactly 0.0");
        assert!(delta.is_finite());
    }

    #[test]
    fn delta_compares_period_means() {
        let last = [sample(0.8, 70.0)];
        let prior = [sample(0.6, 70.0)];
        assert!((sentiment_delta(&last, &prior) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn delta_can_be_negative() {
        let last = [sample(0.2, 70.0)];
        let prior = [sample(0.7, 70.0)];
        assert!(sentiment_delta(&last, &prior) < 0.0);
    }

    #[test]
    fn credibility_report_counts_verified_and_bots() {
        let samples = [sample(0.5, 90.0), sample(0.5, 50.0), sample(0.5, 10.0)];
        let report = credibility_report(&samples);
        assert_eq!(report.verified_reviews, 1);
        assert_eq!(report.bots_detected, 1);
        assert!((report.overall_score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn credibility_report_of_empty_sample_is_zeroed() {
        let report = credibility_report(&[]);
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.verified_reviews, 0);
        assert_eq!(report.bots_detected, 0);
    }

    #[test]
    fn emotion_breakdown_percentages_sum_to_hundred() {
        let samples = [
            sample_with_emotion("joy"),
            sample_with_emotion("joy"),
            sample_with_emotion("anger"),
            sample_with_emotion("sadness"),
        ];
        let breakdown = emotion_breakdown(&samples);
        let total: f64 = breakdown.iter().map(|e| e.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(breakdown[0].emotion, "joy");
        assert_eq!(breakdown[0].count, 2);
        assert!((breakdown[0].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn emotion_breakdown_skips_samples_without_emotions() {
        let samples = [sample(0.5, 70.0)];
        assert!(emotion_breakdown(&samples).is_empty());
    }

    #[test]
    fn aspect_scores_are_means_sorted_descending() {
        let samples = [
            sample_with_aspect("price", 0.2),
            sample_with_aspect("price", 0.4),
            sample_with_aspect("quality", 0.9),
        ];
        let scores = aspect_scores(&samples);
        assert_eq!(scores[0].aspect, "quality");
        assert!((scores[1].score - 0.3).abs() < 1e-9, "price mean expected");
        assert_eq!(scores[1].mentions, 2);
    }

    #[test]
    fn aspect_scores_truncate_to_top_six() {
        let samples: Vec<AnalysisSample> = (0..10)
            .map(|i| sample_with_aspect(&format!("aspect{i}"), 0.5))
            .collect();
        assert_eq!(aspect_scores(&samples).len(), 6);
    }
}
