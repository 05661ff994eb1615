//! Alert rules as data.
//!
//! Rules live in a YAML file so new thresholds and watch-keyword lists can be
//! added without touching the evaluator's control flow. A missing file falls
//! back to the built-in default rule; a present-but-invalid file is a startup
//! error.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::Severity;
use crate::ConfigError;

/// One threshold rule: trigger when polarity drops below `threshold` AND the
/// cleaned text contains at least one of `watch_keywords`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRule {
    /// Stable rule identifier, recorded as the alert type.
    pub kind: String,
    /// Polarity threshold in [0, 1].
    pub threshold: f64,
    pub watch_keywords: Vec<String>,
    pub severity: Severity,
}

#[derive(Debug, Deserialize)]
struct RulesFile {
    rules: Vec<AlertRule>,
}

/// The built-in rule set used when no rules file is configured.
#[must_use]
pub fn default_rules() -> Vec<AlertRule> {
    vec![AlertRule {
        kind: "low_sentiment".to_string(),
        threshold: 0.3,
        watch_keywords: vec![
            "broken".to_string(),
            "refund".to_string(),
            "scam".to_string(),
            "defective".to_string(),
            "dangerous".to_string(),
            "recall".to_string(),
        ],
        severity: Severity::High,
    }]
}

/// Load and validate alert rules from a YAML file.
///
/// Returns [`default_rules`] when the file does not exist.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read, parsed, or
/// fails validation.
pub fn load_rules(path: &Path) -> Result<Vec<AlertRule>, ConfigError> {
    if !path.exists() {
        return Ok(default_rules());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RulesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let rules_file: RulesFile = serde_yaml::from_str(&content)?;

    validate_rules(&rules_file.rules)?;

    Ok(rules_file.rules)
}

fn validate_rules(rules: &[AlertRule]) -> Result<(), ConfigError> {
    if rules.is_empty() {
        return Err(ConfigError::Validation(
            "rules file must define at least one rule".to_string(),
        ));
    }

    let mut seen_kinds = HashSet::new();

    for rule in rules {
        if rule.kind.trim().is_empty() {
            return Err(ConfigError::Validation(
                "rule kind must be non-empty".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&rule.threshold) {
            return Err(ConfigError::Validation(format!(
                "rule '{}' has threshold {}; must be within [0, 1]",
                rule.kind, rule.threshold
            )));
        }

        if rule.watch_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "rule '{}' has no usable watch keywords",
                rule.kind
            )));
        }

        if !seen_kinds.insert(rule.kind.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate rule kind: '{}'",
                rule.kind
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_are_valid() {
        let rules = default_rules();
        validate_rules(&rules).expect("default rules must pass validation");
        assert_eq!(rules[0].kind, "low_sentiment");
        assert!((rules[0].threshold - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let rules =
            load_rules(Path::new("/nonexistent/alert_rules.yaml")).expect("fallback expected");
        assert_eq!(rules.len(), default_rules().len());
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let rules = vec![AlertRule {
            kind: "bad".to_string(),
            threshold: 1.5,
            watch_keywords: vec!["broken".to_string()],
            severity: Severity::High,
        }];
        let result = validate_rules(&rules);
        assert!(
            matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("threshold")),
            "expected threshold validation error, got: {result:?}"
        );
    }

    #[test]
    fn empty_watch_keywords_are_rejected() {
        let rules = vec![AlertRule {
            kind: "no-keywords".to_string(),
            threshold: 0.3,
            watch_keywords: vec![String::new(), "  ".to_string()],
            severity: Severity::Medium,
        }];
        let result = validate_rules(&rules);
        assert!(
            matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("watch keywords")),
            "expected watch-keywords validation error, got: {result:?}"
        );
    }

    #[test]
    fn duplicate_kinds_are_rejected() {
        let rule = AlertRule {
            kind: "dup".to_string(),
            threshold: 0.3,
            watch_keywords: vec!["broken".to_string()],
            severity: Severity::High,
        };
        let result = validate_rules(&[rule.clone(), rule]);
        assert!(
            matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("duplicate")),
            "expected duplicate-kind validation error, got: {result:?}"
        );
    }

    #[test]
    fn yaml_rules_parse_and_load() {
        let yaml = "rules:\n  - kind: shipping_complaints\n    threshold: 0.25\n    watch_keywords: [late, lost, damaged]\n    severity: medium\n";
        let parsed: RulesFile = serde_yaml::from_str(yaml).expect("yaml should parse");
        validate_rules(&parsed.rules).expect("rules should validate");
        assert_eq!(parsed.rules[0].severity, Severity::Medium);
    }
}
