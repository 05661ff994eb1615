//! Mention analysis pipeline for mentio.
//!
//! Normalizes and fingerprints raw mentions, analyzes sentiment/emotion/
//! credibility/aspects with a cached engine (external inference backend with
//! a deterministic heuristic fallback), evaluates alert rules, extracts
//! batch topics, and drives the idempotent ingestion pipeline against the
//! store contract.

pub mod alerts;
pub mod aspects;
pub mod credibility;
pub mod emotions;
pub mod engine;
pub mod error;
pub mod inference;
pub mod lexicon;
pub mod normalize;
pub mod pipeline;
pub mod topics;

pub use alerts::evaluate_rules;
pub use aspects::{select_aspect_extractor, AspectExtractor};
pub use credibility::credibility_score;
pub use engine::Analyzer;
pub use error::SentimentError;
pub use inference::{InferenceClient, SentimentBackend};
pub use lexicon::{label_for_score, lexicon_score, polarity_to_unit};
pub use normalize::{fingerprint, normalize};
pub use pipeline::{ingest_batch, IngestSummary};
pub use topics::extract_topics;
