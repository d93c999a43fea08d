//! RAG (Retrieval-Augmented Generation) answering system.
//!
//! Answer synthesis, the confidence heuristic and the study-aid generators.

pub mod confidence;
pub mod synthesizer;
pub mod types;
pub mod utilities;

pub use confidence::{attribute_source, estimate_confidence, UNKNOWN_SOURCE};
pub use synthesizer::{AnswerSynthesizer, NO_ANSWER};
pub use types::{Answer, AnswerRecord};
pub use utilities::{UtilityGenerator, UtilityKind};
