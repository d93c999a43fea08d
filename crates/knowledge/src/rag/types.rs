//! RAG answer types.

use crate::retriever::RetrievedChunk;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A synthesized answer with everything that went into it.
#[derive(Debug, Clone)]
pub struct Answer {
    /// Model output, or the no-answer placeholder
    pub text: String,

    /// Context chunks in retrieval order
    pub context: Vec<RetrievedChunk>,

    /// Heuristic confidence, two decimals
    pub confidence: f64,

    /// Basename of the first context chunk's file
    pub source: String,

    /// Wall-clock time for retrieval and synthesis
    pub elapsed: Duration,
}

impl Answer {
    /// Presentation record for `question`.
    pub fn to_record(&self, question: &str) -> AnswerRecord {
        AnswerRecord {
            question: question.to_string(),
            answer: self.text.clone(),
            source_document: self.source.clone(),
            confidence_score: self.confidence.to_string(),
        }
    }

    /// Elapsed seconds with two decimals, e.g. `"1.37"`.
    pub fn elapsed_display(&self) -> String {
        format!("{:.2}", self.elapsed.as_secs_f64())
    }
}

/// The answer as shown to the user. All fields are strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
    pub source_document: String,
    /// Shortest decimal form of the rounded confidence
    pub confidence_score: String,
}
