//! Structured answer schema
//!
//! The generation model is asked to reply with a two-field JSON object. The
//! reply is parsed into [`GroundedAnswer`]; anything else is flagged as
//! malformed instead of being passed on as if it were valid.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Answer returned when the documents cannot support an answer
pub const INSUFFICIENT_INFORMATION_ANSWER: &str =
    "I do not have enough information to answer that question.";

/// A reply grounded in the supplied documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroundedAnswer {
    /// The answer text shown to the user
    pub answer: String,

    /// Why the documents support (or fail to support) the answer
    pub reasoning: String,
}

impl GroundedAnswer {
    /// The fixed fallback reply used when no documents are available
    pub fn insufficient_information(reasoning: impl Into<String>) -> Self {
        Self {
            answer: INSUFFICIENT_INFORMATION_ANSWER.to_string(),
            reasoning: reasoning.into(),
        }
    }

    /// Returns true if this is the fixed fallback answer
    pub fn is_insufficient_information(&self) -> bool {
        self.answer.trim() == INSUFFICIENT_INFORMATION_ANSWER
    }

    /// Parse a model reply against the answer schema.
    ///
    /// Accepts a bare JSON object, optionally wrapped in a Markdown code fence.
    /// Both fields must be present; an empty answer is rejected.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let body = strip_code_fence(raw.trim());

        let parsed: Self = serde_json::from_str(body).map_err(|e| e.to_string())?;

        if parsed.answer.trim().is_empty() {
            return Err("answer field is empty".to_string());
        }

        Ok(parsed)
    }

    /// Render as the JSON text the model is expected to produce
    pub fn to_json(&self) -> DomainResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Outcome of validating a model reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReplyOutcome {
    /// The reply matched the schema
    Grounded(GroundedAnswer),

    /// The reply did not match; the raw text is kept for the caller
    Malformed {
        /// The reply as received
        raw: String,
        /// Why it was rejected
        reason: String,
    },
}

impl ReplyOutcome {
    /// Validate raw model output
    pub fn from_raw(raw: &str) -> Self {
        match GroundedAnswer::parse(raw) {
            Ok(answer) => Self::Grounded(answer),
            Err(reason) => Self::Malformed {
                raw: raw.to_string(),
                reason,
            },
        }
    }

    /// Returns true if the reply matched the schema
    pub fn is_grounded(&self) -> bool {
        matches!(self, Self::Grounded(_))
    }

    /// Reject malformed replies
    pub fn into_answer(self) -> DomainResult<GroundedAnswer> {
        match self {
            Self::Grounded(answer) => Ok(answer),
            Self::Malformed { raw, reason } => Err(DomainError::MalformedAnswer { reason, raw }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let answer =
            GroundedAnswer::parse(r#"{"answer": "Tacos.", "reasoning": "Document 1 says so."}"#)
                .unwrap();
        assert_eq!(answer.answer, "Tacos.");
        assert_eq!(answer.reasoning, "Document 1 says so.");
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"answer\": \"Tacos.\", \"reasoning\": \"r\"}\n```";
        assert!(GroundedAnswer::parse(raw).is_ok());

        let raw = "```\n{\"answer\": \"Tacos.\", \"reasoning\": \"r\"}\n```";
        assert!(GroundedAnswer::parse(raw).is_ok());
    }

    #[test]
    fn test_parse_rejects_free_text() {
        assert!(GroundedAnswer::parse("Tacos are eaten in Mexico.").is_err());
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        assert!(GroundedAnswer::parse(r#"{"answer": "Tacos."}"#).is_err());
    }

    #[test]
    fn test_parse_rejects_extra_field() {
        let raw = r#"{"answer": "a", "reasoning": "b", "confidence": 0.9}"#;
        assert!(GroundedAnswer::parse(raw).is_err());
    }

    #[test]
    fn test_parse_rejects_empty_answer() {
        assert!(GroundedAnswer::parse(r#"{"answer": " ", "reasoning": "b"}"#).is_err());
    }

    #[test]
    fn test_insufficient_information() {
        let answer = GroundedAnswer::insufficient_information("No documents were provided.");
        assert_eq!(
            answer.answer,
            "I do not have enough information to answer that question."
        );
        assert!(answer.is_insufficient_information());

        let round_trip = GroundedAnswer::parse(&answer.to_json().unwrap()).unwrap();
        assert_eq!(round_trip, answer);
    }

    #[test]
    fn test_reply_outcome() {
        let ok = ReplyOutcome::from_raw(r#"{"answer": "a", "reasoning": "b"}"#);
        assert!(ok.is_grounded());
        assert_eq!(ok.into_answer().unwrap().answer, "a");

        let bad = ReplyOutcome::from_raw("not json");
        assert!(!bad.is_grounded());
        match bad.into_answer() {
            Err(DomainError::MalformedAnswer { raw, .. }) => assert_eq!(raw, "not json"),
            other => panic!("Expected MalformedAnswer, got {other:?}"),
        }
    }
}
