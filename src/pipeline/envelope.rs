use serde::{Deserialize, Serialize};

use crate::regression::Score;

use super::error::GradeError;

pub const STATUS_OK: u16 = 200;
pub const STATUS_ERROR: u16 = 500;

/// Response returned for every invocation.
///
/// ```json
/// { "statusCode": 200, "body": { "essay score": 4 } }
/// { "statusCode": 500, "body": { "error": "failed to score essay: ..." } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: EnvelopeBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeBody {
    Score {
        #[serde(rename = "essay score")]
        essay_score: Score,
    },
    Error {
        error: String,
    },
}

impl Envelope {
    pub fn success(score: Score) -> Self {
        Self {
            status_code: STATUS_OK,
            body: EnvelopeBody::Score { essay_score: score },
        }
    }

    pub fn failure(err: &GradeError) -> Self {
        Self::failure_message(format!("failed to score essay: {}", err))
    }

    pub fn failure_message(message: impl Into<String>) -> Self {
        Self {
            status_code: STATUS_ERROR,
            body: EnvelopeBody::Error {
                error: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.body, EnvelopeBody::Score { .. })
    }

    pub fn score(&self) -> Option<Score> {
        match self.body {
            EnvelopeBody::Score { essay_score } => Some(essay_score),
            EnvelopeBody::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.body {
            EnvelopeBody::Error { error } => Some(error),
            EnvelopeBody::Score { .. } => None,
        }
    }
}
