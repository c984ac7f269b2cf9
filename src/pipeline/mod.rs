//! Request orchestration.
//!
//! [`EssayGrader::handle`] is the invocation boundary: it takes the raw event
//! and always returns an [`Envelope`], success or failure.

pub mod envelope;
pub mod error;
pub mod grader;


pub use envelope::{Envelope, EnvelopeBody, STATUS_ERROR, STATUS_OK};
pub use error::GradeError;
pub use grader::{EssayGrader, TEXT_FIELD, essay_digest, extract_text};
