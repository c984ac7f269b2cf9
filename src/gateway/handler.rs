use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::gateway::state::HandlerState;
use crate::gateway::{GRADER_STATUS_ERROR, GRADER_STATUS_SCORED, status_headers};
use crate::pipeline::{Envelope, GradeError};

/// Direct-invoke style: always HTTP 200, the body is the whole envelope.
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn invoke_handler(State(state): State<HandlerState>, body: Bytes) -> Response {
    let envelope = run_grader(&state, &body).await;
    let header = status_label(&envelope);

    (StatusCode::OK, status_headers(header), Json(envelope)).into_response()
}

/// Function-URL style: the envelope's `statusCode` becomes the HTTP status.
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn score_handler(State(state): State<HandlerState>, body: Bytes) -> Response {
    let envelope = run_grader(&state, &body).await;
    let header = status_label(&envelope);
    let status =
        StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, status_headers(header), Json(envelope.body)).into_response()
}

/// Parses the body and scores it off the async runtime.
pub async fn run_grader(state: &HandlerState, body: &[u8]) -> Envelope {
    let event = match parse_event(body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Rejecting unparseable event");
            return Envelope::failure(&e);
        }
    };

    let grader = state.grader.clone();
    match tokio::task::spawn_blocking(move || grader.handle(&event)).await {
        Ok(envelope) => {
            debug!(status_code = envelope.status_code, "Invocation finished");
            envelope
        }
        Err(e) => {
            error!(error = %e, "Scoring task did not complete");
            Envelope::failure(&GradeError::Internal(format!(
                "scoring task failed: {}",
                e
            )))
        }
    }
}

/// An empty body is treated as an empty event so it fails on the missing field.
pub fn parse_event(body: &[u8]) -> Result<Value, GradeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| GradeError::InvalidEvent {
        reason: e.to_string(),
    })
}

fn status_label(envelope: &Envelope) -> &'static str {
    if envelope.is_success() {
        GRADER_STATUS_SCORED
    } else {
        GRADER_STATUS_ERROR
    }
}
