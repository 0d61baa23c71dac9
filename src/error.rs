//! Typed errors and their JSON:API response mapping.

use crate::document::error_payload::{self, ErrorEntry, ErrorPayload};
use crate::request::ValidationError;
use crate::source::SourceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Assigned to source errors that carry no status of their own.
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Everything the request pipeline can fail with. Every variant renders as
/// the same document shape: `{"errors": [{title, detail}, ...]}` with a
/// majority-vote status code.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request validation failed")]
    Validation(Vec<ValidationError>),
    #[error("accept header does not name the JSON:API media type")]
    NotAcceptable,
    #[error("unknown resource type: {0}")]
    UnknownResource(String),
    #[error("single resource requested without an identifying filter")]
    MissingIdentifier,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("malformed request body: {0}")]
    Body(String),
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl ApiError {
    /// Flatten into payload entries, one per underlying violation.
    pub fn entries(&self) -> Vec<ErrorEntry> {
        match self {
            ApiError::Validation(errors) => errors
                .iter()
                .map(|e| ErrorEntry::new(400, "Bad Request", e.reason.clone()))
                .collect(),
            ApiError::NotAcceptable => vec![ErrorEntry::new(406, "Not Acceptable", self.to_string())],
            ApiError::UnknownResource(_) | ApiError::NotFound(_) => {
                vec![ErrorEntry::new(404, "Not Found", self.to_string())]
            }
            ApiError::MissingIdentifier | ApiError::Body(_) => {
                vec![ErrorEntry::new(400, "Bad Request", self.to_string())]
            }
            ApiError::Source(err) => vec![ErrorEntry {
                status: err.status,
                title: err.title.clone(),
                message: err.message.clone(),
            }],
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        error_payload::build(&self.entries(), DEFAULT_ERROR_STATUS)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = self.payload();
        let status = payload
            .code
            .parse::<u16>()
            .ok()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(payload.document)).into_response()
    }
}

/// Registration-time failures: integrator mistakes surfaced at startup,
/// never per request.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("duplicate resource type: {0}")]
    DuplicateResource(String),
    #[error("relation may not be named \"self\" (resource type {0})")]
    ReservedRelation(String),
    #[error("invalid route config for {resource}: {reason}")]
    Config { resource: String, reason: String },
}
