//! REST API types.
//!
//! Request body, error body and the mapping from failures to status codes:
//!
//! | Status | When                                              |
//! |--------|---------------------------------------------------|
//! | 400    | grouping failed (`detail` = `<field>:<reason>`)   |
//! | 401    | credentials absent, malformed or wrong            |
//! | 422    | body does not match [`TransformationRequest`]     |

use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::NestError;
use crate::models::FlatRecord;

/// Data and conditions for a transformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformationRequest {
    pub flat_dicts: Vec<FlatRecord>,
    pub nesting_levels: Vec<String>,
    #[serde(default)]
    pub use_recursive_realization: bool,
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub detail: String,
}

/// Failures of the HTTP front end.
#[derive(Debug)]
pub enum ApiError {
    /// No usable `Authorization: Basic` header.
    NotAuthenticated,
    /// Credentials did not match.
    InvalidCredentials,
    /// The grouping engine rejected the input.
    Transformation(NestError),
    /// Body parsed as JSON but has the wrong structure.
    InvalidBody(String),
    /// Any other body rejection (syntax, content type, size).
    Rejected { status: StatusCode, detail: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotAuthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Transformation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Rejected { status, .. } => *status,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::NotAuthenticated => "Not authenticated".to_string(),
            Self::InvalidCredentials => "Incorrect username or password".to_string(),
            Self::Transformation(e) => format!("{}:{}", e.detail(), e.reason()),
            Self::InvalidBody(detail) | Self::Rejected { detail, .. } => detail.clone(),
        }
    }
}

impl From<NestError> for ApiError {
    fn from(err: NestError) -> Self {
        Self::Transformation(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => Self::InvalidBody(e.body_text()),
            other => Self::Rejected {
                status: other.status(),
                detail: other.body_text(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = error_response(self.detail());
        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Basic")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

/// Create an error body.
pub fn error_response(detail: impl Into<String>) -> Json<Message> {
    Json(Message {
        detail: detail.into(),
    })
}
