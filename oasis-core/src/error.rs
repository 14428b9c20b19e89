use crate::http::header::WWW_AUTHENTICATE;
use crate::http::response::{IntoResponse, Response};
use crate::http::{HeaderValue, Json, StatusCode};

/// Error answered by runtime-owned routes. Renders as `{ "error": message }`.
#[derive(Debug)]
pub enum HttpError {
    /// Rejected credentials, with the provider's `WWW-Authenticate` challenge.
    Unauthorized {
        message: String,
        challenge: Option<HeaderValue>,
    },
    Internal(String),
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            HttpError::Unauthorized { message, challenge } => {
                let mut response =
                    (status, Json(serde_json::json!({ "error": message }))).into_response();
                if let Some(challenge) = challenge {
                    response.headers_mut().insert(WWW_AUTHENTICATE, challenge);
                }
                response
            }
            HttpError::Internal(message) => {
                (status, Json(serde_json::json!({ "error": message }))).into_response()
            }
        }
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::Unauthorized { message, .. } => write!(f, "Unauthorized: {message}"),
            HttpError::Internal(message) => write!(f, "Internal Error: {message}"),
        }
    }
}

impl std::error::Error for HttpError {}
