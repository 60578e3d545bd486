use std::{fmt, io};
use axum::{http::StatusCode, response::{IntoResponse, Response}};

/// Error types for the wiki
#[derive(Debug)]
pub enum WikiError {
    Io(io::Error),
    NotFound,
    InvalidName(String),
    InvalidPath,
    TemplateError(String),
}

impl From<io::Error> for WikiError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            WikiError::NotFound
        } else {
            WikiError::Io(err)
        }
    }
}

impl fmt::Display for WikiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WikiError::Io(e) => write!(f, "I/O error: {}", e),
            WikiError::NotFound => write!(f, "Not found"),
            WikiError::InvalidName(name) => write!(f, "Invalid page name: '{}'", name),
            WikiError::InvalidPath => write!(f, "Invalid path"),
            WikiError::TemplateError(e) => write!(f, "Template error: {}", e),
        }
    }
}

impl std::error::Error for WikiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WikiError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        let status = match self {
            WikiError::NotFound => StatusCode::NOT_FOUND,
            WikiError::InvalidName(_) | WikiError::InvalidPath => StatusCode::BAD_REQUEST,
            WikiError::Io(_) | WikiError::TemplateError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
