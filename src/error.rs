// src/error.rs
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{message::ErrorResponse, services::completion::ProviderError};

pub const PROVIDER_UNAVAILABLE: &str = "completion provider unavailable";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Provider detail stays in the logs; it can carry upstream bodies and URLs.
        let error = match self {
            AppError::BadRequest(msg) => msg,
            AppError::Provider(_) => PROVIDER_UNAVAILABLE.to_string(),
        };
        let body = Json(ErrorResponse { error });
        (status, body).into_response()
    }
}
