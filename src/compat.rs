use std::error::Error;

use crate::error::ApiError;
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        FromRequest,
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use tracing::error;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl<T: Serialize> IntoResponse for ApiJson<T> {
    fn into_response(self) -> axum::response::Response {
        let Self(value) = self;
        axum::Json(value).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::InvalidBody(format!("{}", value.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Template(err) => {
                error!(error = ?err.source(), "template rendering failed: {err}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Sqlx(err) => {
                error!("database error: {err}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, axum::Json(serde_json::json!({"err": self.to_string()}))).into_response()
    }
}

#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(ApiError))]
pub struct ApiForm<T>(pub T);

impl From<FormRejection> for ApiError {
    fn from(value: FormRejection) -> Self {
        let mut s = format!("{}", value);

        let mut source_ = value.source();
        while let Some(source) = source_ {
            s.push_str(&format!(": {}", source));
            source_ = source.source();
        }

        ApiError::InvalidBody(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (ApiError::InvalidBody("x".to_string()), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::NotFound("/posts/x".to_string()), StatusCode::NOT_FOUND),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
