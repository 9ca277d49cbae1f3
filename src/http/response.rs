//! Error responses.
//!
//! Maps core errors to HTTP status codes with a `{ error, message }` body.
//! Messages are the errors' Display output, which never carries secrets.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::tx::WalletError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// API-level error.
#[derive(Debug)]
pub enum ApiError {
    Wallet(WalletError),
    /// Body could not be read or decoded as JSON.
    InvalidBody(JsonRejection),
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(rejection) => rejection.status(),
            ApiError::Wallet(e) => match e {
                WalletError::MissingField(_)
                | WalletError::InvalidAmount(_)
                | WalletError::UnsupportedChain(_)
                | WalletError::UnknownWallet(_) => StatusCode::BAD_REQUEST,
                WalletError::NotFound(_) => StatusCode::NOT_FOUND,
                WalletError::NotPending { .. } | WalletError::Expired(_) => StatusCode::CONFLICT,
                WalletError::ExecutionFailed(_) | WalletError::SigningFailed(_) => {
                    StatusCode::BAD_GATEWAY
                }
                WalletError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
                WalletError::EstimationUnavailable(_) | WalletError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Wallet(e) => ErrorBody {
                error: e.kind(),
                message: e.to_string(),
            },
            ApiError::InvalidBody(rejection) => ErrorBody {
                error: "InvalidBody",
                message: rejection.body_text(),
            },
            ApiError::BadRequest(message) => ErrorBody {
                error: "InvalidRequest",
                message: message.clone(),
            },
        }
    }
}

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        ApiError::Wallet(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::types::{PlanId, PlanStatus};

    #[test]
    fn test_status_mapping() {
        let id = PlanId::generate();
        let cases = [
            (WalletError::MissingField("chain"), StatusCode::BAD_REQUEST),
            (WalletError::UnknownWallet("x".into()), StatusCode::BAD_REQUEST),
            (WalletError::NotFound(id), StatusCode::NOT_FOUND),
            (
                WalletError::NotPending { plan_id: id, status: PlanStatus::Executing },
                StatusCode::CONFLICT,
            ),
            (WalletError::Expired(id), StatusCode::CONFLICT),
            (WalletError::ExecutionFailed("x".into()), StatusCode::BAD_GATEWAY),
            (WalletError::NotConfigured("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (WalletError::Store("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }
}
