use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use repertoire_core::{rules::RulesError, TokenError, TreeError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Token(_) | AppError::Rules(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Tree(_) | AppError::Sqlx(_) | AppError::Anyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Token(e) => e.to_string(),
            AppError::Rules(e) => e.to_string(),
            AppError::Tree(e) => {
                tracing::error!("Stored repertoire is corrupt: {e}");
                "Stored repertoire is corrupt".to_string()
            }
            AppError::Sqlx(e) => {
                tracing::error!("Database error: {e}");
                "Database error".to_string()
            }
            AppError::Anyhow(e) => {
                tracing::error!("Unexpected error: {e}");
                "Internal server error".to_string()
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let token = AppError::from(TokenError::Malformed("zz".into()));
        assert_eq!(token.status(), StatusCode::BAD_REQUEST);
        assert_eq!(token.to_string(), "Malformed move token 'zz'");

        let missing = AppError::NotFound("Repertoire 'x' not found".into());
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_errors_are_internal() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
