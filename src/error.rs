use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid movie data: {0}")]
    Validation(String),

    #[error("invalid movie ID format")]
    MalformedId,

    #[error("movie not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] sea_orm::DbErr),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MalformedId => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation(detail) => format!("Invalid movie data: {detail}"),
            AppError::MalformedId => "Invalid movie ID format".to_string(),
            AppError::NotFound => "Movie not found".to_string(),
            AppError::Store(err) => {
                tracing::error!(error = %err, "store failure");
                "Internal server error".to_string()
            }
        };
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
