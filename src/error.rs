use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Forecast request timed out")]
    Timeout,

    #[error("Forecast provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Forecast data error: {0}")]
    Data(String),

    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Fetch and data failures are expected at runtime and degrade to the "no data" page.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            AppError::Http(_)
                | AppError::Timeout
                | AppError::Provider { .. }
                | AppError::Json(_)
                | AppError::Data(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
