use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bot API error: {0}")]
    BotApi(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// The short explanation sent back to the chat user when handling
    /// their message fails. Every error is scoped to one message; none
    /// is fatal to the process.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Provider(_) => {
                "🛑 I couldn't generate study materials from that text. \
                 Please resend it and I'll try again."
                    .to_string()
            }
            AppError::StoreUnavailable(_) => {
                "🛑 I'm having trouble saving your progress right now. \
                 Please try again in a moment."
                    .to_string()
            }
            AppError::Render(_) => {
                "🛑 PDF generation failed. Your quiz bank is still available — \
                 try again, or start the practice quiz instead."
                    .to_string()
            }
            AppError::InvalidInput(message) => message.clone(),
            AppError::Unauthorized(_)
            | AppError::BotApi(_)
            | AppError::InternalError(_) => {
                "🛑 Something went wrong handling that message. Please try again."
                    .to_string()
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BotApi(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::BotApi(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::Provider("upstream".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::StoreUnavailable("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::InvalidInput("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("no token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::Render("page overflow".into());
        assert_eq!(err.to_string(), "Render error: page overflow");
    }

    #[test]
    fn test_invalid_input_user_message_is_the_reprompt() {
        let err = AppError::InvalidInput("Please send me your notes first.".into());
        assert_eq!(err.user_message(), "Please send me your notes first.");
    }

    #[test]
    fn test_user_messages_never_leak_internals() {
        let err = AppError::StoreUnavailable("mongodb://secret-host timed out".into());
        assert!(!err.user_message().contains("mongodb"));

        let err = AppError::Provider("api key invalid".into());
        assert!(!err.user_message().contains("api key"));
    }
}
