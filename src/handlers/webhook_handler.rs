use actix_web::{get, post, web, HttpRequest, HttpResponse};
use secrecy::ExposeSecret;

use crate::{
    app_state::AppState,
    errors::{AppError, AppResult},
    models::dto::Update,
    services::workflow_service::Reply,
};

const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// One webhook call is one user turn. The controller's replies are
/// delivered back through the Bot API and the platform always receives
/// 200, so a failed turn is reported to the user rather than redelivered.
#[post("/webhook")]
pub async fn telegram_webhook(
    state: web::Data<AppState>,
    req: HttpRequest,
    update: web::Json<Update>,
) -> Result<HttpResponse, AppError> {
    verify_secret_token(&state, &req)?;

    let update = update.into_inner();
    let (Some(chat_id), Some(text)) = (update.chat_id(), update.input_text()) else {
        // Edits, stickers, member updates: nothing to handle.
        return Ok(ok_response());
    };

    if let Err(e) = state.telegram_client.send_chat_action(chat_id, "typing").await {
        log::warn!("Failed to send typing action to chat {}: {}", chat_id, e);
    }

    let user_id = chat_id.to_string();
    let replies = match state.workflow_service.handle_message(&user_id, &text).await {
        Ok(replies) => replies,
        Err(e) => {
            log::error!("Workflow error for chat {}: {}", chat_id, e);
            vec![Reply::Text(e.user_message())]
        }
    };

    for reply in replies {
        let delivery = match reply {
            Reply::Text(text) => state.telegram_client.send_message(chat_id, &text).await,
            Reply::Document { filename, bytes } => {
                state
                    .telegram_client
                    .send_document(
                        chat_id,
                        &filename,
                        bytes,
                        "Here is your full 20-question practice PDF!",
                    )
                    .await
            }
        };

        if let Err(e) = delivery {
            log::error!("Failed to deliver reply to chat {}: {}", chat_id, e);
        }
    }

    Ok(ok_response())
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

fn ok_response() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

fn verify_secret_token(state: &AppState, req: &HttpRequest) -> AppResult<()> {
    let Some(expected) = &state.config.telegram_webhook_secret else {
        return Ok(());
    };

    let provided = req
        .headers()
        .get(SECRET_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided == Some(expected.expose_secret()) {
        Ok(())
    } else {
        Err(AppError::Unauthorized(
            "webhook secret token mismatch".to_string(),
        ))
    }
}
