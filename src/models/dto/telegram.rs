use serde::Deserialize;

/// Minimal slice of the Telegram `Update` payload: enough to extract who
/// sent the turn and what they said. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

impl Update {
    pub fn chat_id(&self) -> Option<i64> {
        if let Some(message) = &self.message {
            return Some(message.chat.id);
        }
        self.callback_query
            .as_ref()?
            .message
            .as_ref()
            .map(|m| m.chat.id)
    }

    /// The logical text of this turn: the message text, or the menu
    /// intent carried by an inline-button press.
    pub fn input_text(&self) -> Option<String> {
        if let Some(text) = self.message.as_ref().and_then(|m| m.text.as_deref()) {
            return Some(text.to_string());
        }

        match self.callback_query.as_ref()?.data.as_deref()? {
            "start_quiz" => Some("START_QUIZ".to_string()),
            "download_pdf" => Some("GET_PDF".to_string()),
            other => Some(other.to_string()),
        }
    }
}
