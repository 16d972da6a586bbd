use secrecy::SecretString;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub sessions_collection: String,
    pub telegram_bot_token: SecretString,
    pub telegram_webhook_secret: Option<SecretString>,
    pub openai_api_key: SecretString,
    pub openai_model: String,
    pub provider_timeout_secs: u64,
    pub web_server_host: String,
    pub web_server_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "sensei-local".to_string()),
            sessions_collection: env::var("SESSIONS_COLLECTION")
                .unwrap_or_else(|_| "study_sessions".to_string()),
            telegram_bot_token: SecretString::from(
                env::var("TELEGRAM_BOT_TOKEN")
                    .unwrap_or_else(|_| "dev_bot_token_change_in_production".to_string()),
            ),
            telegram_webhook_secret: env::var("TELEGRAM_WEBHOOK_SECRET")
                .ok()
                .map(SecretString::from),
            openai_api_key: SecretString::from(
                env::var("OPENAI_API_KEY")
                    .unwrap_or_else(|_| "dev_api_key_change_in_production".to_string()),
            ),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            provider_timeout_secs: env::var("PROVIDER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(120),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let bot_token = self.telegram_bot_token.expose_secret();
        let api_key = self.openai_api_key.expose_secret();

        if bot_token == "dev_bot_token_change_in_production" {
            panic!(
                "FATAL: TELEGRAM_BOT_TOKEN is using default value! Set TELEGRAM_BOT_TOKEN environment variable."
            );
        }

        if api_key == "dev_api_key_change_in_production" {
            panic!(
                "FATAL: OPENAI_API_KEY is using default value! Set OPENAI_API_KEY environment variable."
            );
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "sensei-test".to_string(),
            sessions_collection: "study_sessions".to_string(),
            telegram_bot_token: SecretString::from("test_bot_token".to_string()),
            telegram_webhook_secret: None,
            openai_api_key: SecretString::from("test_api_key".to_string()),
            openai_model: "gpt-4o-mini".to_string(),
            provider_timeout_secs: 5,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
        }
    }
}
