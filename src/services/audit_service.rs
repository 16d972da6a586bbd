use std::time::Duration;

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use schemars::schema_for;
use secrecy::ExposeSecret;
use serde_json::json;

use crate::{
    config::Config,
    constants::prompts::AUDIT_SYSTEM_PROMPT,
    errors::{AppError, AppResult},
    models::{domain::AuditResult, dto::AuditResponseDto},
};

/// The content provider runs one audit request against the upstream
/// model and returns either a fully validated result or a `Provider`
/// error. The call is idempotent: same input text, freshly regenerated
/// output, no side effects beyond the upstream request.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn generate_audit(&self, text: &str) -> AppResult<AuditResult>;
}

pub struct OpenAiContentProvider {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiContentProvider {
    pub fn new(config: &Config) -> Self {
        let openai_config =
            OpenAIConfig::new().with_api_key(config.openai_api_key.expose_secret());

        Self {
            client: Client::with_config(openai_config),
            model: config.openai_model.clone(),
            timeout: Duration::from_secs(config.provider_timeout_secs),
        }
    }

    fn audit_request(&self, text: &str) -> serde_json::Value {
        // The response schema is derived from the DTO the parser expects,
        // so the contract sent to the model and the validation applied to
        // its output cannot drift apart.
        let schema = schema_for!(AuditResponseDto);

        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": AUDIT_SYSTEM_PROMPT },
                { "role": "user", "content": text }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "academic_audit",
                    "schema": schema
                }
            }
        })
    }
}

#[async_trait]
impl ContentProvider for OpenAiContentProvider {
    async fn generate_audit(&self, text: &str) -> AppResult<AuditResult> {
        let request = self.audit_request(text);

        let response: serde_json::Value =
            tokio::time::timeout(self.timeout, self.client.chat().create_byot(request))
                .await
                .map_err(|_| AppError::Provider("audit request timed out".to_string()))?
                .map_err(|e| AppError::Provider(e.to_string()))?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AppError::Provider("completion contained no content".to_string()))?;

        let dto: AuditResponseDto = serde_json::from_str(content)
            .map_err(|e| AppError::Provider(format!("unparseable audit response: {}", e)))?;

        dto.try_into()
    }
}
