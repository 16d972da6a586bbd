pub mod audit_service;
pub mod pdf_service;
pub mod telegram_service;
pub mod workflow_service;

pub use audit_service::{ContentProvider, OpenAiContentProvider};
pub use pdf_service::QuizPdfRenderer;
pub use telegram_service::TelegramClient;
pub use workflow_service::{Reply, WorkflowService};
