use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        audit::AuditResult,
        question::Question,
        study_session::{Phase, StudySession},
    },
    repositories::SessionRepository,
    services::{
        audit_service::ContentProvider, pdf_service::QuizPdfRenderer,
        telegram_service::escape_markdown,
    },
};

/// Minimum word count before free text is treated as study material
/// rather than a stray message.
const MIN_STUDY_TEXT_WORDS: usize = 4;

static PRACTICE_INTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(practice|more questions|next question|quiz)\b")
        .expect("PRACTICE_INTENT is a valid regex pattern")
});

/// One outbound reply the controller asks the hosting surface to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Document { filename: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum UserIntent {
    Welcome,
    StartQuiz,
    GetPdf,
    Text(String),
}

fn parse_intent(text: &str) -> UserIntent {
    let trimmed = text.trim();

    if trimmed == "/start" {
        return UserIntent::Welcome;
    }

    let token = trimmed.trim_start_matches('/');
    if token.eq_ignore_ascii_case("start_quiz") {
        return UserIntent::StartQuiz;
    }
    if token.eq_ignore_ascii_case("get_pdf") || token.eq_ignore_ascii_case("pdf") {
        return UserIntent::GetPdf;
    }

    // Short "practice"/"quiz"-style messages ask for the practice quiz.
    if trimmed.split_whitespace().count() < MIN_STUDY_TEXT_WORDS
        && PRACTICE_INTENT.is_match(trimmed)
    {
        return UserIntent::StartQuiz;
    }

    UserIntent::Text(trimmed.to_string())
}

/// A single-letter message is an answer token, meaningful only while a
/// quiz is running.
fn is_answer_shaped(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.len() == 1 && trimmed.chars().all(|c| c.is_ascii_alphabetic())
}

/// The workflow controller: sequences each user turn through
/// audit -> menu -> quiz-or-download. Stateless across messages; the
/// session is re-fetched from the store on every invocation and every
/// state change goes through one atomic per-user upsert.
pub struct WorkflowService {
    store: Arc<dyn SessionRepository>,
    provider: Arc<dyn ContentProvider>,
    renderer: QuizPdfRenderer,
}

impl WorkflowService {
    pub fn new(store: Arc<dyn SessionRepository>, provider: Arc<dyn ContentProvider>) -> Self {
        Self {
            store,
            provider,
            renderer: QuizPdfRenderer,
        }
    }

    pub async fn handle_message(&self, user_id: &str, text: &str) -> AppResult<Vec<Reply>> {
        match parse_intent(text) {
            UserIntent::Welcome => Ok(vec![Reply::Text(welcome_text())]),
            UserIntent::StartQuiz => self.handle_start_quiz(user_id).await,
            UserIntent::GetPdf => self.handle_get_pdf(user_id).await,
            UserIntent::Text(message) => {
                let session = self.store.find_by_user_id(user_id).await?;
                match session {
                    Some(session) if session.phase == Phase::QuizInProgress => {
                        self.handle_answer(session, &message).await
                    }
                    existing => self.handle_study_text(user_id, existing, &message).await,
                }
            }
        }
    }

    /// START_QUIZ enters (or restarts) the practice quiz from question 1.
    async fn handle_start_quiz(&self, user_id: &str) -> AppResult<Vec<Reply>> {
        let Some(mut session) = self.store.find_by_user_id(user_id).await? else {
            return Err(AppError::InvalidInput(no_materials_text()));
        };
        if session.quiz_bank.is_empty() {
            return Err(AppError::InvalidInput(no_materials_text()));
        }

        session.start_quiz();

        let total = session.quiz_bank.len();
        let Some(question) = session.current_question() else {
            return Err(AppError::InvalidInput(no_materials_text()));
        };
        let first_question = format_question(session.current_index, question, total);

        self.store.upsert(session).await?;

        Ok(vec![
            Reply::Text(format!(
                "🚀 Starting the full {}-question practice session. Answer with A, B, C or D.",
                total
            )),
            Reply::Text(first_question),
        ])
    }

    /// GET_PDF renders the stored bank without consuming any quiz state:
    /// the bank stays renderable at any phase once generated.
    async fn handle_get_pdf(&self, user_id: &str) -> AppResult<Vec<Reply>> {
        let Some(session) = self.store.find_by_user_id(user_id).await? else {
            return Err(AppError::InvalidInput(no_materials_text()));
        };
        if session.quiz_bank.is_empty() {
            return Err(AppError::InvalidInput(no_materials_text()));
        }

        let title = session
            .title
            .clone()
            .unwrap_or_else(|| "Study Material".to_string());
        let bytes = self.renderer.render(&title, &session.quiz_bank)?;
        let filename = format!("SenSei_AI_Quiz_{}.pdf", title.replace(' ', "_"));

        Ok(vec![Reply::Document { filename, bytes }])
    }

    /// Grades one answer. An answer matching none of the four choice
    /// tokens is wrong and still advances; there is no retry of the same
    /// question.
    async fn handle_answer(&self, mut session: StudySession, answer: &str) -> AppResult<Vec<Reply>> {
        let Some(question) = session.current_question() else {
            return Err(AppError::InvalidInput(no_materials_text()));
        };

        let correct = question.grade(answer);
        let feedback = format_feedback(correct, question);

        session.record_answer(correct);

        let followup = match session.current_question() {
            Some(next) => format_question(session.current_index, next, session.quiz_bank.len()),
            None => format_final_score(session.score, session.quiz_bank.len()),
        };

        self.store.upsert(session).await?;

        Ok(vec![Reply::Text(feedback), Reply::Text(followup)])
    }

    /// New study text runs a fresh audit. Any existing menu/completed
    /// session is implicitly reset; a failed audit leaves the store
    /// untouched.
    async fn handle_study_text(
        &self,
        user_id: &str,
        existing: Option<StudySession>,
        text: &str,
    ) -> AppResult<Vec<Reply>> {
        if is_answer_shaped(text) {
            return Err(AppError::InvalidInput(match existing {
                Some(session) if !session.quiz_bank.is_empty() => menu_reprompt_text(),
                _ => no_materials_text(),
            }));
        }

        if text.split_whitespace().count() < MIN_STUDY_TEXT_WORDS {
            return Ok(vec![Reply::Text(help_text())]);
        }

        let audit = self.provider.generate_audit(text).await?;
        let reply = format_audit_reply(&audit);

        let session = StudySession::from_audit(user_id, text, &audit);
        self.store.upsert(session).await?;

        Ok(vec![Reply::Text(reply)])
    }
}

fn welcome_text() -> String {
    "🎉 *Welcome to SenSei AI!* 🎉\n\n\
     I am your study buddy. To start, please send me any text from your \
     lecture notes, book, or article. I will instantly perform a full \
     audit and generate study materials!"
        .to_string()
}

fn help_text() -> String {
    "*I'm sorry, I need more text.* To use SenSei AI, please send your full \
     *notes or article* or ask a detailed question (e.g. 'What is paging \
     and segmentation?')."
        .to_string()
}

fn no_materials_text() -> String {
    "I don't have study materials for you yet! Please send me the notes or \
     article you want to analyze first."
        .to_string()
}

fn menu_reprompt_text() -> String {
    "Your study materials are ready, but no quiz is running. Reply \
     START_QUIZ to begin the practice quiz, or GET_PDF to download the \
     full quiz."
        .to_string()
}

fn menu_text() -> String {
    "🧠 Reply START_QUIZ to begin the practice quiz, or 📚 GET_PDF to \
     download the full quiz as a PDF."
        .to_string()
}

fn format_audit_reply(audit: &AuditResult) -> String {
    format!(
        "✅ *AUDIT COMPLETE: {}*\n\n💡 {}\n\n🎯 *Core Concepts Extracted:*\n— {}\n\n\
         Your study materials are ready! ({} questions generated)\n\n{}",
        escape_markdown(&audit.title),
        escape_markdown(&audit.answer),
        escape_markdown(&audit.concepts.join(", ")),
        audit.quiz_bank.len(),
        menu_text()
    )
}

fn format_question(index: usize, question: &Question, total: usize) -> String {
    let mut lines = vec![format!(
        "❓ *Practice Q{}/{}:*\n{}",
        index + 1,
        total,
        escape_markdown(&question.prompt)
    )];

    for (position, choice) in question.choices.iter().enumerate() {
        lines.push(format!(
            "{}. {}",
            Question::choice_label(position),
            escape_markdown(choice)
        ));
    }

    lines.push("\nReply with A, B, C or D.".to_string());
    lines.join("\n")
}

fn format_feedback(correct: bool, question: &Question) -> String {
    if correct {
        "🎯 *Correct!*".to_string()
    } else {
        format!(
            "❌ *Incorrect.* The answer was: *{}*",
            escape_markdown(question.correct_choice())
        )
    }
}

fn format_final_score(score: usize, total: usize) -> String {
    format!(
        "🎉 *Practice Quiz Finished!* You scored *{}/{}*. Send new notes \
         anytime to start another audit!",
        score, total
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{test_audit_result, test_session};
    use mockall::mock;

    mock! {
        Provider {}

        #[async_trait::async_trait]
        impl ContentProvider for Provider {
            async fn generate_audit(&self, text: &str) -> AppResult<AuditResult>;
        }
    }

    mock! {
        Store {}

        #[async_trait::async_trait]
        impl SessionRepository for Store {
            async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<StudySession>>;
            async fn upsert(&self, session: StudySession) -> AppResult<StudySession>;
            async fn delete(&self, user_id: &str) -> AppResult<()>;
        }
    }

    fn service(store: MockStore, provider: MockProvider) -> WorkflowService {
        WorkflowService::new(Arc::new(store), Arc::new(provider))
    }

    #[test]
    fn parse_intent_recognizes_named_tokens() {
        assert_eq!(parse_intent("START_QUIZ"), UserIntent::StartQuiz);
        assert_eq!(parse_intent("start_quiz"), UserIntent::StartQuiz);
        assert_eq!(parse_intent("GET_PDF"), UserIntent::GetPdf);
        assert_eq!(parse_intent("/pdf"), UserIntent::GetPdf);
        assert_eq!(parse_intent("/start"), UserIntent::Welcome);
    }

    #[test]
    fn parse_intent_maps_short_practice_requests_to_start_quiz() {
        assert_eq!(parse_intent("practice"), UserIntent::StartQuiz);
        assert_eq!(parse_intent("more questions"), UserIntent::StartQuiz);
        assert_eq!(parse_intent("next question"), UserIntent::StartQuiz);
    }

    #[test]
    fn parse_intent_treats_long_messages_as_study_text() {
        let text = "The practice of spaced repetition improves long term retention";
        assert_eq!(parse_intent(text), UserIntent::Text(text.to_string()));
    }

    #[tokio::test]
    async fn provider_failure_leaves_store_untouched() {
        let mut store = MockStore::new();
        store
            .expect_find_by_user_id()
            .returning(|_| Ok(None));
        store.expect_upsert().times(0);

        let mut provider = MockProvider::new();
        provider
            .expect_generate_audit()
            .returning(|_| Err(AppError::Provider("upstream failure".to_string())));

        let result = service(store, provider)
            .handle_message("chat-1", "Paging is a memory management scheme")
            .await;

        assert!(matches!(result, Err(AppError::Provider(_))));
    }

    #[tokio::test]
    async fn out_of_sequence_answer_is_invalid_input() {
        let mut store = MockStore::new();
        store
            .expect_find_by_user_id()
            .returning(|_| Ok(None));
        store.expect_upsert().times(0);

        let mut provider = MockProvider::new();
        provider.expect_generate_audit().times(0);

        let result = service(store, provider).handle_message("chat-1", "B").await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn answer_at_menu_reprompts_without_consuming_the_bank() {
        let mut store = MockStore::new();
        store
            .expect_find_by_user_id()
            .returning(|_| Ok(Some(test_session("chat-1", Phase::MenuPresented))));
        store.expect_upsert().times(0);

        let mut provider = MockProvider::new();
        provider.expect_generate_audit().times(0);

        let result = service(store, provider).handle_message("chat-1", "A").await;

        match result {
            Err(AppError::InvalidInput(message)) => {
                assert!(message.contains("START_QUIZ"));
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn short_messages_get_the_help_reply_without_an_audit() {
        let mut store = MockStore::new();
        store
            .expect_find_by_user_id()
            .returning(|_| Ok(None));
        store.expect_upsert().times(0);

        let mut provider = MockProvider::new();
        provider.expect_generate_audit().times(0);

        let replies = service(store, provider)
            .handle_message("chat-1", "hello there")
            .await
            .expect("help reply expected");

        assert_eq!(replies.len(), 1);
        assert!(matches!(&replies[0], Reply::Text(text) if text.contains("need more text")));
    }

    #[tokio::test]
    async fn study_text_runs_audit_and_persists_a_menu_session() {
        let mut store = MockStore::new();
        store
            .expect_find_by_user_id()
            .returning(|_| Ok(None));
        store
            .expect_upsert()
            .withf(|session: &StudySession| {
                session.phase == Phase::MenuPresented
                    && session.current_index == 0
                    && session.score == 0
                    && session.quiz_bank.len() == 20
            })
            .returning(Ok);

        let mut provider = MockProvider::new();
        provider
            .expect_generate_audit()
            .returning(|_| Ok(test_audit_result()));

        let replies = service(store, provider)
            .handle_message("chat-1", "Paging is a memory management scheme")
            .await
            .expect("audit reply expected");

        assert_eq!(replies.len(), 1);
        assert!(
            matches!(&replies[0], Reply::Text(text) if text.contains("AUDIT COMPLETE")
                && text.contains("START_QUIZ")
                && text.contains("GET_PDF"))
        );
    }
}
