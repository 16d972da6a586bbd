use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::audit::AuditResult;
use crate::models::domain::question::Question;

/// Every audit produces a bank of exactly this many questions.
pub const QUIZ_BANK_SIZE: usize = 20;

/// Position of a user's session within the study workflow. Kept as a
/// tagged enum so an invalid phase cannot be stored or matched on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Phase {
    Idle,
    MenuPresented,
    QuizInProgress,
    Complete,
}

/// The one persisted record per chat user: which phase they are in, the
/// quiz bank their last audit produced, and their progress through it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct StudySession {
    pub id: String,
    pub user_id: String,
    pub phase: Phase,
    pub title: Option<String>,
    pub source_text: String,
    pub quiz_bank: Vec<Question>,
    pub current_index: usize,
    pub score: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl StudySession {
    /// Builds a fresh session from a completed audit. The quiz bank is
    /// copied out of the transient audit result; the session starts at
    /// the menu with no progress.
    pub fn from_audit(user_id: &str, source_text: &str, audit: &AuditResult) -> Self {
        StudySession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            phase: Phase::MenuPresented,
            title: Some(audit.title.clone()),
            source_text: source_text.to_string(),
            quiz_bank: audit.quiz_bank.clone(),
            current_index: 0,
            score: 0,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz_bank.get(self.current_index)
    }

    /// Enters (or restarts) the practice quiz from question 1.
    pub fn start_quiz(&mut self) {
        self.phase = Phase::QuizInProgress;
        self.current_index = 0;
        self.score = 0;
        self.modified_at = Some(Utc::now());
    }

    /// Records the outcome of one answered question. The index advances
    /// exactly once per answer, wrong or right; reaching the end of the
    /// bank completes the quiz.
    pub fn record_answer(&mut self, correct: bool) {
        debug_assert_eq!(self.phase, Phase::QuizInProgress);

        if correct {
            self.score += 1;
        }
        self.current_index += 1;

        if self.current_index >= self.quiz_bank.len() {
            self.phase = Phase::Complete;
        }
        self.modified_at = Some(Utc::now());
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }
}
