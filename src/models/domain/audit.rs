use crate::models::domain::question::Question;
use crate::models::domain::study_session::QUIZ_BANK_SIZE;

/// Every audit extracts exactly this many core concepts.
pub const CONCEPT_COUNT: usize = 5;

/// The transient output of one audit request: a direct answer (or
/// summary), the extracted core concepts, and the generated quiz bank.
/// Never persisted — the bank and title are copied into the session and
/// the rest is formatted into the reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditResult {
    pub title: String,
    pub answer: String,
    pub concepts: Vec<String>,
    pub quiz_bank: Vec<Question>,
}

impl AuditResult {
    /// Checks the full structural contract: 5 concepts, 20 questions,
    /// and every question individually valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.concepts.len() != CONCEPT_COUNT {
            return Err(format!(
                "expected {} concepts, got {}",
                CONCEPT_COUNT,
                self.concepts.len()
            ));
        }

        if self.quiz_bank.len() != QUIZ_BANK_SIZE {
            return Err(format!(
                "expected {} questions, got {}",
                QUIZ_BANK_SIZE,
                self.quiz_bank.len()
            ));
        }

        for (index, question) in self.quiz_bank.iter().enumerate() {
            question
                .validate()
                .map_err(|e| format!("question {}: {}", index + 1, e))?;
        }

        Ok(())
    }
}
