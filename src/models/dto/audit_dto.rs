use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::AppError;
use crate::models::domain::audit::AuditResult;
use crate::models::domain::question::Question;

/// Wire shape of one audit response as the model must emit it. The
/// provider derives the structured-output schema from this type and
/// validates every response against it before anything reaches the
/// workflow controller.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
pub struct AuditResponseDto {
    /// The concise, main title of the material.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Direct answer for question-style input, or a short summary of
    /// submitted notes.
    #[validate(length(min = 1))]
    pub answer: String,

    /// Exactly 5 critical technical or academic terms.
    #[validate(length(equal = 5))]
    pub concepts: Vec<String>,

    /// Exactly 20 multiple-choice questions covering the input.
    #[validate(length(equal = 20), nested)]
    pub quiz_bank: Vec<QuizQuestionDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
pub struct QuizQuestionDto {
    /// The full text of the multiple-choice question.
    #[validate(length(min = 1))]
    pub prompt: String,

    /// Exactly 4 plausible answer choices with no duplicate text.
    #[validate(length(equal = 4), custom(function = validate_distinct_choices))]
    pub choices: Vec<String>,

    /// Index into `choices` of the single correct answer.
    #[validate(range(max = 3))]
    pub correct_choice_index: usize,
}

fn validate_distinct_choices(choices: &[String]) -> Result<(), ValidationError> {
    let mut seen: Vec<&str> = choices.iter().map(|c| c.trim()).collect();
    seen.sort_unstable();
    seen.dedup();
    if seen.len() != choices.len() {
        return Err(ValidationError::new("duplicate_choice_text"));
    }
    Ok(())
}

impl From<QuizQuestionDto> for Question {
    fn from(dto: QuizQuestionDto) -> Self {
        Question {
            prompt: dto.prompt,
            choices: dto.choices,
            correct_choice_index: dto.correct_choice_index,
        }
    }
}

impl TryFrom<AuditResponseDto> for AuditResult {
    type Error = AppError;

    /// Either a fully valid audit or a `Provider` error — partial
    /// results never leave the client.
    fn try_from(dto: AuditResponseDto) -> Result<Self, Self::Error> {
        dto.validate()
            .map_err(|e| AppError::Provider(format!("malformed audit response: {}", e)))?;

        let audit = AuditResult {
            title: dto.title,
            answer: dto.answer,
            concepts: dto.concepts,
            quiz_bank: dto.quiz_bank.into_iter().map(Question::from).collect(),
        };

        audit
            .validate()
            .map_err(|e| AppError::Provider(format!("malformed audit response: {}", e)))?;

        Ok(audit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::test_audit_response_dto;

    #[test]
    fn valid_dto_converts_to_domain_audit() {
        let dto = test_audit_response_dto();

        let audit: AuditResult = dto.try_into().expect("conversion should succeed");

        assert_eq!(audit.concepts.len(), 5);
        assert_eq!(audit.quiz_bank.len(), 20);
        assert!(audit.validate().is_ok());
    }

    #[test]
    fn conversion_rejects_wrong_concept_count() {
        let mut dto = test_audit_response_dto();
        dto.concepts.pop();

        let result: Result<AuditResult, _> = dto.try_into();
        assert!(matches!(result, Err(AppError::Provider(_))));
    }

    #[test]
    fn conversion_rejects_short_quiz_bank() {
        let mut dto = test_audit_response_dto();
        dto.quiz_bank.truncate(12);

        let result: Result<AuditResult, _> = dto.try_into();
        assert!(matches!(result, Err(AppError::Provider(_))));
    }

    #[test]
    fn conversion_rejects_duplicate_choice_text() {
        let mut dto = test_audit_response_dto();
        dto.quiz_bank[0].choices[1] = dto.quiz_bank[0].choices[0].clone();

        let result: Result<AuditResult, _> = dto.try_into();
        assert!(matches!(result, Err(AppError::Provider(_))));
    }

    #[test]
    fn conversion_rejects_out_of_range_correct_index() {
        let mut dto = test_audit_response_dto();
        dto.quiz_bank[3].correct_choice_index = 4;

        let result: Result<AuditResult, _> = dto.try_into();
        assert!(matches!(result, Err(AppError::Provider(_))));
    }

    #[test]
    fn dto_deserialization_tolerates_extra_fields() {
        let json = r#"{
            "prompt": "What does a page table map?",
            "choices": ["Virtual to physical addresses", "Files to blocks", "Threads to cores", "Sockets to ports"],
            "correct_choice_index": 0,
            "difficulty": "easy"
        }"#;

        let dto: QuizQuestionDto = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(dto.correct_choice_index, 0);
        assert!(dto.validate().is_ok());
    }
}
