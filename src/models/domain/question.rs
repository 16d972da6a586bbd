use serde::{Deserialize, Serialize};

/// Every generated question carries exactly this many answer choices.
pub const CHOICES_PER_QUESTION: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct_choice_index: usize,
}

impl Question {
    pub fn new(prompt: &str, choices: Vec<String>, correct_choice_index: usize) -> Self {
        Question {
            prompt: prompt.to_string(),
            choices,
            correct_choice_index,
        }
    }

    /// Checks the structural invariants: 4 choices, no duplicate choice
    /// text, correct index in bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.prompt.trim().is_empty() {
            return Err("question prompt is empty".to_string());
        }

        if self.choices.len() != CHOICES_PER_QUESTION {
            return Err(format!(
                "expected {} choices, got {}",
                CHOICES_PER_QUESTION,
                self.choices.len()
            ));
        }

        let mut seen: Vec<&str> = self.choices.iter().map(|c| c.trim()).collect();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != CHOICES_PER_QUESTION {
            return Err("choice set contains duplicate text".to_string());
        }

        if self.correct_choice_index >= CHOICES_PER_QUESTION {
            return Err(format!(
                "correct_choice_index {} out of bounds",
                self.correct_choice_index
            ));
        }

        Ok(())
    }

    /// Letter label for a choice position: 0 -> 'A', 3 -> 'D'.
    pub fn choice_label(index: usize) -> char {
        (b'A' + index as u8) as char
    }

    /// Grades a free-text answer. Accepts the letter label or the full
    /// choice text, both case-insensitive. Anything that matches none of
    /// the four choice tokens is wrong.
    pub fn grade(&self, answer: &str) -> bool {
        self.matched_choice(answer)
            .map(|index| index == self.correct_choice_index)
            .unwrap_or(false)
    }

    fn matched_choice(&self, answer: &str) -> Option<usize> {
        let answer = answer.trim();

        if answer.len() == 1 {
            let letter = answer.chars().next()?.to_ascii_uppercase();
            let index = (letter as u8).checked_sub(b'A')? as usize;
            if index < self.choices.len() {
                return Some(index);
            }
            return None;
        }

        self.choices
            .iter()
            .position(|choice| choice.trim().eq_ignore_ascii_case(answer))
    }

    pub fn correct_choice(&self) -> &str {
        &self.choices[self.correct_choice_index]
    }
}
