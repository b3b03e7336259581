use serde::Deserialize;
use thiserror::Error;

/// Number of candidate answers every riddle carries.
pub const CHOICE_COUNT: usize = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RiddleError {
    #[error("riddle question must not be empty")]
    EmptyQuestion,

    #[error("riddle must have exactly {CHOICE_COUNT} choices, got {len}")]
    ChoiceCount { len: usize },

    #[error("choice {index} must not be empty")]
    EmptyChoice { index: usize },

    #[error("choice {index} duplicates an earlier choice")]
    DuplicateChoice { index: usize },

    #[error("correct index {index} is out of range")]
    CorrectIndexOutOfRange { index: i64 },
}

/// Raw riddle as produced by the upstream generator.
///
/// Nothing here is trusted; call [`RiddlePayload::validate`] to obtain a [`Riddle`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiddlePayload {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default = "missing_index")]
    pub correct_index: i64,
}

fn missing_index() -> i64 {
    -1
}

impl RiddlePayload {
    /// Check the payload and turn it into an immutable [`Riddle`].
    ///
    /// Question and choices are trimmed. Choices are compared case-insensitively
    /// for uniqueness, matching how answers are compared.
    ///
    /// # Errors
    ///
    /// Returns `RiddleError` when the question is empty, the choice count is not
    /// exactly three, a choice is empty or repeated, or the correct index is out of range.
    pub fn validate(self) -> Result<Riddle, RiddleError> {
        let question = self.question.trim();
        if question.is_empty() {
            return Err(RiddleError::EmptyQuestion);
        }

        if self.choices.len() != CHOICE_COUNT {
            return Err(RiddleError::ChoiceCount {
                len: self.choices.len(),
            });
        }

        let mut choices: [String; CHOICE_COUNT] = Default::default();
        for (index, raw) in self.choices.iter().enumerate() {
            let choice = raw.trim();
            if choice.is_empty() {
                return Err(RiddleError::EmptyChoice { index });
            }
            if choices[..index]
                .iter()
                .any(|earlier| earlier.to_lowercase() == choice.to_lowercase())
            {
                return Err(RiddleError::DuplicateChoice { index });
            }
            choices[index] = choice.to_string();
        }

        let correct_index = usize::try_from(self.correct_index)
            .ok()
            .filter(|index| *index < CHOICE_COUNT)
            .ok_or(RiddleError::CorrectIndexOutOfRange {
                index: self.correct_index,
            })?;

        Ok(Riddle {
            question: question.to_string(),
            choices,
            correct_index,
        })
    }
}

/// A validated multiple-choice riddle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Riddle {
    question: String,
    choices: [String; CHOICE_COUNT],
    correct_index: usize,
}

impl Riddle {
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn choices(&self) -> &[String; CHOICE_COUNT] {
        &self.choices
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn correct_choice(&self) -> &str {
        &self.choices[self.correct_index]
    }

    /// Case-insensitive comparison of `answer` against the correct choice.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        answer.trim().to_lowercase() == self.correct_choice().to_lowercase()
    }

    /// Returns the same riddle with its choices reordered.
    ///
    /// `order[i]` names the current position of the choice that moves to slot `i`.
    /// Returns `None` unless `order` is a permutation of `0..3`.
    #[must_use]
    pub fn reordered(&self, order: [usize; CHOICE_COUNT]) -> Option<Self> {
        let mut seen = [false; CHOICE_COUNT];
        for &from in &order {
            if from >= CHOICE_COUNT || seen[from] {
                return None;
            }
            seen[from] = true;
        }

        let choices = order.map(|from| self.choices[from].clone());
        let correct_index = order.iter().position(|&from| from == self.correct_index)?;
        Some(Self {
            question: self.question.clone(),
            choices,
            correct_index,
        })
    }
}
