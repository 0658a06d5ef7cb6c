//! Poll creation form state and client-side validation.
//!
//! [`PollForm`] backs the create view: a question plus a growable list of
//! choices. [`QuestionForm`] backs the legacy single-question form.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::model::CreatePollRequest;

/// Maximum question length, in characters.
pub const MAX_QUESTION_LENGTH: usize = 200;

/// Minimum trimmed question length, in characters.
pub const MIN_QUESTION_LENGTH: usize = 3;

/// Minimum number of non-empty options a poll needs.
pub const MIN_OPTIONS: usize = 2;

/// Validation errors of a poll form, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    /// Error for the question field.
    pub question: Option<String>,
    /// Error for the option list as a whole.
    pub options: Option<String>,
    /// Errors for individual option slots, by index.
    pub option_slots: BTreeMap<usize, String>,
}

impl FormErrors {
    /// Whether the form has no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.question.is_none() && self.options.is_none() && self.option_slots.is_empty()
    }

    /// Error recorded for a single option slot.
    #[must_use]
    pub fn option_slot(&self, index: usize) -> Option<&str> {
        self.option_slots.get(&index).map(String::as_str)
    }

    /// All messages in display order: question, option list, then slots.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        let mut messages = Vec::new();
        if let Some(question) = &self.question {
            messages.push(question.clone());
        }
        if let Some(options) = &self.options {
            messages.push(options.clone());
        }
        for (index, message) in &self.option_slots {
            messages.push(format!("Choice {}: {message}", index + 1));
        }
        messages
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

/// Render a `"{len} / {max}"` character counter.
fn char_counter(text: &str) -> String {
    format!("{} / {MAX_QUESTION_LENGTH}", text.chars().count())
}

/// State of the poll creation form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollForm {
    question: String,
    options: Vec<String>,
    errors: FormErrors,
}

impl Default for PollForm {
    fn default() -> Self {
        Self {
            question: String::new(),
            options: vec![String::new(); MIN_OPTIONS],
            errors: FormErrors::default(),
        }
    }
}

impl PollForm {
    /// Create an empty form with two blank choices.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current, untrimmed question.
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The current option texts, including blanks.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Errors from the last validation.
    #[must_use]
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Replace the question.
    ///
    /// Input longer than [`MAX_QUESTION_LENGTH`] characters is refused and the
    /// previous value kept. Returns whether the value was accepted.
    pub fn set_question(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.chars().count() > MAX_QUESTION_LENGTH {
            return false;
        }
        self.question = value;
        true
    }

    /// Character counter for the question, e.g. `"12 / 200"`.
    #[must_use]
    pub fn char_counter(&self) -> String {
        char_counter(&self.question)
    }

    /// Replace the text of one option and clear that slot's error.
    ///
    /// # Errors
    ///
    /// Returns an internal error if `index` is out of range.
    pub fn set_option(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        let slot = self
            .options
            .get_mut(index)
            .ok_or_else(|| Error::internal(format!("no choice at index {index}")))?;
        *slot = value.into();
        self.errors.option_slots.remove(&index);
        Ok(())
    }

    /// Append a blank choice.
    pub fn add_choice(&mut self) {
        self.options.push(String::new());
    }

    /// Remove a choice, keeping at least [`MIN_OPTIONS`] slots.
    ///
    /// Returns whether a choice was removed.
    pub fn remove_choice(&mut self, index: usize) -> bool {
        if self.options.len() <= MIN_OPTIONS || index >= self.options.len() {
            return false;
        }
        self.options.remove(index);
        true
    }

    /// Whether choices can currently be removed.
    #[must_use]
    pub fn can_remove_choices(&self) -> bool {
        self.options.len() > MIN_OPTIONS
    }

    /// Recompute validation errors. Returns `true` when the form is valid.
    pub fn validate(&mut self) -> bool {
        let mut errors = FormErrors::default();

        let question = self.question.trim();
        if question.is_empty() {
            errors.question = Some("Poll question is required".to_string());
        } else if question.chars().count() < MIN_QUESTION_LENGTH {
            errors.question = Some(format!(
                "Question must be at least {MIN_QUESTION_LENGTH} characters"
            ));
        }

        let filled = self.filled_options().count();
        if filled < MIN_OPTIONS {
            errors.options = Some(format!("At least {MIN_OPTIONS} options are required"));
        }

        for (index, option) in self.options.iter().enumerate().take(MIN_OPTIONS) {
            if option.trim().is_empty() {
                errors
                    .option_slots
                    .insert(index, "This option is required".to_string());
            }
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Validate and build the creation request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] carrying the form errors if the form is
    /// not valid.
    pub fn to_request(&mut self, creator_id: Option<i64>) -> Result<CreatePollRequest> {
        if !self.validate() {
            return Err(Error::Validation(self.errors.clone()));
        }
        Ok(CreatePollRequest {
            question: self.question.trim().to_string(),
            options: self.filled_options().map(str::to_string).collect(),
            creator_id,
        })
    }

    fn filled_options(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
    }
}

/// State of the legacy single-question form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionForm {
    question: String,
}

impl QuestionForm {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the question text.
    pub fn set_question(&mut self, value: impl Into<String>) {
        self.question = value.into();
    }

    /// Character counter for the question, e.g. `"0 / 200"`.
    #[must_use]
    pub fn char_counter(&self) -> String {
        char_counter(&self.question)
    }

    /// Clear the form after a successful submission.
    pub fn reset(&mut self) {
        self.question.clear();
    }

    /// Validate and return the trimmed question.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the question is blank.
    pub fn validate(&self) -> Result<String> {
        let question = self.question.trim();
        if question.is_empty() {
            return Err(Error::Validation(FormErrors {
                question: Some("Poll question cannot be empty.".to_string()),
                ..FormErrors::default()
            }));
        }
        Ok(question.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> PollForm {
        let mut form = PollForm::new();
        form.set_question("Favourite colour?");
        form.set_option(0, "Red").unwrap();
        form.set_option(1, "Blue").unwrap();
        form
    }

    #[test]
    fn test_new_form_has_two_blank_choices() {
        let form = PollForm::new();
        assert_eq!(form.options(), &[String::new(), String::new()]);
        assert!(!form.can_remove_choices());
        assert_eq!(form.char_counter(), "0 / 200");
    }

    #[test]
    fn test_empty_question_rejected() {
        let mut form = filled_form();
        form.set_question("   ");
        assert!(!form.validate());
        assert_eq!(
            form.errors().question.as_deref(),
            Some("Poll question is required")
        );
    }

    #[test]
    fn test_short_question_rejected() {
        let mut form = filled_form();
        form.set_question("  Hi ");
        assert!(!form.validate());
        assert_eq!(
            form.errors().question.as_deref(),
            Some("Question must be at least 3 characters")
        );
    }

    #[test]
    fn test_fewer_than_two_options_rejected() {
        let mut form = PollForm::new();
        form.set_question("Which one?");
        form.set_option(0, "Only me").unwrap();
        assert!(!form.validate());
        assert_eq!(
            form.errors().options.as_deref(),
            Some("At least 2 options are required")
        );
        assert_eq!(form.errors().option_slot(1), Some("This option is required"));
        assert_eq!(form.errors().option_slot(0), None);
    }

    #[test]
    fn test_blank_extra_choice_is_not_an_error() {
        let mut form = filled_form();
        form.add_choice();
        assert!(form.validate());
        let request = form.to_request(None).unwrap();
        assert_eq!(request.options, vec!["Red", "Blue"]);
    }

    #[test]
    fn test_filled_later_slots_count_toward_minimum() {
        let mut form = PollForm::new();
        form.set_question("Pick");
        form.add_choice();
        form.set_option(0, "A").unwrap();
        form.set_option(2, "C").unwrap();
        assert!(!form.validate());
        // Two filled options satisfy the minimum, but slot 1 is still required.
        assert!(form.errors().options.is_none());
        assert_eq!(form.errors().option_slot(1), Some("This option is required"));
    }

    #[test]
    fn test_counter_matches_input_length() {
        let mut form = PollForm::new();
        assert!(form.set_question("héllo "));
        assert_eq!(form.char_counter(), "6 / 200");
    }

    #[test]
    fn test_overlong_question_refused() {
        let mut form = PollForm::new();
        assert!(form.set_question("a".repeat(MAX_QUESTION_LENGTH)));
        assert!(!form.set_question("b".repeat(MAX_QUESTION_LENGTH + 1)));
        assert_eq!(form.question(), "a".repeat(MAX_QUESTION_LENGTH));
        assert_eq!(form.char_counter(), "200 / 200");
    }

    #[test]
    fn test_set_option_clears_slot_error() {
        let mut form = PollForm::new();
        form.set_question("Question?");
        assert!(!form.validate());
        assert!(form.errors().option_slot(0).is_some());

        form.set_option(0, "A").unwrap();
        assert!(form.errors().option_slot(0).is_none());
        assert!(form.errors().option_slot(1).is_some());
    }

    #[test]
    fn test_set_option_out_of_range() {
        let mut form = PollForm::new();
        assert!(form.set_option(5, "nope").is_err());
    }

    #[test]
    fn test_remove_choice_keeps_minimum() {
        let mut form = filled_form();
        assert!(!form.remove_choice(0));

        form.add_choice();
        form.set_option(2, "Green").unwrap();
        assert!(form.remove_choice(0));
        assert_eq!(form.options(), &["Blue".to_string(), "Green".to_string()]);
        assert!(!form.remove_choice(1));
    }

    #[test]
    fn test_to_request_trims() {
        let mut form = PollForm::new();
        form.set_question("  Best pet?  ");
        form.set_option(0, " Cat ").unwrap();
        form.set_option(1, "Dog").unwrap();
        let request = form.to_request(Some(4)).unwrap();
        assert_eq!(request.question, "Best pet?");
        assert_eq!(request.options, vec!["Cat", "Dog"]);
        assert_eq!(request.creator_id, Some(4));
    }

    #[test]
    fn test_to_request_invalid() {
        let mut form = PollForm::new();
        let err = form.to_request(None).unwrap_err();
        match err {
            Error::Validation(errors) => {
                assert!(errors.question.is_some());
                assert!(errors.options.is_some());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_form_errors_display() {
        let mut form = PollForm::new();
        form.validate();
        let text = form.errors().to_string();
        assert!(text.starts_with("Poll question is required"));
        assert!(text.contains("Choice 2: This option is required"));
    }

    #[test]
    fn test_question_form_rejects_blank() {
        let mut form = QuestionForm::new();
        form.set_question("  ");
        let err = form.validate().unwrap_err();
        assert!(err.to_string().contains("Poll question cannot be empty."));
    }

    #[test]
    fn test_question_form_counter_and_reset() {
        let mut form = QuestionForm::new();
        form.set_question("Lunch?");
        assert_eq!(form.char_counter(), "6 / 200");
        assert_eq!(form.validate().unwrap(), "Lunch?");
        form.reset();
        assert_eq!(form.char_counter(), "0 / 200");
    }
}
