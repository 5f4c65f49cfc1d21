//! First-failure validation of quiz drafts.
//!
//! The validator is the single decision point for rejecting a draft: the
//! compiler never fails, it only encodes malformed input as data. Checks
//! run in a fixed order and the first violated rule wins; callers rely on
//! receiving exactly that code, so the ordering here is load-bearing.
//!
//! Validation operates on a [`serde_json::Value`] rather than on
//! [`crate::QuestionDraft`] because submitted records arrive loosely shaped:
//! a missing `answers` field or a non-string question must be rejectable
//! with its own code, which the strict struct could not even represent.

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;

use crate::draft::HEADING_SENTINEL;

/// Minimum length for question, answer, and explanation text.
const TEXT_MIN: usize = 2;
/// Maximum length for question and answer text.
const TEXT_MAX: usize = 2048;
/// Maximum length for explanation text.
const EXPLANATION_MAX: usize = 4096;

/// Attachment types that require content on an answer.
const ANSWER_MEDIA_KINDS: [&str; 4] = ["codespan", "image", "video", "audio"];
/// Attachment types that require content on a choice question.
const QUESTION_MEDIA_KINDS: [&str; 4] = ["code", "image", "video", "audio"];

/// Stable error codes reported by draft validation.
///
/// The `Display` form is the code itself; resolving a code into
/// human-readable text is the caller's concern, not the core's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Question text missing or empty.
    #[error("quiz_question_required")]
    QuestionRequired,
    /// Question text is not a string.
    #[error("quiz_question_invalid_format")]
    QuestionInvalidFormat,
    /// Question text length out of bounds.
    #[error("quiz_question_length")]
    QuestionLength,
    /// Question text is the stray-heading sentinel.
    #[error("quiz_question_heading")]
    QuestionHeading,
    /// Explanation is not a string.
    #[error("quiz_explanation_invalid_format")]
    ExplanationInvalidFormat,
    /// Explanation length out of bounds.
    #[error("quiz_explanation_length")]
    ExplanationLength,
    /// Answers missing or not a sequence.
    #[error("quiz_answers_invalid_format")]
    AnswersInvalidFormat,
    /// Open question without options content.
    #[error("quiz_open_options_required")]
    OpenOptionsRequired,
    /// Open question without its single answer.
    #[error("quiz_open_answer_required")]
    OpenAnswerRequired,
    /// Open question with more than one answer.
    #[error("quiz_open_answer_single")]
    OpenAnswerSingle,
    /// Open answer text length out of bounds.
    #[error("quiz_open_answer_length")]
    OpenAnswerLength,
    /// Fewer than two answers on a choice question.
    #[error("quiz_answers_required")]
    AnswersRequired,
    /// Answer text missing or empty.
    #[error("quiz_answer_required")]
    AnswerRequired,
    /// Answer text length out of bounds.
    #[error("quiz_answer_length")]
    AnswerLength,
    /// Answer text is the stray-heading sentinel.
    #[error("quiz_answer_heading")]
    AnswerHeading,
    /// Answer attachment without content.
    #[error("quiz_answer_options_content_required")]
    AnswerOptionsContentRequired,
    /// Two answers share the same text.
    #[error("quiz_duplicate_answers")]
    DuplicateAnswers,
    /// No answer marked correct.
    #[error("quiz_correct_answer_required")]
    CorrectAnswerRequired,
    /// Question attachment without content.
    #[error("quiz_options_content_required")]
    OptionsContentRequired,
}

impl ValidationError {
    /// Stable code consumed by the message-lookup layer.
    pub fn code(self) -> &'static str {
        match self {
            ValidationError::QuestionRequired => "quiz_question_required",
            ValidationError::QuestionInvalidFormat => "quiz_question_invalid_format",
            ValidationError::QuestionLength => "quiz_question_length",
            ValidationError::QuestionHeading => "quiz_question_heading",
            ValidationError::ExplanationInvalidFormat => "quiz_explanation_invalid_format",
            ValidationError::ExplanationLength => "quiz_explanation_length",
            ValidationError::AnswersInvalidFormat => "quiz_answers_invalid_format",
            ValidationError::OpenOptionsRequired => "quiz_open_options_required",
            ValidationError::OpenAnswerRequired => "quiz_open_answer_required",
            ValidationError::OpenAnswerSingle => "quiz_open_answer_single",
            ValidationError::OpenAnswerLength => "quiz_open_answer_length",
            ValidationError::AnswersRequired => "quiz_answers_required",
            ValidationError::AnswerRequired => "quiz_answer_required",
            ValidationError::AnswerLength => "quiz_answer_length",
            ValidationError::AnswerHeading => "quiz_answer_heading",
            ValidationError::AnswerOptionsContentRequired => {
                "quiz_answer_options_content_required"
            }
            ValidationError::DuplicateAnswers => "quiz_duplicate_answers",
            ValidationError::CorrectAnswerRequired => "quiz_correct_answer_required",
            ValidationError::OptionsContentRequired => "quiz_options_content_required",
        }
    }
}

/// Validates one draft record, reporting the first violated rule.
///
/// Pure and deterministic: the record is never mutated and re-validating
/// an accepted record stays accepted.
pub fn validate(draft: &Value) -> Result<(), ValidationError> {
    let question = draft.get("question");
    if !truthy(question) {
        return Err(ValidationError::QuestionRequired);
    }
    let Some(Value::String(question)) = question else {
        return Err(ValidationError::QuestionInvalidFormat);
    };
    check_text(
        question,
        ValidationError::QuestionLength,
        ValidationError::QuestionHeading,
    )?;

    let explanation = draft.get("explanation");
    if truthy(explanation) {
        let Some(Value::String(explanation)) = explanation else {
            return Err(ValidationError::ExplanationInvalidFormat);
        };
        let len = explanation.chars().count();
        if !(TEXT_MIN..=EXPLANATION_MAX).contains(&len) {
            return Err(ValidationError::ExplanationLength);
        }
    }

    let Some(Value::Array(answers)) = draft.get("answers") else {
        return Err(ValidationError::AnswersInvalidFormat);
    };

    let options = draft.get("options");
    if options_kind(options).is_some_and(|kind| kind.contains("open")) {
        validate_open(options, answers)
    } else {
        validate_choice(options, answers)
    }
}

/// Open-question rules: content present, exactly one answer, sane length.
fn validate_open(options: Option<&Value>, answers: &[Value]) -> Result<(), ValidationError> {
    if !truthy(options.and_then(|options| options.get("content"))) {
        return Err(ValidationError::OpenOptionsRequired);
    }
    let answer = match answers {
        [] => return Err(ValidationError::OpenAnswerRequired),
        [answer] => answer,
        _ => return Err(ValidationError::OpenAnswerSingle),
    };
    let text = answer_text(answer);
    let len = text.chars().count();
    if !(TEXT_MIN..=TEXT_MAX).contains(&len) {
        return Err(ValidationError::OpenAnswerLength);
    }
    Ok(())
}

/// Multiple-choice rules: two or more answers, each well-formed, pairwise
/// distinct, at least one correct, media attachments carrying content.
fn validate_choice(options: Option<&Value>, answers: &[Value]) -> Result<(), ValidationError> {
    if answers.len() < 2 {
        return Err(ValidationError::AnswersRequired);
    }

    for answer in answers {
        if !truthy(answer.get("answer")) {
            return Err(ValidationError::AnswerRequired);
        }
        check_text(
            answer_text(answer),
            ValidationError::AnswerLength,
            ValidationError::AnswerHeading,
        )?;
        let kind = options_kind(answer.get("options"));
        if kind.is_some_and(|kind| ANSWER_MEDIA_KINDS.contains(&kind))
            && !truthy(answer.get("options").and_then(|options| options.get("content")))
        {
            return Err(ValidationError::AnswerOptionsContentRequired);
        }
    }

    let mut seen = HashSet::new();
    for answer in answers {
        if !seen.insert(answer_text(answer)) {
            return Err(ValidationError::DuplicateAnswers);
        }
    }

    if !answers.iter().any(|answer| truthy(answer.get("is_correct"))) {
        return Err(ValidationError::CorrectAnswerRequired);
    }

    if options_kind(options).is_some_and(|kind| QUESTION_MEDIA_KINDS.contains(&kind))
        && !truthy(options.and_then(|options| options.get("content")))
    {
        return Err(ValidationError::OptionsContentRequired);
    }

    Ok(())
}

/// Length gate with the stray-heading special case: the sentinel text
/// reports its heading code instead of the generic length code.
fn check_text(
    text: &str,
    length_code: ValidationError,
    heading_code: ValidationError,
) -> Result<(), ValidationError> {
    let len = text.chars().count();
    if (TEXT_MIN..=TEXT_MAX).contains(&len) {
        return Ok(());
    }
    if text == HEADING_SENTINEL {
        Err(heading_code)
    } else {
        Err(length_code)
    }
}

/// Reads `options.type` from a record, when present.
fn options_kind(options: Option<&Value>) -> Option<&str> {
    options?.get("type")?.as_str()
}

/// Reads an answer's text; non-string values count as empty.
fn answer_text(answer: &Value) -> &str {
    answer.get("answer").and_then(Value::as_str).unwrap_or_default()
}

/// Presence test for loosely-typed record fields: a missing key, `null`,
/// `false`, `0`, or an empty string all count as absent.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Number(number)) => number.as_f64() != Some(0.0),
        Some(_) => true,
    }
}
