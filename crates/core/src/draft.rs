//! Draft records produced by the token compiler.
//!
//! Drafts are in-memory, not-yet-validated question records. Field names
//! follow the persisted wire format exactly; downstream storage depends on
//! them, so every rename here is a breaking change.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::media::MediaKind;

/// Question text used for drafts compiled from malformed documents.
///
/// The validator recognizes this exact text and reports a heading error
/// code instead of a generic length error.
pub const HEADING_SENTINEL: &str = "H";

/// Content carried by an [`OptionSpec`]: literal text, a URL, or the
/// boolean sentinel `true` used for open questions with no attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionContent {
    /// Literal text or a media URL.
    Text(String),
    /// Boolean sentinel.
    Flag(bool),
}

/// Media or code attachment of a question or answer.
///
/// `type` is absent or one of `code`, `codespan`, `image`, `video`,
/// `audio`, `open`, or a hyphenated combination such as `code-open`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Attachment type label.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Attached content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<OptionContent>,
}

impl OptionSpec {
    /// Code block attachment.
    pub fn code(text: impl Into<String>) -> Self {
        Self {
            kind: Some("code".to_string()),
            content: Some(OptionContent::Text(text.into())),
        }
    }

    /// Inline code span attachment.
    pub fn codespan(text: impl Into<String>) -> Self {
        Self {
            kind: Some("codespan".to_string()),
            content: Some(OptionContent::Text(text.into())),
        }
    }

    /// Media attachment.
    pub fn media(kind: MediaKind, url: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.as_str().to_string()),
            content: Some(OptionContent::Text(url.into())),
        }
    }

    /// True when the type label marks an open question.
    pub fn is_open(&self) -> bool {
        self.kind.as_deref().is_some_and(|kind| kind.contains("open"))
    }

    /// Converts the spec into its open-question form: the type gains an
    /// `-open` suffix (or becomes plain `open`), and missing content
    /// defaults to the boolean sentinel.
    pub fn into_open(self) -> Self {
        let kind = match self.kind {
            Some(kind) => format!("{kind}-open"),
            None => "open".to_string(),
        };
        Self {
            kind: Some(kind),
            content: self.content.or(Some(OptionContent::Flag(true))),
        }
    }
}

/// One answer choice accumulated for a question draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerDraft {
    /// Unique identifier, freshly minted per compilation.
    pub answer_id: String,
    /// Visible answer text.
    pub answer: String,
    /// Attachment, if any.
    pub options: OptionSpec,
    /// Whether this choice is marked correct.
    pub is_correct: bool,
}

impl AnswerDraft {
    /// Creates an empty answer with a fresh id.
    pub fn new() -> Self {
        Self {
            answer_id: format!("a_{}", nanoid::nanoid!(10)),
            answer: String::new(),
            options: OptionSpec::default(),
            is_correct: false,
        }
    }
}

impl Default for AnswerDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// One not-yet-validated quiz question produced by the compiler.
///
/// Emitted drafts are never mutated after compilation; any change happens
/// on a copy owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDraft {
    /// Question text ([`HEADING_SENTINEL`] for malformed input).
    pub question: String,
    /// Question-level attachment.
    pub options: OptionSpec,
    /// Ordered answer choices.
    pub answers: Vec<AnswerDraft>,
    /// Optional explanation shown after answering.
    pub explanation: Option<String>,
    /// Attempt counter, always 0 at creation.
    pub attempts: i64,
    /// Moderation flag, always false at creation.
    pub reported: bool,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Last-update timestamp, equals `created_at` at creation.
    pub updated_at: String,
}

impl QuestionDraft {
    /// Creates a draft stamped with the current time.
    pub fn new(
        question: String,
        options: OptionSpec,
        answers: Vec<AnswerDraft>,
        explanation: Option<String>,
    ) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            question,
            options,
            answers,
            explanation,
            attempts: 0,
            reported: false,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;
    use serde_json::json;

    #[test]
    fn serializes_wire_field_names() {
        let mut answer = AnswerDraft::new();
        answer.answer = "Paris".to_string();
        answer.is_correct = true;
        let answer_id = answer.answer_id.clone();

        let draft = QuestionDraft::new(
            "Capital of France?".to_string(),
            OptionSpec::media(MediaKind::Image, "map.png"),
            vec![answer],
            Some("It has been since 508.".to_string()),
        );
        let value = serde_json::to_value(&draft).expect("serialize draft");

        assert_eq!(value["question"], json!("Capital of France?"));
        assert_eq!(value["options"]["type"], json!("image"));
        assert_eq!(value["options"]["content"], json!("map.png"));
        assert_eq!(value["answers"][0]["answer_id"], json!(answer_id));
        assert_eq!(value["answers"][0]["answer"], json!("Paris"));
        assert_eq!(value["answers"][0]["is_correct"], json!(true));
        assert_eq!(value["explanation"], json!("It has been since 508."));
        assert_eq!(value["attempts"], json!(0));
        assert_eq!(value["reported"], json!(false));
        assert_eq!(value["created_at"], value["updated_at"]);
    }

    #[test]
    fn absent_options_serialize_empty() {
        let value = serde_json::to_value(OptionSpec::default()).expect("serialize options");
        assert_eq!(value, json!({}));
    }

    #[test]
    fn open_form_without_attachment() {
        let open = OptionSpec::default().into_open();
        assert_eq!(open.kind.as_deref(), Some("open"));
        assert_eq!(open.content, Some(OptionContent::Flag(true)));
        assert!(open.is_open());
    }

    #[test]
    fn open_form_keeps_attachment() {
        let open = OptionSpec::code("fn main() {}").into_open();
        assert_eq!(open.kind.as_deref(), Some("code-open"));
        assert_eq!(
            open.content,
            Some(OptionContent::Text("fn main() {}".to_string()))
        );
        assert!(open.is_open());
    }

    #[test]
    fn boolean_sentinel_serializes_as_true() {
        let value =
            serde_json::to_value(OptionSpec::default().into_open()).expect("serialize options");
        assert_eq!(value, json!({ "type": "open", "content": true }));
    }

    #[test]
    fn answer_ids_are_unique() {
        assert_ne!(AnswerDraft::new().answer_id, AnswerDraft::new().answer_id);
    }
}
