//! Single-pass compilation of Markdown token trees into question drafts.
//!
//! The compiler folds block-level mdast nodes into an ordered list of
//! [`QuestionDraft`]s. Heading depth is modal: a depth-1 heading opens a
//! question, a depth-3 heading attaches an explanation, and a depth-2
//! heading nested in a list item marks the surrounding answer correct.
//! Content that breaks these conventions becomes a sentinel draft and stops
//! the scan; the validator rejects the sentinel downstream, so compilation
//! itself never fails for a well-formed tree.

use markdown::mdast::{Heading, Image, List, ListItem, Node, Paragraph};

use crate::draft::{AnswerDraft, HEADING_SENTINEL, OptionSpec, QuestionDraft};
use crate::error::QuizmarkError;
use crate::media;
use crate::parse::{self, ParseOptions};

/// Where a heading was encountered during the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadingContext {
    /// Top level of the document.
    Document,
    /// Nested inside a list item.
    AnswerItem,
}

/// What a heading means at its depth and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadingRole {
    /// Starts a new question.
    OpensQuestion,
    /// Sets the current explanation.
    SetsExplanation,
    /// Marks the surrounding answer correct.
    MarksCorrect,
    /// The document breaks the authoring conventions.
    Malformed,
}

/// The single dispatch table for heading depths.
fn heading_role(depth: u8, context: HeadingContext) -> HeadingRole {
    match (context, depth) {
        (HeadingContext::Document, 1) => HeadingRole::OpensQuestion,
        (HeadingContext::Document, 3) => HeadingRole::SetsExplanation,
        (HeadingContext::Document, _) => HeadingRole::Malformed,
        (HeadingContext::AnswerItem, 2) => HeadingRole::MarksCorrect,
        (HeadingContext::AnswerItem, _) => HeadingRole::Malformed,
    }
}

/// Accumulated scan state for one document.
///
/// Created fresh per [`compile`] call and discarded afterwards; never
/// shared across documents.
#[derive(Debug, Default)]
struct ScanState {
    question: Option<String>,
    answers: Vec<AnswerDraft>,
    options: OptionSpec,
    explanation: Option<String>,
    drafts: Vec<QuestionDraft>,
}

impl ScanState {
    /// Finalizes the in-progress question, if any, into the draft list.
    fn save(&mut self) {
        let Some(question) = self.question.take() else {
            return;
        };
        let answers = std::mem::take(&mut self.answers);
        let explanation = self.explanation.take();
        let options = std::mem::take(&mut self.options);
        // At most one accumulated answer means the question is open-ended.
        let options = if answers.len() <= 1 {
            options.into_open()
        } else {
            options
        };
        self.drafts
            .push(QuestionDraft::new(question, options, answers, explanation));
    }

    /// Saves the current question and starts accumulating a new one.
    fn open_question(&mut self, question: String) {
        self.save();
        self.answers = Vec::new();
        self.options = OptionSpec::default();
        self.explanation = None;
        self.question = Some(question);
    }

    /// Replaces the accumulated question with the malformed sentinel.
    ///
    /// The caller raises the halt by returning [`Scan::Halt`]; the sentinel
    /// itself is emitted when the scan finishes.
    fn enter_malformed(&mut self) {
        self.question = Some(HEADING_SENTINEL.to_string());
        self.answers.clear();
        self.options = OptionSpec::default();
        self.explanation = None;
    }

    /// Ends the scan, finalizing whatever question is still open.
    fn finish(mut self) -> Vec<QuestionDraft> {
        self.save();
        self.drafts
    }
}

/// Outcome of folding one block token into the state.
enum Scan {
    /// Keep folding with the carried state.
    Continue(ScanState),
    /// Stop the scan; remaining tokens are discarded.
    Halt(ScanState),
}

/// Outcome of scanning one list item.
enum ItemScan {
    /// The item parsed as an answer choice.
    Answer(AnswerDraft),
    /// The item carried a heading depth with no meaning inside an answer.
    Malformed,
}

/// Folds a sequence of block-level tokens into question drafts.
///
/// Never fails for a well-formed token tree: malformed content is emitted
/// as a sentinel draft with question text [`HEADING_SENTINEL`] and stops
/// the scan immediately. Drafts finalized before that point are kept;
/// everything after it is discarded, including tokens that would have
/// formed valid questions on their own.
pub fn compile(tokens: &[Node]) -> Vec<QuestionDraft> {
    let mut state = ScanState::default();
    for token in tokens {
        match step(state, token) {
            Scan::Continue(next) => state = next,
            Scan::Halt(next) => {
                state = next;
                break;
            }
        }
    }
    state.finish()
}

/// Compiles a whole document: parse to mdast, then fold the root children.
pub fn compile_source(input: &str) -> Result<Vec<QuestionDraft>, QuizmarkError> {
    let root = parse::parse_mdast(input, &ParseOptions::default())?;
    let tokens = match &root {
        Node::Root(root) => root.children.as_slice(),
        other => std::slice::from_ref(other),
    };
    Ok(compile(tokens))
}

fn step(mut state: ScanState, node: &Node) -> Scan {
    match node {
        Node::Heading(heading) => step_heading(state, heading),
        Node::List(list) => step_list(state, list),
        Node::Paragraph(paragraph) => step_paragraph(state, paragraph),
        Node::Code(code) => {
            state.options = OptionSpec::code(code.value.clone());
            Scan::Continue(state)
        }
        other => {
            log::debug!("ignoring unsupported block node: {:?}", other);
            Scan::Continue(state)
        }
    }
}

fn step_heading(mut state: ScanState, heading: &Heading) -> Scan {
    match heading_role(heading.depth, HeadingContext::Document) {
        HeadingRole::OpensQuestion => {
            state.open_question(inline_text(&heading.children));
            Scan::Continue(state)
        }
        HeadingRole::SetsExplanation => {
            state.explanation = Some(inline_text(&heading.children));
            Scan::Continue(state)
        }
        HeadingRole::MarksCorrect | HeadingRole::Malformed => {
            // A stray heading depth closes the current question before the
            // sentinel replaces the state.
            state.save();
            state.enter_malformed();
            Scan::Halt(state)
        }
    }
}

fn step_list(mut state: ScanState, list: &List) -> Scan {
    for item in &list.children {
        let Node::ListItem(item) = item else {
            continue;
        };
        match scan_answer(item) {
            ItemScan::Answer(answer) => state.answers.push(answer),
            ItemScan::Malformed => {
                state.enter_malformed();
                return Scan::Halt(state);
            }
        }
    }
    Scan::Continue(state)
}

/// Top-level paragraphs may only carry a media reference for the current
/// question; free-standing prose does not belong between questions.
fn step_paragraph(mut state: ScanState, paragraph: &Paragraph) -> Scan {
    for node in &paragraph.children {
        match node {
            Node::Image(image) => {
                let kind = media::classify(media_hint(image));
                state.options = OptionSpec::media(kind, image.url.clone());
                return Scan::Continue(state);
            }
            Node::Text(text) if !text.value.trim().is_empty() => {
                state.enter_malformed();
                return Scan::Halt(state);
            }
            _ => {}
        }
    }
    Scan::Continue(state)
}

/// Parses one list item independently as one answer choice.
fn scan_answer(item: &ListItem) -> ItemScan {
    debug_assert!(
        !item.children.is_empty(),
        "lexer contract: list items carry at least one child node"
    );

    let mut answer = AnswerDraft::new();
    let mut text: Option<String> = None;

    for node in &item.children {
        match node {
            Node::Heading(heading) => {
                match heading_role(heading.depth, HeadingContext::AnswerItem) {
                    HeadingRole::MarksCorrect => {
                        answer.is_correct = true;
                        scan_answer_inline(&heading.children, &mut answer, &mut text);
                    }
                    _ => return ItemScan::Malformed,
                }
            }
            Node::Paragraph(paragraph) => {
                scan_answer_inline(&paragraph.children, &mut answer, &mut text);
            }
            _ => {}
        }
    }

    answer.answer = text.unwrap_or_default();
    ItemScan::Answer(answer)
}

/// Inspects the inline run of an answer item.
///
/// The first text-carrying token becomes the answer text; a media reference
/// overwrites it with the media-kind label afterwards, since media answers
/// display the label as their visible text.
fn scan_answer_inline(nodes: &[Node], answer: &mut AnswerDraft, text: &mut Option<String>) {
    for node in nodes {
        match node {
            Node::Text(value) => {
                let trimmed = value.value.trim();
                if text.is_none() && !trimmed.is_empty() {
                    *text = Some(trimmed.to_string());
                }
            }
            Node::InlineCode(code) => {
                if text.is_none() {
                    *text = Some(code.value.clone());
                }
                answer.options = OptionSpec::codespan(code.value.clone());
            }
            Node::Image(image) => {
                let kind = media::classify(media_hint(image));
                answer.options = OptionSpec::media(kind, image.url.clone());
                *text = Some(kind.as_str().to_string());
            }
            Node::Strong(_) | Node::Emphasis(_) | Node::Link(_) | Node::Delete(_) => {
                if text.is_none() {
                    let nested = inline_text(std::slice::from_ref(node));
                    if !nested.is_empty() {
                        *text = Some(nested);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Hint handed to the media classifier: the alt text when the author wrote
/// one, otherwise the target URL.
fn media_hint(image: &Image) -> &str {
    if image.alt.is_empty() {
        &image.url
    } else {
        &image.alt
    }
}

/// Collects the plain text of inline nodes, including code span literals.
fn inline_text(nodes: &[Node]) -> String {
    let mut text = String::new();
    for node in nodes {
        push_inline_text(node, &mut text);
    }
    text.trim().to_string()
}

fn push_inline_text(node: &Node, buffer: &mut String) {
    match node {
        Node::Text(text) => buffer.push_str(&text.value),
        Node::InlineCode(code) => buffer.push_str(&code.value),
        Node::Strong(strong) => {
            for child in &strong.children {
                push_inline_text(child, buffer);
            }
        }
        Node::Emphasis(emphasis) => {
            for child in &emphasis.children {
                push_inline_text(child, buffer);
            }
        }
        Node::Link(link) => {
            for child in &link.children {
                push_inline_text(child, buffer);
            }
        }
        Node::Delete(delete) => {
            for child in &delete.children {
                push_inline_text(child, buffer);
            }
        }
        _ => {}
    }
}
