use quizmark_core::{HEADING_SENTINEL, ValidationError, compile_source, validate};

const QUIZ: &str = "\
# What is the capital of France?

- London
- ## Paris
- Berlin

### Paris has been the capital since 508.

# What does this evaluate to?

```rust
1 + 1
```

- ## 22
- 11

# What sound is this?

![audio](mystery.mp3)

- ## A trumpet
- A violin

# Describe the water cycle

- Evaporation, condensation, precipitation
";

#[test]
fn compiles_and_validates_a_full_document() {
    let drafts = compile_source(QUIZ).expect("quiz markdown should parse");

    assert_eq!(drafts.len(), 4);
    assert_eq!(drafts[0].question, "What is the capital of France?");
    assert_eq!(
        drafts[0].explanation.as_deref(),
        Some("Paris has been the capital since 508.")
    );
    assert_eq!(drafts[1].options.kind.as_deref(), Some("code"));
    assert_eq!(drafts[2].options.kind.as_deref(), Some("audio"));
    assert_eq!(drafts[3].options.kind.as_deref(), Some("open"));

    for draft in &drafts {
        let record = serde_json::to_value(draft).expect("draft serializes");
        assert_eq!(validate(&record), Ok(()), "draft: {}", draft.question);
    }
}

#[test]
fn malformed_document_compiles_but_fails_validation() {
    let drafts = compile_source(
        "# A fine question\n\n\
         - ## Yes\n\
         - No\n\n\
         ## a stray heading\n\n\
         # Never reached\n\n\
         - ## A\n\
         - B\n",
    )
    .expect("quiz markdown should parse");

    // The first question survives, the sentinel closes the output, and the
    // rest of the document is discarded.
    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[1].question, HEADING_SENTINEL);

    let good = serde_json::to_value(&drafts[0]).expect("draft serializes");
    assert_eq!(validate(&good), Ok(()));

    let sentinel = serde_json::to_value(&drafts[1]).expect("draft serializes");
    assert_eq!(validate(&sentinel), Err(ValidationError::QuestionHeading));
}

#[test]
fn accepted_drafts_stay_accepted() {
    let drafts = compile_source(QUIZ).expect("quiz markdown should parse");
    let record = serde_json::to_value(&drafts[0]).expect("draft serializes");

    assert_eq!(validate(&record), Ok(()));
    assert_eq!(validate(&record), Ok(()));
}
