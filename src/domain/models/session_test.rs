use anyhow::Result;

use super::ChatSession;
use super::QaRecord;

#[test]
fn it_deserializes_wire_fields() -> Result<()> {
    let payload = r#"{
        "_id": "abc123",
        "pdf_title": "doc.pdf",
        "questions_answers": [
            {"question": "What is the total?", "answer": "42"}
        ]
    }"#;

    let session: ChatSession = serde_json::from_str(payload)?;
    assert_eq!(session.id, "abc123");
    assert_eq!(session.title, "doc.pdf");
    assert_eq!(session.question_count(), 1);
    assert_eq!(session.questions_answers[0].question, "What is the total?");
    assert_eq!(session.questions_answers[0].answer, "42");

    return Ok(());
}

#[test]
fn it_defaults_missing_history() -> Result<()> {
    let payload = r#"{"_id": "abc123", "pdf_title": "doc.pdf"}"#;

    let session: ChatSession = serde_json::from_str(payload)?;
    assert_eq!(session.question_count(), 0);

    return Ok(());
}

#[test]
fn it_renders_collapsed_records_without_answers() {
    let record = QaRecord {
        question: "What is the total?".to_string(),
        answer: "42".to_string(),
    };

    let lines = record.as_string_lines(false, 80);
    assert_eq!(lines, vec!["Q: What is the total?".to_string()]);
}

#[test]
fn it_renders_expanded_records_with_answers() {
    let record = QaRecord {
        question: "What is the total?".to_string(),
        answer: "42".to_string(),
    };

    let lines = record.as_string_lines(true, 80);
    assert_eq!(
        lines,
        vec!["Q: What is the total?".to_string(), "A: 42".to_string()]
    );
}

#[test]
fn it_wraps_long_lines() {
    let record = QaRecord {
        question: "one two three four five six seven eight".to_string(),
        answer: "".to_string(),
    };

    let lines = record.as_string_lines(false, 20);
    assert!(lines.len() > 1);
    for line in lines {
        assert!(line.len() <= 20);
    }
}
