#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

/// One question asked against a session, paired with its answer.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
}

impl QaRecord {
    /// Word-wraps the record for display. The question always renders; the
    /// answer renders only when the record is expanded.
    pub fn as_string_lines(&self, expanded: bool, line_max_width: usize) -> Vec<String> {
        let mut lines = wrap(&format!("Q: {}", self.question), line_max_width);
        if expanded {
            lines.extend(wrap(&format!("A: {}", self.answer), line_max_width));
        }

        return lines;
    }
}

/// A chat session scoped to one uploaded document, as returned by the
/// service. Field names mirror the wire format.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "pdf_title")]
    pub title: String,
    #[serde(default)]
    pub questions_answers: Vec<QaRecord>,
}

impl ChatSession {
    pub fn question_count(&self) -> usize {
        return self.questions_answers.len();
    }
}

fn wrap(text: &str, line_max_width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for full_line in text.split('\n') {
        if full_line.trim().is_empty() {
            lines.push(" ".to_string());
            continue;
        }

        let mut char_count = 0;
        let mut current_lines: Vec<&str> = vec![];

        for word in full_line.split(' ') {
            if word.len() + char_count + 1 > line_max_width {
                lines.push(current_lines.join(" ").trim_end().to_string());
                current_lines = vec![word];
                char_count = word.len() + 1;
            } else {
                current_lines.push(word);
                char_count += word.len() + 1;
            }
        }
        if !current_lines.is_empty() {
            lines.push(current_lines.join(" ").trim_end().to_string());
        }
    }

    return lines;
}
