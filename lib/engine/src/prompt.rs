use crate::generative::ModelError;
use fieldsense_core::{FieldSignals, FieldType};

/// Instruction given to every session: answer with one known label.
pub fn system_prompt() -> String {
    let labels: Vec<&str> = FieldType::ALL.iter().map(|t| t.as_str()).collect();
    format!(
        "You classify HTML form fields from the text around them. \
         Reply with exactly one label from this list and nothing else, \
         or `unknown` if none fits:\n{}",
        labels.join(", ")
    )
}

/// Per-field prompt listing its signal groups
pub fn field_prompt(signals: &FieldSignals) -> String {
    let group = |values: &[String]| {
        if values.is_empty() {
            "-".to_string()
        } else {
            values.join(" | ")
        }
    };
    format!(
        "Label: {}\nAttributes: {}\nContext: {}\nField type:",
        group(&signals.primary),
        group(&signals.secondary),
        group(&signals.structural)
    )
}

/// Longest label in words, e.g. `credit-card-number`
const MAX_LABEL_WORDS: usize = 3;

/// Read a field type out of a model answer.
///
/// The whole trimmed answer is tried first, then runs of words joined by
/// `-` (so "Zip Code" reads as `zip-code`), longest run first at each word.
pub fn parse_answer(answer: &str) -> Result<FieldType, ModelError> {
    let cleaned = answer
        .trim()
        .trim_matches(|c: char| matches!(c, '`' | '"' | '\'' | '.' | '*') || c.is_whitespace())
        .to_lowercase();

    if let Ok(field_type) = cleaned.parse() {
        return Ok(field_type);
    }

    let words: Vec<&str> = cleaned
        .split(|c: char| {
            c.is_whitespace() || matches!(c, ',' | ':' | ';' | '"' | '\'' | '`' | '.' | '*')
        })
        .filter(|word| !word.is_empty())
        .collect();

    (0..words.len())
        .find_map(|start| {
            let longest = MAX_LABEL_WORDS.min(words.len() - start);
            (1..=longest)
                .rev()
                .find_map(|len| words[start..start + len].join("-").parse().ok())
        })
        .ok_or_else(|| ModelError::InvalidAnswer(answer.trim().to_string()))
}
