use std::fmt;

use counting_core::{ExtractSpec, FailureCause, Reduce, ValueSource};
use scraper::{Html, Selector};

use crate::TaskError;

/// Raw value pulled out of a page, before it is read as a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedValue {
    Text(String),
    Number(i64),
}

impl fmt::Display for ExtractedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractedValue::Text(text) => write!(f, "string \"{text}\""),
            ExtractedValue::Number(number) => write!(f, "number {number}"),
        }
    }
}

/// Evaluates an extraction recipe against a decoded document.
pub fn extract_value(html: &str, spec: &ExtractSpec) -> Result<ExtractedValue, TaskError> {
    let selector = Selector::parse(&spec.selector).map_err(|err| {
        evaluation_error(format!("invalid selector `{}`: {err}", spec.selector))
    })?;

    let doc = Html::parse_document(html);
    let element = doc.select(&selector).nth(spec.index).ok_or_else(|| {
        evaluation_error(format!(
            "no element matched `{}` at index {}",
            spec.selector, spec.index
        ))
    })?;

    let raw = match &spec.source {
        ValueSource::Text => normalize_whitespace(&element.text().collect::<String>()),
        ValueSource::Attribute(name) => match element.value().attr(name) {
            Some(value) => value.to_string(),
            None => {
                return Err(TaskError::new(
                    FailureCause::TypeMismatch,
                    format!(
                        "Received nothing instead of a number: `{}` has no attribute `{name}`.",
                        spec.selector
                    ),
                ));
            }
        },
    };

    match spec.reduce {
        Reduce::Whole => Ok(ExtractedValue::Text(raw.trim().to_string())),
        Reduce::CharAt(position) => raw
            .chars()
            .nth(position)
            .map(|ch| ExtractedValue::Text(ch.to_string()))
            .ok_or_else(|| {
                evaluation_error(format!(
                    "position {position} is out of range for \"{raw}\""
                ))
            }),
        Reduce::Length => Ok(ExtractedValue::Number(raw.trim().chars().count() as i64)),
        Reduce::WordCount => Ok(ExtractedValue::Number(raw.split_whitespace().count() as i64)),
    }
}

/// Reads an extracted value as an integer.
pub fn resolve_number(value: ExtractedValue) -> Result<i64, TaskError> {
    match value {
        ExtractedValue::Number(number) => Ok(number),
        ExtractedValue::Text(text) if text.is_empty() => Err(TaskError::new(
            FailureCause::Empty,
            "response was empty string.",
        )),
        ExtractedValue::Text(text) => parse_leading_int(&text).ok_or_else(|| {
            TaskError::new(
                FailureCause::Unparseable,
                format!("Received \"{text}\" resulting in NaN. Expected number in string."),
            )
        }),
    }
}

/// Parses an optional sign and the digits that follow leading whitespace,
/// ignoring anything after them ("12px" reads as 12).
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok().map(|value| sign * value)
}

fn evaluation_error(message: String) -> TaskError {
    TaskError::new(
        FailureCause::Extraction,
        format!("Failed to evaluate query function, error was: {message}"),
    )
}

/// Collapses whitespace runs the way rendered text would read.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
