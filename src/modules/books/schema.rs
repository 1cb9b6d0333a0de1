//! Payload validation for the books module.
//!
//! Handlers accept raw JSON and run it through the field table below before
//! anything touches the store. Every failure in a payload is collected, so a
//! client sees all of its mistakes in one response.

use serde_json::{Map, Value};

use super::models::{Book, BookFields};

/// Primitive type a payload field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    String,
    Integer,
}

impl FieldType {
    fn name(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64(),
        }
    }
}

/// The full field contract for a book payload. Every field is required and
/// anything outside this table is rejected.
const BOOK_FIELDS: &[(&str, FieldType)] = &[
    ("isbn", FieldType::String),
    ("amazon_url", FieldType::String),
    ("author", FieldType::String),
    ("language", FieldType::String),
    ("pages", FieldType::Integer),
    ("publisher", FieldType::String),
    ("title", FieldType::String),
    ("year", FieldType::Integer),
];

/// Validate a create payload into a full `Book`.
pub fn validate_create(payload: &Value) -> Result<Book, Vec<String>> {
    let object = require_object(payload)?;

    let errors = field_errors(object, true);
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Book::from_fields(
        string_field(object, "isbn"),
        extract_fields(object),
    ))
}

/// Validate an update payload into the replaceable fields of a book.
///
/// The route parameter owns the key, so an `isbn` entry in the body is
/// tolerated and dropped rather than rejected.
pub fn validate_update(payload: &Value) -> Result<BookFields, Vec<String>> {
    let object = require_object(payload)?;

    let errors = field_errors(object, false);
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(extract_fields(object))
}

fn require_object(payload: &Value) -> Result<&Map<String, Value>, Vec<String>> {
    payload
        .as_object()
        .ok_or_else(|| vec!["payload must be a JSON object".to_string()])
}

/// Walk the field table and collect every violation in the payload.
fn field_errors(object: &Map<String, Value>, require_isbn: bool) -> Vec<String> {
    let mut errors: Vec<String> = object
        .keys()
        .filter(|key| !BOOK_FIELDS.iter().any(|&(name, _)| name == key.as_str()))
        .map(|key| format!("{key} is not a known field"))
        .collect();

    for &(name, field_type) in BOOK_FIELDS {
        if name == "isbn" && !require_isbn {
            continue;
        }

        match object.get(name) {
            None => errors.push(format!("{name} is required")),
            Some(value) if !field_type.matches(value) => {
                errors.push(format!("{name} must be of type {}", field_type.name()));
            }
            Some(_) => {}
        }
    }

    if let Some(pages) = object.get("pages").and_then(Value::as_i64) {
        if pages <= 0 {
            errors.push("pages must be a positive integer".to_string());
        }
    }

    errors
}

/// Pull the replaceable fields out of a payload that already passed
/// `field_errors`, so every access is known to succeed.
fn extract_fields(object: &Map<String, Value>) -> BookFields {
    BookFields {
        amazon_url: string_field(object, "amazon_url"),
        author: string_field(object, "author"),
        language: string_field(object, "language"),
        pages: integer_field(object, "pages"),
        publisher: string_field(object, "publisher"),
        title: string_field(object, "title"),
        year: integer_field(object, "year"),
    }
}

fn string_field(object: &Map<String, Value>, name: &str) -> String {
    object
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn integer_field(object: &Map<String, Value>, name: &str) -> i64 {
    object.get(name).and_then(Value::as_i64).unwrap_or_default()
}
