use serde::{Deserialize, Serialize};

/// A catalogued book. The isbn is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Primary key, stored as opaque text
    pub isbn: String,
    /// Amazon product page for the book
    pub amazon_url: String,
    /// Author of the book
    pub author: String,
    /// Language the book is written in
    pub language: String,
    /// Page count, always positive
    pub pages: i64,
    /// Publisher of the book
    pub publisher: String,
    /// Title of the book
    pub title: String,
    /// Year of publication
    pub year: i64,
}

impl Book {
    /// Attach a key to a set of replaceable fields.
    pub fn from_fields(isbn: String, fields: BookFields) -> Self {
        Self {
            isbn,
            amazon_url: fields.amazon_url,
            author: fields.author,
            language: fields.language,
            pages: fields.pages,
            publisher: fields.publisher,
            title: fields.title,
            year: fields.year,
        }
    }
}

/// The replaceable fields of a book: everything except the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    pub pages: i64,
    pub publisher: String,
    pub title: String,
    pub year: i64,
}

/// Response body for the collection endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookList {
    pub books: Vec<Book>,
}

/// Response body for single-book endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookEnvelope {
    pub book: Book,
}

/// Acknowledgment body for deletions.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteAck {
    pub message: String,
}
