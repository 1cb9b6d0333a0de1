//! Data access for the books table.

use sqlx::SqlitePool;
use thiserror::Error;

use super::models::{Book, BookFields};

/// Failures surfaced by the repository. The HTTP layer owns the mapping to
/// status codes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("there is no book with isbn '{0}'")]
    NotFound(String),

    #[error("a book with isbn '{0}' already exists")]
    Duplicate(String),

    #[error(transparent)]
    Backend(#[from] sqlx::Error),
}

/// Repository over the shared pool. Each operation issues exactly one
/// statement, so a failed call leaves the store unchanged.
#[derive(Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All rows ordered by isbn. An empty store yields an empty vector.
    pub async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT isbn, amazon_url, author, language, pages, publisher, title, year
             FROM books
             ORDER BY isbn",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    pub async fn get_by_isbn(&self, isbn: &str) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>(
            "SELECT isbn, amazon_url, author, language, pages, publisher, title, year
             FROM books
             WHERE isbn = ?1",
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(isbn.to_string()))
    }

    /// Insert a new row. The primary key constraint arbitrates duplicates.
    pub async fn create(&self, book: &Book) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>(
            "INSERT INTO books (isbn, amazon_url, author, language, pages, publisher, title, year)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING isbn, amazon_url, author, language, pages, publisher, title, year",
        )
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Duplicate(book.isbn.clone())
            }
            _ => StoreError::Backend(error),
        })
    }

    /// Overwrite every field except the key.
    pub async fn update(&self, isbn: &str, fields: &BookFields) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>(
            "UPDATE books
             SET amazon_url = ?1, author = ?2, language = ?3, pages = ?4,
                 publisher = ?5, title = ?6, year = ?7
             WHERE isbn = ?8
             RETURNING isbn, amazon_url, author, language, pages, publisher, title, year",
        )
        .bind(&fields.amazon_url)
        .bind(&fields.author)
        .bind(&fields.language)
        .bind(fields.pages)
        .bind(&fields.publisher)
        .bind(&fields.title)
        .bind(fields.year)
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(isbn.to_string()))
    }

    pub async fn delete(&self, isbn: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?1")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(isbn.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Book {
        Book {
            isbn: "0691161518".to_string(),
            amazon_url: "http://a.co/eobPtX2".to_string(),
            author: "Matthew Lane".to_string(),
            language: "english".to_string(),
            pages: 264,
            publisher: "Princeton University Press".to_string(),
            title: "Power-Up: Unlocking the Hidden Mathematics in Video Games".to_string(),
            year: 2017,
        }
    }

    fn sample_fields() -> BookFields {
        BookFields {
            amazon_url: "http://a.co/eobPtX2".to_string(),
            author: "Matthew Lane".to_string(),
            language: "spanish".to_string(),
            pages: 300,
            publisher: "Princeton University Press".to_string(),
            title: "Power-Up, Second Edition".to_string(),
            year: 2019,
        }
    }

    async fn test_repository() -> BookRepository {
        let pool = stacks_db::connect_in_memory().await.unwrap();
        sqlx::query(super::super::CREATE_BOOKS_TABLE)
            .execute(&pool)
            .await
            .unwrap();
        BookRepository::new(pool)
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        let repository = test_repository().await;
        assert!(repository.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repository = test_repository().await;
        let book = sample_book();

        let created = repository.create(&book).await.unwrap();
        assert_eq!(created, book);

        let fetched = repository.get_by_isbn("0691161518").await.unwrap();
        assert_eq!(fetched, book);

        let all = repository.list_all().await.unwrap();
        assert_eq!(all, vec![book]);
    }

    #[tokio::test]
    async fn create_duplicate_isbn_is_rejected() {
        let repository = test_repository().await;
        repository.create(&sample_book()).await.unwrap();

        let error = repository.create(&sample_book()).await.unwrap_err();
        assert!(matches!(error, StoreError::Duplicate(isbn) if isbn == "0691161518"));
    }

    #[tokio::test]
    async fn get_missing_isbn_is_not_found() {
        let repository = test_repository().await;

        let error = repository.get_by_isbn("88888888").await.unwrap_err();
        assert!(matches!(error, StoreError::NotFound(isbn) if isbn == "88888888"));
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_keeps_key() {
        let repository = test_repository().await;
        repository.create(&sample_book()).await.unwrap();

        let updated = repository
            .update("0691161518", &sample_fields())
            .await
            .unwrap();
        assert_eq!(updated.isbn, "0691161518");
        assert_eq!(updated.language, "spanish");
        assert_eq!(updated.pages, 300);
        assert_eq!(updated.year, 2019);

        let fetched = repository.get_by_isbn("0691161518").await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn update_missing_isbn_is_not_found() {
        let repository = test_repository().await;

        let error = repository
            .update("88888888", &sample_fields())
            .await
            .unwrap_err();
        assert!(matches!(error, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_row_once() {
        let repository = test_repository().await;
        repository.create(&sample_book()).await.unwrap();

        repository.delete("0691161518").await.unwrap();
        assert!(repository.list_all().await.unwrap().is_empty());

        let error = repository.delete("0691161518").await.unwrap_err();
        assert!(matches!(error, StoreError::NotFound(_)));
    }
}
