//! HTTP handlers for the books module.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use stacks_http::error::AppError;

use super::models::{BookEnvelope, BookList, DeleteAck};
use super::repository::{BookRepository, StoreError};
use super::schema;

/// Build the books router. Handlers share the repository through state.
pub fn router(repository: BookRepository) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{isbn}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(repository)
}

async fn list_books(
    State(repository): State<BookRepository>,
) -> Result<Json<BookList>, AppError> {
    let books = repository.list_all().await?;
    Ok(Json(BookList { books }))
}

async fn get_book(
    State(repository): State<BookRepository>,
    Path(isbn): Path<String>,
) -> Result<Json<BookEnvelope>, AppError> {
    let book = repository.get_by_isbn(&isbn).await?;
    Ok(Json(BookEnvelope { book }))
}

async fn create_book(
    State(repository): State<BookRepository>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<BookEnvelope>), AppError> {
    let Json(payload) = payload.map_err(unreadable_body)?;
    let book = schema::validate_create(&payload).map_err(AppError::validation)?;
    let book = repository.create(&book).await?;
    Ok((StatusCode::CREATED, Json(BookEnvelope { book })))
}

async fn update_book(
    State(repository): State<BookRepository>,
    Path(isbn): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BookEnvelope>, AppError> {
    let Json(payload) = payload.map_err(unreadable_body)?;
    let fields = schema::validate_update(&payload).map_err(AppError::validation)?;
    let book = repository.update(&isbn, &fields).await?;
    Ok(Json(BookEnvelope { book }))
}

async fn delete_book(
    State(repository): State<BookRepository>,
    Path(isbn): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    repository.delete(&isbn).await?;
    Ok(Json(DeleteAck {
        message: "Book deleted".to_string(),
    }))
}

/// Bodies that never parsed as JSON get the standard validation envelope.
fn unreadable_body(rejection: JsonRejection) -> AppError {
    AppError::validation(vec![format!("request body must be valid JSON: {rejection}")])
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(_) => AppError::not_found(error.to_string()),
            StoreError::Duplicate(_) => AppError::conflict(error.to_string()),
            StoreError::Backend(backend) => AppError::Internal(backend.into()),
        }
    }
}
