use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::domain::repository::RepositoryError;

#[derive(Debug)]
pub enum AppError {
    Repository(RepositoryError),
    Validation(String),
    Template(askama::Error),
    Session(String),
    NotFound,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Repository(e) => write!(f, "{e}"),
            AppError::Validation(msg) => write!(f, "Validation error: {msg}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(msg) => write!(f, "Session error: {msg}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound | AppError::Repository(RepositoryError::NotFound(_)) => {
                HttpResponse::NotFound().body("Not Found")
            }
            AppError::Validation(msg) => HttpResponse::BadRequest().body(msg.clone()),
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

/// Render an askama template into an HTML response.
pub fn render<T: askama::Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    let body = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}
