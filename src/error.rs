//! Error handler for cohort.

use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sqlx::Error as SQLxError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Entity named by conflict and not-found errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Group,
    User,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Group => write!(f, "group"),
            Entity::User => write!(f, "user"),
        }
    }
}

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Axum(#[from] JsonRejection),

    #[error("SQL request failed: {0}")]
    Sql(#[from] SQLxError),

    #[error("group name must be 'regular' or 'admin', got '{name}'")]
    UnknownGroupName { name: String },

    #[error("group '{group}' is not associated with user {user_id}")]
    NotAMember { user_id: Uuid, group: String },

    #[error("{kind} with name '{name}' already exists")]
    Conflict { kind: Entity, name: String },

    #[error("{kind} {id} does not exist")]
    NotFound { kind: Entity, id: Uuid },
}

/// Turn a unique-constraint violation into the authoritative conflict
/// signal. Any other SQL failure passes through unchanged.
pub fn conflict_on_unique(err: SQLxError, kind: Entity, name: &str) -> ServerError {
    if err
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
    {
        ServerError::Conflict {
            kind,
            name: name.to_owned(),
        }
    } else {
        ServerError::Sql(err)
    }
}

/// Turn a foreign-key violation into a missing-entity error. Closes the
/// window where a referenced row disappears between check and insert.
pub fn not_found_on_fk(err: SQLxError, kind: Entity, id: Uuid) -> ServerError {
    if err
        .as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
    {
        ServerError::NotFound { kind, id }
    } else {
        ServerError::Sql(err)
    }
}

/// Structure for detailed error responses.
#[derive(Debug, Serialize)]
pub struct ResponseError {
    title: String,
    status: u16,
    detail: String,
    errors: Option<Vec<FieldError>>,
}

impl ResponseError {
    /// Update error status code.
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code.as_u16();
        self
    }

    /// Update `title` field.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.into();
        self
    }

    /// Add detailed error.
    pub fn details(mut self, description: &str) -> Self {
        self.detail = description.into();
        self
    }

    /// Automatically add errors field.
    pub fn errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = Some(parse_validation_errors(errors));
        self
    }

    /// Transform [`ResponseError`] into axum [`Response`].
    pub fn into_response(self) -> std::result::Result<Response, axum::http::Error> {
        if let Ok(body) = serde_json::to_string(&self) {
            Response::builder()
                .status(self.status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
        } else {
            Ok(internal_server_error())
        }
    }
}

impl Default for ResponseError {
    fn default() -> Self {
        Self {
            title: "Internal server error.".to_owned(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail: String::default(),
            errors: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

fn parse_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues.iter().map(move |issue| FieldError {
                field: field.to_string(),
                message: issue.to_string(),
            })
        })
        .collect()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let response = ResponseError::default()
            .details(&self.to_string())
            .status(StatusCode::BAD_REQUEST);

        let response = match &self {
            ServerError::Validation(validation_errors) => response
                .title("There were validation errors with your request.")
                .errors(validation_errors),

            ServerError::Axum(_) => response.title("Malformed request body."),

            ServerError::UnknownGroupName { .. } | ServerError::NotAMember { .. } => {
                response.title("There were validation errors with your request.")
            },

            ServerError::Conflict { .. } => response
                .title("Resource already exists.")
                .status(StatusCode::CONFLICT),

            ServerError::NotFound { .. } => response
                .title("Resource does not exist.")
                .status(StatusCode::NOT_FOUND),

            ServerError::Sql(err) => {
                tracing::error!(error = %err, "server returned 500 status");
                ResponseError::default()
            },
        };

        response
            .into_response()
            .unwrap_or_else(|_| internal_server_error())
    }
}

fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(
            serde_json::json!({
                "title": "Internal server error.",
                "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                "detail": null,
                "errors": null,
            })
            .to_string()
            .into(),
        )
        .unwrap_or_else(|_| Response::new("Internal server error".into()))
}
