use crate::api::ApiResponse;
use axum::{http::StatusCode, response::Json};
use tracing::{error, info, warn};

/// Error classes shared by every API surface. Handlers convert these into
/// the standard response envelope instead of hand-building status codes.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] anyhow::Error),

    #[error("Resource already exists: {0}")]
    DuplicateResource(String),
}

/// Error context for structured logging
#[derive(Debug)]
pub struct ErrorContext {
    pub operation: String,
    pub resource_id: Option<String>,
    pub resource_type: String,
    pub user_friendly_message: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: &str, resource_type: &str) -> Self {
        Self {
            operation: operation.to_string(),
            resource_id: None,
            resource_type: resource_type.to_string(),
            user_friendly_message: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.resource_id = Some(id.to_string());
        self
    }

    pub fn with_user_message(mut self, message: &str) -> Self {
        self.user_friendly_message = Some(message.to_string());
        self
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateResource(_) => StatusCode::CONFLICT,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to API consumers. Internal failure detail stays
    /// in the logs.
    fn public_message(&self, context: &ErrorContext) -> String {
        match self {
            ApiError::NotFound(_) => context
                .user_friendly_message
                .clone()
                .unwrap_or_else(|| format!("{} not found", context.resource_type)),
            ApiError::ValidationError(_) | ApiError::DuplicateResource(_) => self.to_string(),
            ApiError::DatabaseError(_) => {
                "Database operation failed. Please try again.".to_string()
            }
        }
    }

    fn log(&self, context: &ErrorContext) {
        match self {
            ApiError::NotFound(_) => info!(
                operation = %context.operation,
                resource_type = %context.resource_type,
                resource_id = ?context.resource_id,
                error = %self,
                "Resource not found"
            ),
            ApiError::ValidationError(_) | ApiError::DuplicateResource(_) => warn!(
                operation = %context.operation,
                resource_type = %context.resource_type,
                resource_id = ?context.resource_id,
                error = %self,
                "Request rejected"
            ),
            ApiError::DatabaseError(_) => error!(
                operation = %context.operation,
                resource_type = %context.resource_type,
                resource_id = ?context.resource_id,
                error = %self,
                "Database error"
            ),
        }
    }

    /// Convert API error to HTTP response with consistent structure and logging
    pub fn to_response_with_context(
        self,
        context: ErrorContext,
    ) -> (StatusCode, Json<ApiResponse<()>>) {
        self.log(&context);
        let message = self.public_message(&context);
        (self.status_code(), Json(ApiResponse::error(message)))
    }

    /// Simple conversion without context (for tests and internal fallbacks)
    #[allow(dead_code)]
    pub fn to_response(self) -> (StatusCode, Json<ApiResponse<()>>) {
        self.to_response_with_context(ErrorContext::new("unknown", "resource"))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(anyhow::Error::from(err))
    }
}

/// First single-quoted token in a failure message, typically the lesson code
/// or column name a constraint fired on.
fn quoted_identifier(message: &str) -> Option<&str> {
    let start = message.find('\'')? + 1;
    let len = message[start..].find('\'')?;
    Some(&message[start..start + len])
}

/// Sorts service and sqlx failures into API error classes by message shape.
/// The services phrase their errors to match these patterns, so the handlers
/// only deal in status codes.
pub fn classify_database_error(error: &anyhow::Error) -> ApiError {
    let message = error.to_string().to_lowercase();

    if message.contains("already exists") || message.contains("unique constraint") {
        let detail = match quoted_identifier(&message) {
            Some(identifier) => format!("Resource '{}' already exists", identifier),
            None => "Resource already exists".to_string(),
        };
        ApiError::DuplicateResource(detail)
    } else if message.contains("not found") || message.contains("no rows") {
        ApiError::NotFound("Resource not found".to_string())
    } else if message.contains("required")
        || message.contains("cannot be null")
        || message.contains("cannot be empty")
        || message.contains("must be")
    {
        // Keep the original wording so the caller sees what to fix
        ApiError::ValidationError(error.to_string())
    } else {
        ApiError::DatabaseError(anyhow::anyhow!("{}", error))
    }
}
