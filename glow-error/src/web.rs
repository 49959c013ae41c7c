use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::{storage::StorageError, validation::FieldErrors, GlowError};

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Unauthenticated.")]
    Unauthorized,
    #[error("BadRequest: {0}")]
    BadRequest(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("{}", .0.summary())]
    Validation(FieldErrors),
    #[error("InternalError: {0}")]
    InternalError(String),
    #[error("DBError: {0}")]
    StorageError(#[from] StorageError),
    #[error("MultipartError: {0}")]
    MultipartError(String),
}

impl WebError {
    /// 422 error for a single field
    #[inline]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        WebError::Validation(FieldErrors::single(field, message))
    }
}

impl From<FieldErrors> for WebError {
    fn from(errors: FieldErrors) -> Self {
        WebError::Validation(errors)
    }
}

impl From<validator::ValidationErrors> for WebError {
    fn from(errors: validator::ValidationErrors) -> Self {
        WebError::Validation(errors.into())
    }
}

impl From<sea_orm::DbErr> for WebError {
    fn from(e: sea_orm::DbErr) -> Self {
        WebError::StorageError(StorageError::DBError(e))
    }
}

impl From<std::io::Error> for WebError {
    fn from(e: std::io::Error) -> Self {
        WebError::InternalError(e.to_string())
    }
}

impl From<GlowError> for WebError {
    fn from(e: GlowError) -> Self {
        match e {
            GlowError::StorageError(StorageError::EntityNotFound(msg)) => WebError::NotFound(msg),
            GlowError::WebError(e) => e,
            other => WebError::InternalError(other.to_string()),
        }
    }
}

impl From<actix_multipart::MultipartError> for WebError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        WebError::MultipartError(e.to_string())
    }
}

impl ResponseError for WebError {
    fn error_response(&self) -> HttpResponse {
        let mut body = json!({
            "message": self.to_string()
        });
        match self {
            WebError::Unauthorized => {
                body["error"] = json!("Unauthorized");
                HttpResponse::Unauthorized().json(body)
            }
            WebError::BadRequest(_) => {
                body["error"] = json!("Bad Request");
                HttpResponse::BadRequest().json(body)
            }
            WebError::NotFound(_) => {
                body["error"] = json!("Not Found");
                HttpResponse::NotFound().json(body)
            }
            WebError::Forbidden(_) => {
                body["error"] = json!("Forbidden");
                HttpResponse::Forbidden().json(body)
            }
            WebError::MethodNotAllowed(_) => {
                body["error"] = json!("Method Not Allowed");
                HttpResponse::MethodNotAllowed().json(body)
            }
            WebError::PayloadTooLarge(_) => {
                body["error"] = json!("Payload Too Large");
                HttpResponse::PayloadTooLarge().json(body)
            }
            WebError::Validation(errors) => {
                body["error"] = json!("Unprocessable Entity");
                body["errors"] = json!(errors);
                HttpResponse::UnprocessableEntity().json(body)
            }
            WebError::InternalError(_) => {
                body["error"] = json!("Internal Server Error");
                HttpResponse::InternalServerError().json(body)
            }
            WebError::StorageError(StorageError::EntityNotFound(_)) => {
                body["error"] = json!("Not Found");
                HttpResponse::NotFound().json(body)
            }
            WebError::StorageError(_) => {
                body["error"] = json!("Storage Error");
                HttpResponse::InternalServerError().json(body)
            }
            WebError::MultipartError(msg) => {
                body["error"] = json!("Multipart Error");
                body["message"] = json!(msg);
                HttpResponse::BadRequest().json(body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode};

    #[actix_web::test]
    async fn test_validation_error_response() {
        let mut errors = FieldErrors::new();
        errors.add("name", "The name field is required.");
        errors.add("price", "The price field must be at least 0.");
        let resp = WebError::Validation(errors).error_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["message"],
            "The name field is required. (and 1 more error)"
        );
        assert_eq!(body["errors"]["price"][0], "The price field must be at least 0.");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WebError::Unauthorized.error_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebError::NotFound("Product".into()).error_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WebError::StorageError(StorageError::EntityNotFound("Category".into()))
                .error_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WebError::StorageError(StorageError::StorageUnavailable)
                .error_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_from_glow_error() {
        let e = WebError::from(GlowError::StorageError(StorageError::EntityNotFound(
            "Category".into(),
        )));
        assert_eq!(e.to_string(), "Category not found");
    }
}
