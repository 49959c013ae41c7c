use actix_web::{
    body::BoxBody,
    http::{header::ContentType, StatusCode},
    HttpRequest, HttpResponse, Responder,
};
use serde::Serialize;

/// JSON response returned by REST handlers. The payload is serialized as-is,
/// without an envelope.
#[derive(Debug)]
pub struct WebResponse<T> {
    /// HTTP status of the response
    pub status: StatusCode,
    /// Payload; `None` produces an empty body
    pub data: Option<T>,
}

impl<T> WebResponse<T> {
    /// 200 with data
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data: Some(data),
        }
    }

    /// 201 with the created resource
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data: Some(data),
        }
    }
}

impl WebResponse<()> {
    /// 204 with no body
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            data: None,
        }
    }
}

impl<T> Responder for WebResponse<T>
where
    T: Serialize,
{
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        let Some(data) = self.data else {
            return HttpResponse::new(self.status);
        };
        match serde_json::to_string(&data) {
            Ok(body) => HttpResponse::build(self.status)
                .content_type(ContentType::json())
                .body(body),
            Err(e) => HttpResponse::InternalServerError()
                .content_type(ContentType::json())
                .body(serde_json::json!({ "message": e.to_string() }).to_string()),
        }
    }
}
