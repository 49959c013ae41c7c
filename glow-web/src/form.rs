//! Request bodies for catalog writes.
//!
//! Catalog endpoints take the same fields as a JSON object, a urlencoded form
//! or a multipart form (the only way to attach an image file). [`FormPayload`]
//! folds the three into one JSON map plus the uploaded files, and the typed
//! readers coerce form text into numbers, booleans and lists.
use crate::AppState;
use actix_multipart::{Field, Multipart};
use actix_web::{
    dev::Payload,
    http::Method,
    web, FromRequest, HttpMessage, HttpRequest,
};
use futures::{future::LocalBoxFuture, StreamExt, TryStreamExt};
use glow_error::{validation::FieldErrors, web::WebError, WebResult};
use glow_models::{
    constants::{METHOD_OVERRIDE_FIELD, METHOD_OVERRIDE_HEADER},
    domain::prelude::parse_bool,
    settings::Storage,
};
use glow_storage::UploadedFile;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::{collections::HashMap, str::FromStr, sync::Arc};

/// Upper bound for a single non-file multipart field
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Upper bound for the number of parts in one multipart body
const MAX_MULTIPART_PARTS: usize = 128;

#[derive(Debug, Default)]
pub struct FormPayload {
    fields: Map<String, Value>,
    files: HashMap<String, UploadedFile>,
}

impl FromRequest for FormPayload {
    type Error = WebError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let content_type = req.content_type().to_ascii_lowercase();
        if content_type.starts_with("multipart/form-data") {
            let max_file_bytes = req
                .app_data::<web::Data<Arc<AppState>>>()
                .map_or_else(|| Storage::default().max_upload_bytes, |s| s.media.max_bytes());
            let multipart = Multipart::new(req.headers(), payload.take());
            return Box::pin(read_multipart(multipart, max_file_bytes));
        }
        if content_type.starts_with("application/x-www-form-urlencoded") {
            let form = web::Form::<Vec<(String, String)>>::from_request(req, payload);
            return Box::pin(async move {
                let form = form
                    .await
                    .map_err(|e| WebError::BadRequest(e.to_string()))?;
                let mut fields = Map::new();
                for (name, value) in form.into_inner() {
                    insert_text(&mut fields, &name, value);
                }
                Ok(FormPayload {
                    fields,
                    files: HashMap::new(),
                })
            });
        }

        let body = web::Bytes::from_request(req, payload);
        Box::pin(async move {
            let body = body.await.map_err(|e| WebError::BadRequest(e.to_string()))?;
            FormPayload::from_json_bytes(&body)
        })
    }
}

async fn read_multipart(mut multipart: Multipart, max_file_bytes: usize) -> WebResult<FormPayload> {
    let mut form = FormPayload::default();
    let mut parts = 0usize;
    while let Some(mut field) = multipart.try_next().await? {
        parts += 1;
        if parts > MAX_MULTIPART_PARTS {
            return Err(WebError::PayloadTooLarge(format!(
                "more than {MAX_MULTIPART_PARTS} multipart parts"
            )));
        }
        let Some(name) = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .map(str::to_string)
        else {
            continue;
        };
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|m| m.to_string());

        match file_name {
            Some(file_name) => {
                let Some(bytes) = read_limited(&mut field, max_file_bytes).await? else {
                    return Err(WebError::invalid(&name, too_large(&name, max_file_bytes)));
                };
                // Browsers send an empty part for an untouched file input
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.files.insert(
                    name,
                    UploadedFile {
                        file_name: Some(file_name),
                        content_type,
                        bytes,
                    },
                );
            }
            None => {
                let Some(bytes) = read_limited(&mut field, MAX_TEXT_FIELD_BYTES).await? else {
                    return Err(WebError::PayloadTooLarge(format!(
                        "field `{name}` exceeds {MAX_TEXT_FIELD_BYTES} bytes"
                    )));
                };
                let value = String::from_utf8_lossy(&bytes).into_owned();
                insert_text(&mut form.fields, &name, value);
            }
        }
    }
    Ok(form)
}

/// Buffers one part, `None` as soon as it grows past `limit`
async fn read_limited(field: &mut Field, limit: usize) -> WebResult<Option<Vec<u8>>> {
    let mut bytes = Vec::new();
    let mut total: usize = 0;
    while let Some(chunk) = field.next().await {
        let data = chunk?;
        total = total.saturating_add(data.len());
        if total > limit {
            return Ok(None);
        }
        bytes.extend_from_slice(&data);
    }
    Ok(Some(bytes))
}

fn too_large(key: &str, max_bytes: usize) -> String {
    format!(
        "The {} field must not be greater than {} kilobytes.",
        label(key),
        max_bytes / 1024
    )
}

/// `name[]` and `name[n]` collect into a list under `name`
fn insert_text(fields: &mut Map<String, Value>, name: &str, value: String) {
    let list_base = name
        .strip_suffix(']')
        .and_then(|rest| rest.split_once('['))
        .map(|(base, _)| base);
    match list_base {
        Some(base) => {
            let entry = fields
                .entry(base.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = entry {
                items.push(Value::String(value));
            } else {
                *entry = Value::Array(vec![Value::String(value)]);
            }
        }
        None => {
            fields.insert(name.to_string(), Value::String(value));
        }
    }
}

/// "category_id" -> "category id"
fn label(field: &str) -> String {
    field.replace('_', " ")
}

impl FormPayload {
    pub fn from_json_bytes(body: &[u8]) -> WebResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Ok(Self {
                fields,
                files: HashMap::new(),
            }),
            Ok(_) => Err(WebError::BadRequest(
                "request body must be a JSON object".to_string(),
            )),
            Err(e) => Err(WebError::BadRequest(format!("invalid JSON body: {e}"))),
        }
    }

    /// Requested method behind a POST: the override header first, then the
    /// `_method` field
    pub fn method_override(&self, req: &HttpRequest) -> Option<Method> {
        let raw = req
            .headers()
            .get(METHOD_OVERRIDE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| {
                self.fields
                    .get(METHOD_OVERRIDE_FIELD)
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })?;
        Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes()).ok()
    }

    #[inline]
    pub fn file(&self, key: &str) -> Option<&UploadedFile> {
        self.files.get(key)
    }

    /// `None` when absent, `Some(None)` when null or an empty string
    fn value(&self, key: &str) -> Option<Option<&Value>> {
        match self.fields.get(key)? {
            Value::Null => Some(None),
            Value::String(s) if s.is_empty() => Some(None),
            value => Some(Some(value)),
        }
    }

    pub fn text(&self, key: &str, errors: &mut FieldErrors) -> Option<Option<String>> {
        match self.value(key)? {
            None => Some(None),
            Some(Value::String(s)) => Some(Some(s.clone())),
            Some(_) => {
                errors.add(key, format!("The {} field must be a string.", label(key)));
                None
            }
        }
    }

    pub fn integer(&self, key: &str, errors: &mut FieldErrors) -> Option<Option<i32>> {
        let value = self.value(key)?;
        let parsed = match value {
            None => return Some(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            Some(_) => None,
        };
        match parsed.and_then(|n| i32::try_from(n).ok()) {
            Some(n) => Some(Some(n)),
            None => {
                errors.add(key, format!("The {} field must be an integer.", label(key)));
                None
            }
        }
    }

    pub fn decimal(&self, key: &str, errors: &mut FieldErrors) -> Option<Option<Decimal>> {
        let value = self.value(key)?;
        let parsed = match value {
            None => return Some(None),
            Some(Value::Number(n)) => parse_decimal(&n.to_string()),
            Some(Value::String(s)) => parse_decimal(s.trim()),
            Some(_) => None,
        };
        match parsed {
            Some(d) => Some(Some(d)),
            None => {
                errors.add(key, format!("The {} field must be a number.", label(key)));
                None
            }
        }
    }

    pub fn boolean(&self, key: &str, errors: &mut FieldErrors) -> Option<Option<bool>> {
        let value = self.value(key)?;
        let parsed = match value {
            None => return Some(None),
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            Some(Value::String(s)) => parse_bool(s),
            Some(_) => None,
        };
        match parsed {
            Some(b) => Some(Some(b)),
            None => {
                errors.add(
                    key,
                    format!("The {} field must be true or false.", label(key)),
                );
                None
            }
        }
    }

    /// Text naming one of a fixed set of values, such as a role
    pub fn choice<T: FromStr>(&self, key: &str, errors: &mut FieldErrors) -> Option<Option<T>> {
        match self.text(key, errors)? {
            None => Some(None),
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(value) => Some(Some(value)),
                Err(_) => {
                    errors.add(key, format!("The selected {} is invalid.", label(key)));
                    None
                }
            },
        }
    }

    /// List of strings; a form may also send it as a JSON-encoded array
    pub fn string_list(&self, key: &str, errors: &mut FieldErrors) -> Option<Option<Vec<String>>> {
        let value = self.value(key)?;
        let items = match value {
            None => return Some(None),
            Some(Value::Array(items)) => Some(items.clone()),
            Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Array(items)) => Some(items),
                _ => None,
            },
            Some(_) => None,
        };
        let Some(items) = items else {
            errors.add(key, format!("The {} field must be an array.", label(key)));
            return None;
        };

        let mut list = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Value::String(s) => list.push(s),
                Value::Number(n) => list.push(n.to_string()),
                Value::Bool(b) => list.push(b.to_string()),
                _ => {
                    errors.add(
                        format!("{key}.{index}"),
                        format!("The {key}.{index} field must be a string."),
                    );
                    return None;
                }
            }
        }
        Some(Some(list))
    }

    /// Uploaded image under `key`, checked for type and size
    pub fn image_file(
        &self,
        key: &str,
        max_bytes: usize,
        errors: &mut FieldErrors,
    ) -> Option<&UploadedFile> {
        let file = self.file(key)?;
        if !file.is_image() {
            errors.add(key, format!("The {} field must be an image.", label(key)));
            return None;
        }
        if file.len() > max_bytes {
            errors.add(key, too_large(key, max_bytes));
            return None;
        }
        Some(file)
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
