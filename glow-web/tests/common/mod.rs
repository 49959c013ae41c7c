#![allow(dead_code)]

use glow_models::{
    domain::prelude::Claims,
    enums::user::UserRole,
    settings::{Db, Inner, Settings, Sqlite, Storage},
    DbManager,
};
use glow_storage::GlowDbManager;
use glow_utils::jwt::encode_jwt;
use glow_web::AppState;
use std::sync::Arc;
use tempfile::TempDir;

pub const ADMIN_EMAIL: &str = "admin@glow.com";
pub const ADMIN_PASSWORD: &str = "password";
pub const ADMIN_ID: i32 = 1;

pub const BOUNDARY: &str = "glow-test-boundary";

/// Seeded in-memory catalog with uploads going to a temporary directory
pub struct TestContext {
    pub state: Arc<AppState>,
    pub media_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_upload_limit(Storage::default().max_upload_bytes).await
    }

    pub async fn with_upload_limit(max_upload_bytes: usize) -> Self {
        let media_dir = tempfile::tempdir().unwrap();
        let settings = Settings::from(Inner {
            db: Db {
                sqlite: Sqlite {
                    path: ":memory:".into(),
                    ..Default::default()
                },
            },
            storage: Storage {
                public_root: media_dir.path().to_string_lossy().into_owned(),
                serve: false,
                max_upload_bytes,
                ..Default::default()
            },
            ..Default::default()
        });
        let db = GlowDbManager::init(&settings)
            .await
            .unwrap()
            .get_connection()
            .unwrap();
        TestContext {
            state: Arc::new(AppState::new(settings, db)),
            media_dir,
        }
    }

    /// `Authorization` header value for the given identity
    pub fn bearer(&self, user_id: i32, email: &str, role: UserRole) -> String {
        let jwt = &self.state.settings.web.jwt;
        let claims = Claims::new(jwt.issuer.clone(), user_id, email.into(), role, jwt.expire);
        let token = encode_jwt(&claims, jwt.secret.as_bytes(), None).unwrap();
        format!("Bearer {token}")
    }

    pub fn admin_bearer(&self) -> String {
        self.bearer(ADMIN_ID, ADMIN_EMAIL, UserRole::Admin)
    }
}

/// Builds the test service for a [`TestContext`]
macro_rules! init_app {
    ($ctx:expr) => {{
        let state = $ctx.state.clone();
        actix_web::test::init_service(
            actix_web::App::new().configure(move |cfg| glow_web::configure(cfg, state)),
        )
        .await
    }};
}

/// Multipart body with text parts and an optional `(field, file name, content type, bytes)` file
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
