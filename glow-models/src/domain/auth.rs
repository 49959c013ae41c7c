use crate::{domain::user::UserInfo, enums::user::UserRole};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(required(message = "The email field is required."))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(required(message = "The password field is required."))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub jti: String,
    pub sub: String,
    pub iss: String,
    pub exp: i64,
    pub nbf: i64,
    pub iat: i64,
    pub user_id: i32,
    pub email: String,
    pub role: UserRole,
}

impl Claims {
    pub fn new(iss: String, user_id: i32, email: String, role: UserRole, expire: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            jti: Uuid::new_v4().to_string(),
            sub: user_id.to_string(),
            iss,
            exp: now + expire,
            nbf: now,
            iat: now,
            user_id,
            email,
            role,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
