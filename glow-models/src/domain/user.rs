use crate::{
    entities::prelude::{User, UserActiveModel, UserColumn, UserModel},
    enums::user::UserRole,
    initializer::{InitContext, SeedOutcome, SeedableTrait},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use glow_utils::hash::{self, BcryptResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbErr, DerivePartialModel, EntityTrait,
    FromQueryResult, IntoActiveModel, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, DerivePartialModel, FromQueryResult)]
#[sea_orm(entity = "User")]
pub struct UserInfo {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<UserModel> for UserInfo {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct RegisterUser {
    #[serde(default)]
    #[validate(
        required(message = "The name field is required."),
        length(
            min = 1,
            max = 255,
            message = "The name field must not be greater than 255 characters."
        )
    )]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address.")
    )]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(
        required(message = "The password field is required."),
        length(min = 8, message = "The password field must be at least 8 characters.")
    )]
    pub password: Option<String>,
}

impl RegisterUser {
    /// New `user`-role account with the password hashed
    pub fn into_active_model(self) -> BcryptResult<UserActiveModel> {
        Ok(UserActiveModel {
            name: Set(self.name.unwrap_or_default()),
            email: Set(self.email.unwrap_or_default().to_lowercase()),
            password: Set(hash::bcrypt_hash(&self.password.unwrap_or_default())?),
            role: Set(UserRole::User),
            ..Default::default()
        })
    }
}

/// Administrative update of another account
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(
        min = 1,
        max = 255,
        message = "The name field must not be greater than 255 characters."
    ))]
    pub name: Option<String>,
    #[validate(email(message = "The email field must be a valid email address."))]
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

impl UpdateUser {
    pub fn apply(self, model: &mut UserActiveModel) {
        if let Some(name) = self.name {
            model.name = Set(name);
        }
        if let Some(email) = self.email {
            model.email = Set(email.to_lowercase());
        }
        if let Some(role) = self.role {
            model.role = Set(role);
        }
    }
}

/// Self-service profile update
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(length(
        min = 1,
        max = 255,
        message = "The name field must not be greater than 255 characters."
    ))]
    pub name: Option<String>,
    #[validate(email(message = "The email field must be a valid email address."))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "The password field must be at least 8 characters."))]
    pub password: Option<String>,
}

impl UpdateProfile {
    pub fn apply(self, model: &mut UserActiveModel) -> BcryptResult<()> {
        if let Some(name) = self.name {
            model.name = Set(name);
        }
        if let Some(email) = self.email {
            model.email = Set(email.to_lowercase());
        }
        if let Some(password) = self.password {
            model.password = Set(hash::bcrypt_hash(&password)?);
        }
        Ok(())
    }
}

/// Seed account, upserted by email. The password is stored hashed.
#[derive(Clone, Debug)]
pub struct SeedUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[async_trait]
impl SeedableTrait for SeedUser {
    type Saved = UserModel;

    fn natural_key(&self) -> &str {
        &self.email
    }

    async fn upsert(
        &self,
        transaction: &DatabaseTransaction,
        _ctx: &InitContext,
    ) -> Result<(SeedOutcome, UserModel), DbErr> {
        let existing = User::find()
            .filter(UserColumn::Email.eq(self.email.as_str()))
            .one(transaction)
            .await?;

        let (mut model, outcome) = match existing {
            Some(existing) => (existing.into_active_model(), SeedOutcome::Updated),
            None => (
                UserActiveModel {
                    email: Set(self.email.clone()),
                    ..Default::default()
                },
                SeedOutcome::Inserted,
            ),
        };
        model.name = Set(self.name.clone());
        model.password =
            Set(hash::bcrypt_hash(&self.password).map_err(|e| DbErr::Custom(e.to_string()))?);
        model.role = Set(self.role);
        let saved = match outcome {
            SeedOutcome::Inserted => model.insert(transaction).await?,
            SeedOutcome::Updated => model.update(transaction).await?,
        };
        Ok((outcome, saved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn test_register_validation() {
        let request: RegisterUser =
            serde_json::from_str(r#"{"name":"Léa","email":"not-an-email","password":"short"}"#)
                .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("name"));

        let request: RegisterUser = serde_json::from_str("{}").unwrap();
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 3);
    }

    #[test]
    fn test_register_hashes_password() {
        let request = RegisterUser {
            name: Some("Léa".into()),
            email: Some("Lea@Example.com".into()),
            password: Some("secret-password".into()),
        };
        let model = request.into_active_model().unwrap();
        assert_eq!(model.email, ActiveValue::Set("lea@example.com".to_string()));
        assert_eq!(model.role, ActiveValue::Set(UserRole::User));
        let ActiveValue::Set(hashed) = model.password else {
            panic!("password not set");
        };
        assert!(hash::bcrypt_check("secret-password", &hashed));
    }

    #[test]
    fn test_update_user_role() {
        let mut model = <UserActiveModel as Default>::default();
        UpdateUser {
            role: Some(UserRole::Admin),
            ..Default::default()
        }
        .apply(&mut model);
        assert_eq!(model.role, ActiveValue::Set(UserRole::Admin));
        assert!(!model.name.is_set());
    }
}
