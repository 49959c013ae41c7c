use crate::validation::EntityValidator;
use async_trait::async_trait;
use glow_error::{web::WebError, WebResult};
use glow_models::{
    entities::{prelude::UserActiveModel, GlowEntity},
    enums::common::{EntityType, Operation},
};
use glow_repository::UserRepository;
use sea_orm::{ActiveValue, DatabaseConnection};
use tracing::instrument;

/// Email addresses are unique across accounts
pub struct UserDuplicateValidator {
    db: DatabaseConnection,
}

impl UserDuplicateValidator {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntityValidator for UserDuplicateValidator {
    #[inline]
    fn supported_entity_types(&self) -> Vec<EntityType> {
        vec![EntityType::User]
    }

    #[inline]
    fn supported_operations(&self) -> Vec<Operation> {
        vec![Operation::Create, Operation::Write]
    }

    #[instrument(skip(self, entity))]
    async fn validate(&self, entity: &dyn GlowEntity, operation: Operation) -> WebResult<()> {
        let Some(user) = entity.downcast_ref::<UserActiveModel>() else {
            return Ok(());
        };
        let ActiveValue::Set(email) = &user.email else {
            return Ok(());
        };
        let exclude_id = match (operation, &user.id) {
            (Operation::Write, ActiveValue::Set(id) | ActiveValue::Unchanged(id)) => Some(*id),
            _ => None,
        };
        if UserRepository::exists_by_email(email, exclude_id, &self.db).await? {
            return Err(WebError::invalid(
                "email",
                "The email has already been taken.",
            ));
        }
        Ok(())
    }
}
