use crate::validation::EntityValidator;
use async_trait::async_trait;
use glow_error::{web::WebError, WebResult};
use glow_models::{
    entities::{prelude::ProductActiveModel, GlowEntity},
    enums::common::{EntityType, Operation},
};
use glow_repository::CategoryRepository;
use sea_orm::{ActiveValue, DatabaseConnection};
use tracing::instrument;

/// Rejects products pointing at a category that does not exist
pub struct CategoryReferenceValidator {
    db: DatabaseConnection,
}

impl CategoryReferenceValidator {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntityValidator for CategoryReferenceValidator {
    #[inline]
    fn supported_entity_types(&self) -> Vec<EntityType> {
        vec![EntityType::Product]
    }

    #[inline]
    fn supported_operations(&self) -> Vec<Operation> {
        vec![Operation::Create, Operation::Write]
    }

    #[instrument(skip(self, entity))]
    async fn validate(&self, entity: &dyn GlowEntity, _operation: Operation) -> WebResult<()> {
        let Some(product) = entity.downcast_ref::<ProductActiveModel>() else {
            return Ok(());
        };
        // Only a category id written by this request is checked
        if let ActiveValue::Set(Some(category_id)) = product.category_id {
            if !CategoryRepository::exists_by_id(category_id, &self.db).await? {
                return Err(WebError::invalid(
                    "category_id",
                    "The selected category id is invalid.",
                ));
            }
        }
        Ok(())
    }
}
