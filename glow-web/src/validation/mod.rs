pub mod manager;
pub mod prelude;
pub mod validators;

use async_trait::async_trait;
use glow_error::WebResult;
use glow_models::entities::GlowEntity;
use glow_models::enums::common::{EntityType, Operation};

/// Core trait for entity validators
#[async_trait]
pub trait EntityValidator: Send + Sync {
    /// Returns entity types supported by this validator
    fn supported_entity_types(&self) -> Vec<EntityType>;

    /// Returns operations supported by this validator
    fn supported_operations(&self) -> Vec<Operation>;

    /// Performs validation on the entity
    ///
    /// # Returns
    /// * `WebResult<()>` - Success or a 422 naming the offending field
    async fn validate(&self, entity: &dyn GlowEntity, operation: Operation) -> WebResult<()>;

    /// Checks if this validator applies to the given entity type and operation
    fn is_applicable(&self, entity_type: &EntityType, operation: &Operation) -> bool {
        self.supported_entity_types().contains(entity_type)
            && self.supported_operations().contains(operation)
    }
}
