use super::{
    manager::ValidationManager,
    validators::{duplicate::UserDuplicateValidator, reference::CategoryReferenceValidator},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Create a default validation manager with pre-registered validators
pub fn create_default_manager(db: &DatabaseConnection) -> ValidationManager {
    let mut manager = ValidationManager::new();
    manager
        .register(Arc::new(CategoryReferenceValidator::new(db.clone())))
        .register(Arc::new(UserDuplicateValidator::new(db.clone())));
    manager
}
