pub mod category;
pub mod prelude;
pub mod product;
pub mod user;

use crate::enums::common::EntityType;
use downcast_rs::{impl_downcast, DowncastSync};
use prelude::{CategoryActiveModel, ProductActiveModel, UserActiveModel};

/// Active models handed to entity validators
pub trait GlowEntity: DowncastSync {
    fn entity_type(&self) -> EntityType;
}

impl_downcast!(sync GlowEntity);

impl GlowEntity for CategoryActiveModel {
    #[inline]
    fn entity_type(&self) -> EntityType {
        EntityType::Category
    }
}

impl GlowEntity for ProductActiveModel {
    #[inline]
    fn entity_type(&self) -> EntityType {
        EntityType::Product
    }
}

impl GlowEntity for UserActiveModel {
    #[inline]
    fn entity_type(&self) -> EntityType {
        EntityType::User
    }
}
