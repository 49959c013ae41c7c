pub use super::category::{
    ActiveModel as CategoryActiveModel, Column as CategoryColumn, Entity as Category,
    Model as CategoryModel, Relation as CategoryRelation,
};
pub use super::product::{
    ActiveModel as ProductActiveModel, Column as ProductColumn, Entity as Product, Ingredients,
    Model as ProductModel, Relation as ProductRelation,
};
pub use super::user::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as User, Model as UserModel,
};
