use glow_error::StorageResult;
use glow_models::entities::prelude::{
    Category, CategoryColumn, CategoryModel, Product, ProductActiveModel, ProductColumn,
    ProductModel,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder,
    QueryTrait,
};

/// Repository for product operations
pub struct ProductRepository;

impl ProductRepository {
    pub async fn create<C>(product: ProductActiveModel, db: &C) -> StorageResult<ProductModel>
    where
        C: ConnectionTrait,
    {
        Ok(product.insert(db).await?)
    }

    pub async fn update<C>(product: ProductActiveModel, db: &C) -> StorageResult<ProductModel>
    where
        C: ConnectionTrait,
    {
        Ok(product.update(db).await?)
    }

    pub async fn delete<C>(id: i32, db: &C) -> StorageResult<()>
    where
        C: ConnectionTrait,
    {
        Product::delete_by_id(id).exec(db).await?;
        Ok(())
    }

    /// Products with their category, in store order, optionally restricted to
    /// the category whose slug is `category_slug`
    pub async fn find_all<C>(
        category_slug: Option<&str>,
        db: &C,
    ) -> StorageResult<Vec<(ProductModel, Option<CategoryModel>)>>
    where
        C: ConnectionTrait,
    {
        Ok(Product::find()
            .find_also_related(Category)
            .apply_if(category_slug, |q, slug| {
                q.filter(CategoryColumn::Slug.eq(slug))
            })
            .order_by(ProductColumn::Id, Order::Asc)
            .all(db)
            .await?)
    }

    pub async fn find_by_id<C>(id: i32, db: &C) -> StorageResult<Option<ProductModel>>
    where
        C: ConnectionTrait,
    {
        Ok(Product::find_by_id(id).one(db).await?)
    }

    pub async fn find_with_category<C>(
        id: i32,
        db: &C,
    ) -> StorageResult<Option<(ProductModel, Option<CategoryModel>)>>
    where
        C: ConnectionTrait,
    {
        Ok(Product::find_by_id(id)
            .find_also_related(Category)
            .one(db)
            .await?)
    }

    /// Every product, for inventory figures
    pub async fn find_models<C>(db: &C) -> StorageResult<Vec<ProductModel>>
    where
        C: ConnectionTrait,
    {
        Ok(Product::find()
            .order_by(ProductColumn::Id, Order::Asc)
            .all(db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seeded_db;
    use rust_decimal::Decimal;
    use sea_orm::Set;

    #[tokio::test]
    async fn test_find_all_by_category_slug() {
        let db = seeded_db().await;

        let all = ProductRepository::find_all(None, &db).await.unwrap();
        assert_eq!(all.len(), 6);
        assert!(all.iter().all(|(_, category)| category.is_some()));

        let makeup = ProductRepository::find_all(Some("maquillage"), &db)
            .await
            .unwrap();
        assert_eq!(makeup.len(), 2);
        assert!(makeup
            .iter()
            .all(|(_, c)| c.as_ref().map(|c| c.slug.as_str()) == Some("maquillage")));

        assert!(ProductRepository::find_all(Some("unknown"), &db)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_crud_without_category() {
        let db = seeded_db().await;
        let created = ProductRepository::create(
            ProductActiveModel {
                name: Set("Baume".into()),
                slug: Set("baume-abc123".into()),
                price: Set(Decimal::new(1250, 2)),
                stock: Set(0),
                is_active: Set(true),
                featured: Set(false),
                ..Default::default()
            },
            &db,
        )
        .await
        .unwrap();

        let (product, category) = ProductRepository::find_with_category(created.id, &db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.price, Decimal::new(1250, 2));
        assert!(category.is_none());

        ProductRepository::delete(created.id, &db).await.unwrap();
        assert!(ProductRepository::find_by_id(created.id, &db)
            .await
            .unwrap()
            .is_none());
        assert_eq!(ProductRepository::find_models(&db).await.unwrap().len(), 6);
    }
}
