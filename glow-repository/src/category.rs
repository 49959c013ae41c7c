use glow_error::{storage::StorageError, StorageResult};
use glow_models::entities::prelude::{
    Category, CategoryActiveModel, CategoryColumn, CategoryModel, Product, ProductColumn,
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionError, TransactionTrait,
};

/// Repository for category operations
pub struct CategoryRepository;

impl CategoryRepository {
    pub async fn create<C>(category: CategoryActiveModel, db: &C) -> StorageResult<CategoryModel>
    where
        C: ConnectionTrait,
    {
        Ok(category.insert(db).await?)
    }

    pub async fn update<C>(category: CategoryActiveModel, db: &C) -> StorageResult<CategoryModel>
    where
        C: ConnectionTrait,
    {
        Ok(category.update(db).await?)
    }

    /// Delete a category, detaching its products first in the same transaction
    pub async fn delete<C>(id: i32, db: &C) -> StorageResult<()>
    where
        C: TransactionTrait,
    {
        db.transaction::<_, _, StorageError>(|txn| {
            Box::pin(async move {
                Product::update_many()
                    .col_expr(ProductColumn::CategoryId, Expr::value(Option::<i32>::None))
                    .filter(ProductColumn::CategoryId.eq(id))
                    .exec(txn)
                    .await?;
                Category::delete_by_id(id).exec(txn).await?;
                Ok(())
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => StorageError::from(db_err),
            TransactionError::Transaction(err) => err,
        })
    }

    /// All categories in store order
    pub async fn find_all<C>(db: &C) -> StorageResult<Vec<CategoryModel>>
    where
        C: ConnectionTrait,
    {
        Ok(Category::find()
            .order_by(CategoryColumn::Id, Order::Asc)
            .all(db)
            .await?)
    }

    pub async fn find_by_id<C>(id: i32, db: &C) -> StorageResult<Option<CategoryModel>>
    where
        C: ConnectionTrait,
    {
        Ok(Category::find_by_id(id).one(db).await?)
    }

    pub async fn exists_by_id<C>(id: i32, db: &C) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(Category::find_by_id(id).count(db).await? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_support::seeded_db, ProductRepository};
    use sea_orm::Set;

    #[tokio::test]
    async fn test_create_update_find() {
        let db = seeded_db().await;
        let created = CategoryRepository::create(
            CategoryActiveModel {
                name: Set("Cheveux".into()),
                slug: Set("cheveux".into()),
                ..Default::default()
            },
            &db,
        )
        .await
        .unwrap();
        assert!(CategoryRepository::exists_by_id(created.id, &db).await.unwrap());

        let mut model: CategoryActiveModel = created.clone().into();
        model.description = Set(Some("Soins capillaires".into()));
        let updated = CategoryRepository::update(model, &db).await.unwrap();
        assert_eq!(updated.slug, "cheveux");
        assert_eq!(updated.description.as_deref(), Some("Soins capillaires"));

        let all = CategoryRepository::find_all(&db).await.unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all.last().map(|c| c.id), Some(created.id));
    }

    #[tokio::test]
    async fn test_delete_detaches_products() {
        let db = seeded_db().await;
        let visage = CategoryRepository::find_all(&db)
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.slug == "soins-visage")
            .unwrap();

        CategoryRepository::delete(visage.id, &db).await.unwrap();

        assert!(CategoryRepository::find_by_id(visage.id, &db)
            .await
            .unwrap()
            .is_none());
        let products = ProductRepository::find_all(None, &db).await.unwrap();
        assert_eq!(products.len(), 6);
        assert_eq!(
            products.iter().filter(|(p, _)| p.category_id.is_none()).count(),
            2
        );
    }
}
