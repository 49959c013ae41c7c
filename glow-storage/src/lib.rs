pub mod media;
mod migration;
mod sql;

use async_trait::async_trait;
use glow_error::{init::InitContextError, storage::StorageError, GlowResult};
use glow_models::{settings::Settings, DbManager};
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use sql::sqlite;
use std::sync::Arc;
use tracing::{info, instrument};

pub use media::{MediaStore, UploadedFile};

/// Global database manager struct
pub struct GlowDbManager {
    db_conn: Option<DatabaseConnection>,
}

#[async_trait]
impl DbManager for GlowDbManager {
    #[inline]
    #[instrument(name = "init-db-manager", skip_all)]
    async fn init(settings: &Settings) -> GlowResult<Arc<Self>, InitContextError> {
        let db_conn = {
            let db = sqlite::init_db(&settings.db.sqlite).await.map_err(|e| {
                InitContextError::Primitive(format!("Failed to init SQLite database: {e}"))
            })?;

            // Run database migrations
            Migrator::up(&db, None).await.map_err(|e| {
                InitContextError::Primitive(format!("Failed to migrate SQLite database: {e}"))
            })?;

            db
        };

        let db_manager = Arc::new(GlowDbManager {
            db_conn: Some(db_conn),
        });

        info!("Database manager initialized successfully");
        Ok(db_manager)
    }

    #[inline]
    fn get_connection(&self) -> GlowResult<DatabaseConnection, StorageError> {
        self.db_conn
            .as_ref()
            .ok_or(StorageError::StorageUnavailable)
            .cloned()
    }

    #[inline]
    #[instrument(name = "db_close", skip_all)]
    async fn close(&self) -> GlowResult<()> {
        info!("🛑 Closing database connections...");
        if let Some(db) = &self.db_conn {
            db.clone().close().await?;
        }
        info!("✅ Database connections closed successfully");
        Ok(())
    }
}

/// Re-applies the seed data. Existing rows are matched by slug or email and
/// updated in place, so running it repeatedly never duplicates records.
#[instrument(name = "run-seeders", skip_all)]
pub async fn run_seeders(db: &DatabaseConnection) -> GlowResult<()> {
    migration::seed_all(db).await?;
    info!("Seeders completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glow_models::{
        entities::prelude::{Category, CategoryColumn, Product, ProductColumn, User},
        settings::{Db, Inner, Sqlite},
    };
    use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

    fn memory_settings() -> Settings {
        Settings::from(Inner {
            db: Db {
                sqlite: Sqlite {
                    path: ":memory:".into(),
                    ..Default::default()
                },
            },
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_migration_seeds_catalog() {
        let manager = GlowDbManager::init(&memory_settings()).await.unwrap();
        let db = manager.get_connection().unwrap();

        assert_eq!(Category::find().count(&db).await.unwrap(), 4);
        assert_eq!(Product::find().count(&db).await.unwrap(), 6);
        assert_eq!(User::find().count(&db).await.unwrap(), 1);

        let visage = Category::find()
            .filter(CategoryColumn::Slug.eq("soins-visage"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(visage.name, "Soins Visage");
        assert!(visage.created_at.is_some());
    }

    #[tokio::test]
    async fn test_reseeding_is_idempotent() {
        let manager = GlowDbManager::init(&memory_settings()).await.unwrap();
        let db = manager.get_connection().unwrap();

        run_seeders(&db).await.unwrap();
        run_seeders(&db).await.unwrap();

        assert_eq!(Category::find().count(&db).await.unwrap(), 4);
        assert_eq!(Product::find().count(&db).await.unwrap(), 6);
        assert_eq!(User::find().count(&db).await.unwrap(), 1);
        manager.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_reseeding_links_products_to_current_category_rows() {
        let manager = GlowDbManager::init(&memory_settings()).await.unwrap();
        let db = manager.get_connection().unwrap();

        let parfums = || {
            Category::find()
                .filter(CategoryColumn::Slug.eq("parfums"))
                .one(&db)
        };
        let old_id = parfums().await.unwrap().unwrap().id;
        Category::delete_by_id(old_id).exec(&db).await.unwrap();

        run_seeders(&db).await.unwrap();

        let new_id = parfums().await.unwrap().unwrap().id;
        assert_ne!(new_id, old_id);
        let linked = Product::find()
            .filter(ProductColumn::CategoryId.eq(new_id))
            .count(&db)
            .await
            .unwrap();
        assert_eq!(linked, 1);
    }
}
