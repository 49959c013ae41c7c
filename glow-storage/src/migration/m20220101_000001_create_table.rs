use glow_models::initializer::{initializers, InitContext};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend, Statement, TransactionTrait};
use tracing::{info, instrument};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_tables(manager).await?;
        create_indexes(manager).await?;
        create_sqlite_updated_at_triggers(manager).await?;
        seed_all(manager.get_connection()).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for initializer in initializers().into_iter().rev() {
            manager
                .drop_table(initializer.to_drop_table_stmt(manager.get_database_backend()))
                .await?;
        }
        Ok(())
    }
}

async fn create_tables(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let backend = manager.get_database_backend();
    for initializer in initializers() {
        manager
            .create_table(initializer.to_create_table_stmt(backend))
            .await?;
    }
    Ok(())
}

async fn create_indexes(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    for initializer in initializers() {
        for stmt in initializer
            .to_create_indexes_stmt(manager.get_database_backend())
            .unwrap_or_default()
        {
            manager.create_index(stmt).await?;
        }
    }
    Ok(())
}

/// `AFTER UPDATE` trigger per table with an `updated_at` column. Rows whose
/// `updated_at` was left untouched by the statement get the current time.
async fn create_sqlite_updated_at_triggers(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    if manager.get_database_backend() != DatabaseBackend::Sqlite {
        return Ok(());
    }

    let conn = manager.get_connection();
    for initializer in initializers() {
        if !initializer.has_update_col() {
            continue;
        }

        let table_name = initializer.name();
        let trigger_name = format!("trg_{}_updated_at", table_name);
        let sql = format!(
            r#"
            CREATE TRIGGER IF NOT EXISTS "{trigger_name}"
            AFTER UPDATE ON "{table_name}"
            FOR EACH ROW
            WHEN NEW."updated_at" = OLD."updated_at"
            BEGIN
                UPDATE "{table_name}" SET "updated_at" = CURRENT_TIMESTAMP WHERE rowid = NEW.rowid;
            END;
            "#
        );

        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql))
            .await?;
    }

    Ok(())
}

/// Upserts every initializer's seed records, one transaction per table.
#[instrument(name = "seeding-data", skip_all)]
pub async fn seed_all<C>(db: &C) -> Result<(), DbErr>
where
    C: TransactionTrait,
{
    let mut ctx = InitContext::default();
    for initializer in initializers() {
        let transaction = db.begin().await?;
        info!(initializer = initializer.name(), "start seeding data");
        initializer.seeding_data(&transaction, &mut ctx).await?;
        transaction.commit().await?;
        info!(initializer = initializer.name(), "seeding data success");
    }
    Ok(())
}
