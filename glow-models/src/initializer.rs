use crate::idens;
use async_trait::async_trait;
use glow_error::{init::InitContextError, GlowError, GlowResult};
use sea_orm::{
    sea_query::{IndexCreateStatement, TableCreateStatement, TableDropStatement},
    DatabaseBackend, DatabaseTransaction, DbErr,
};
use std::{any::Any, collections::HashMap};
use tracing::debug;

/// Schema and seed definition of one table
#[async_trait]
pub trait GlowInitializer: Send + Sync {
    fn order(&self) -> i32;

    /// Table name
    fn name(&self) -> &str;

    fn has_update_col(&self) -> bool;

    fn to_create_table_stmt(&self, backend: DatabaseBackend) -> TableCreateStatement;

    fn to_drop_table_stmt(&self, backend: DatabaseBackend) -> TableDropStatement;

    fn to_create_indexes_stmt(&self, backend: DatabaseBackend)
        -> Option<Vec<IndexCreateStatement>>;

    async fn seeding_data(
        &self,
        transaction: &DatabaseTransaction,
        ctx: &mut InitContext,
    ) -> Result<(), DbErr>;
}

/// What an upsert did with a seed record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted,
    Updated,
}

/// Seed records that can be written idempotently
#[async_trait]
pub trait SeedableTrait: Send + Sync + 'static {
    /// Row as stored, shared with later initializers through [`InitContext`]
    type Saved: Send + Sync + 'static;

    /// Natural key identifying the row across runs (slug, email)
    fn natural_key(&self) -> &str;

    /// Insert the record, or update the row sharing its natural key
    async fn upsert(
        &self,
        transaction: &DatabaseTransaction,
        ctx: &InitContext,
    ) -> Result<(SeedOutcome, Self::Saved), DbErr>;
}

/// Trait for database initializers that can seed data
#[async_trait]
pub trait DataSeederTrait<T: SeedableTrait + Clone> {
    /// Get the initial seed data
    async fn get_seed_data(&self, ctx: &mut InitContext) -> Result<Option<Vec<T>>, DbErr>;
}

/// Helper trait that combines GlowInitializer and DataSeeder
#[async_trait]
pub trait SeedableInitializerTrait<T: SeedableTrait + Clone>:
    GlowInitializer + DataSeederTrait<T>
{
    /// Upserts every seed record by natural key, then shares the stored rows
    /// through `ctx` under the table name
    async fn seed_data(
        &self,
        transaction: &DatabaseTransaction,
        ctx: &mut InitContext,
    ) -> Result<(), DbErr> {
        let Some(seed_data) = self.get_seed_data(ctx).await? else {
            return Ok(());
        };
        if seed_data.is_empty() {
            return Ok(());
        }

        let (mut inserted, mut updated) = (0usize, 0usize);
        let mut saved = Vec::with_capacity(seed_data.len());
        for record in seed_data.iter() {
            let (outcome, row) = record.upsert(transaction, ctx).await?;
            match outcome {
                SeedOutcome::Inserted => inserted += 1,
                SeedOutcome::Updated => updated += 1,
            }
            saved.push(row);
            debug!(table = self.name(), key = record.natural_key(), "seeded");
        }
        tracing::info!(table = self.name(), inserted, updated, "Seed data applied");

        ctx.set(self.name(), saved);
        Ok(())
    }
}

/// All table initializers, in creation order
pub fn initializers() -> Vec<Box<dyn GlowInitializer>> {
    let mut initializers: Vec<Box<dyn GlowInitializer>> = vec![
        Box::new(idens::product::Product::Table),
        Box::new(idens::category::Category::Table),
        Box::new(idens::user::User::Table),
    ];

    initializers.sort_by_key(|init| init.order());
    initializers
}

/// A context for storing initialization data between different initializers
///
/// This struct provides a type-safe way to store and retrieve vectors of initialization data
/// that can be shared between different initialization steps
pub struct InitContext {
    data: HashMap<String, Vec<Box<dyn Any + Send + Sync>>>,
}

impl InitContext {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Stores a vector of initialization data under the specified key
    pub fn set<T: 'static + Send + Sync>(&mut self, key: &str, values: Vec<T>) {
        let boxed_values: Vec<Box<dyn Any + Send + Sync>> = values
            .into_iter()
            .map(|v| Box::new(v) as Box<dyn Any + Send + Sync>)
            .collect();
        self.data.insert(key.into(), boxed_values);
    }

    /// Retrieves previously stored data for the key, failing if any element has another type
    pub fn get<T: 'static>(&self, key: &str) -> GlowResult<Vec<&T>> {
        let values = self
            .data
            .get(key)
            .ok_or(GlowError::InitContextError(InitContextError::KeyNotFound(
                key.into(),
            )))?;

        values
            .iter()
            .map(|value| {
                value.downcast_ref::<T>().ok_or(GlowError::InitContextError(
                    InitContextError::TypeMismatch(key.into()),
                ))
            })
            .collect()
    }
}

impl Default for InitContext {
    fn default() -> Self {
        Self::new()
    }
}
