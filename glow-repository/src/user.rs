use glow_error::StorageResult;
use glow_models::{
    domain::prelude::UserInfo,
    entities::prelude::{User, UserActiveModel, UserColumn, UserModel},
    enums::user::UserRole,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QueryTrait, Set,
};

pub struct UserRepository;

impl UserRepository {
    pub async fn create<C>(user: UserActiveModel, db: &C) -> StorageResult<UserModel>
    where
        C: ConnectionTrait,
    {
        Ok(user.insert(db).await?)
    }

    pub async fn update<C>(user: UserActiveModel, db: &C) -> StorageResult<UserModel>
    where
        C: ConnectionTrait,
    {
        Ok(user.update(db).await?)
    }

    pub async fn delete<C>(id: i32, db: &C) -> StorageResult<()>
    where
        C: ConnectionTrait,
    {
        User::delete_by_id(id).exec(db).await?;
        Ok(())
    }

    pub async fn find_all<C>(db: &C) -> StorageResult<Vec<UserInfo>>
    where
        C: ConnectionTrait,
    {
        Ok(User::find()
            .order_by(UserColumn::Id, Order::Asc)
            .into_partial_model::<UserInfo>()
            .all(db)
            .await?)
    }

    pub async fn find_by_id<C>(id: i32, db: &C) -> StorageResult<Option<UserModel>>
    where
        C: ConnectionTrait,
    {
        Ok(User::find_by_id(id).one(db).await?)
    }

    pub async fn find_by_email<C>(email: &str, db: &C) -> StorageResult<Option<UserModel>>
    where
        C: ConnectionTrait,
    {
        Ok(User::find()
            .filter(UserColumn::Email.eq(email.to_lowercase()))
            .one(db)
            .await?)
    }

    /// Whether `email` belongs to an account other than `exclude_id`
    pub async fn exists_by_email<C>(
        email: &str,
        exclude_id: Option<i32>,
        db: &C,
    ) -> StorageResult<bool>
    where
        C: ConnectionTrait,
    {
        Ok(User::find()
            .filter(UserColumn::Email.eq(email.to_lowercase()))
            .apply_if(exclude_id, |q, id| q.filter(UserColumn::Id.ne(id)))
            .count(db)
            .await?
            > 0)
    }

    /// Oldest account, the fallback target for admin promotion
    pub async fn find_first<C>(db: &C) -> StorageResult<Option<UserModel>>
    where
        C: ConnectionTrait,
    {
        Ok(User::find()
            .order_by(UserColumn::Id, Order::Asc)
            .one(db)
            .await?)
    }

    pub async fn promote_to_admin<C>(user: UserModel, db: &C) -> StorageResult<UserModel>
    where
        C: ConnectionTrait,
    {
        if user.role.is_admin() {
            return Ok(user);
        }
        let mut model: UserActiveModel = user.into();
        model.role = Set(UserRole::Admin);
        Ok(model.update(db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seeded_db;

    #[tokio::test]
    async fn test_email_lookup_is_case_insensitive() {
        let db = seeded_db().await;
        let admin = UserRepository::find_by_email("Admin@Glow.com", &db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);

        assert!(UserRepository::exists_by_email("admin@glow.com", None, &db)
            .await
            .unwrap());
        assert!(!UserRepository::exists_by_email("admin@glow.com", Some(admin.id), &db)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_promote_to_admin() {
        let db = seeded_db().await;
        let user = UserRepository::create(
            UserActiveModel {
                name: Set("Léa".into()),
                email: Set("lea@example.com".into()),
                password: Set("hash".into()),
                role: Set(UserRole::User),
                ..Default::default()
            },
            &db,
        )
        .await
        .unwrap();

        let promoted = UserRepository::promote_to_admin(user, &db).await.unwrap();
        assert_eq!(promoted.role, UserRole::Admin);

        let first = UserRepository::find_first(&db).await.unwrap().unwrap();
        assert_eq!(first.email, "admin@glow.com");
        assert_eq!(UserRepository::find_all(&db).await.unwrap().len(), 2);
    }
}
