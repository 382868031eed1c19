//! SeaORM-backed user directory.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::auth::role::Role;
use crate::entities::users;
use crate::infra::db_errors::map_db_err;
use crate::logging::pii::Redacted;
use crate::repos::users::{
    DirectoryError, LoginOutcome, LoginUpsert, NewUser, ProfileUpdate, UserDirectory, UserRecord,
};

/// `UserDirectory` over a shared connection pool.
#[derive(Debug, Clone)]
pub struct SeaUserDirectory {
    db: DatabaseConnection,
}

impl SeaUserDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, email: &str) -> Result<Option<users::Model>, DirectoryError> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| map_db_err(e, email))
    }

    async fn refresh_login(
        &self,
        existing: users::Model,
        login: &LoginUpsert,
    ) -> Result<users::Model, DirectoryError> {
        let mut active: users::ActiveModel = existing.into();
        active.last_login_at = Set(Some(login.at));
        if let Some(photo_url) = &login.photo_url {
            active.photo_url = Set(Some(photo_url.clone()));
        }
        if let Some(provider) = &login.provider {
            active.provider = Set(Some(provider.clone()));
        }
        active.updated_at = Set(login.at);

        active
            .update(&self.db)
            .await
            .map_err(|e| map_db_err(e, &login.email))
    }
}

impl From<users::Model> for UserRecord {
    fn from(m: users::Model) -> Self {
        UserRecord {
            id: m.id,
            email: m.email,
            name: m.name,
            photo_url: m.photo_url,
            provider: m.provider,
            role: Role::from_stored(&m.role),
            last_login_at: m.last_login_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[async_trait]
impl UserDirectory for SeaUserDirectory {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self.find_model(email).await?.map(UserRecord::from))
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        let rows = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| map_db_err(e, ""))?;
        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn create_user(
        &self,
        new_user: NewUser,
        now: OffsetDateTime,
    ) -> Result<UserRecord, DirectoryError> {
        let email = new_user.email.clone();
        let active = users::ActiveModel {
            id: NotSet,
            email: Set(new_user.email),
            name: Set(new_user.name),
            photo_url: Set(new_user.photo_url),
            provider: Set(new_user.provider),
            role: Set(Role::User.as_str().to_string()),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| map_db_err(e, &email))?;
        debug!(user_id = model.id, email = %Redacted(&email), "user created");
        Ok(model.into())
    }

    async fn record_login(&self, login: LoginUpsert) -> Result<LoginOutcome, DirectoryError> {
        if let Some(existing) = self.find_model(&login.email).await? {
            let user = self.refresh_login(existing, &login).await?;
            return Ok(LoginOutcome {
                user: user.into(),
                created: false,
            });
        }

        let active = users::ActiveModel {
            id: NotSet,
            email: Set(login.email.clone()),
            name: Set(login.name.clone()),
            photo_url: Set(login.photo_url.clone()),
            provider: Set(login.provider.clone()),
            role: Set(Role::User.as_str().to_string()),
            last_login_at: Set(Some(login.at)),
            created_at: Set(login.at),
            updated_at: Set(login.at),
        };

        match active.insert(&self.db).await {
            Ok(model) => {
                info!(user_id = model.id, email = %Redacted(&login.email), "user created on first login");
                Ok(LoginOutcome {
                    user: model.into(),
                    created: true,
                })
            }
            Err(e) => match map_db_err(e, &login.email) {
                // A concurrent login inserted the row first; fold into it.
                DirectoryError::Duplicate { .. } => {
                    let existing = self.find_model(&login.email).await?.ok_or_else(|| {
                        DirectoryError::Unavailable {
                            detail: "user vanished during login upsert".to_string(),
                        }
                    })?;
                    let user = self.refresh_login(existing, &login).await?;
                    Ok(LoginOutcome {
                        user: user.into(),
                        created: false,
                    })
                }
                other => Err(other),
            },
        }
    }

    async fn update_profile(
        &self,
        email: &str,
        update: ProfileUpdate,
        now: OffsetDateTime,
    ) -> Result<Option<UserRecord>, DirectoryError> {
        let Some(existing) = self.find_model(email).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = existing.into();
        if let Some(name) = update.name {
            active.name = Set(Some(name));
        }
        if let Some(photo_url) = update.photo_url {
            active.photo_url = Set(Some(photo_url));
        }
        active.updated_at = Set(now);

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| map_db_err(e, email))?;
        Ok(Some(model.into()))
    }

    async fn delete_user_by_email(&self, email: &str) -> Result<u64, DirectoryError> {
        let res = users::Entity::delete_many()
            .filter(users::Column::Email.eq(email))
            .exec(&self.db)
            .await
            .map_err(|e| map_db_err(e, email))?;
        Ok(res.rows_affected)
    }
}
