//! In-process user directory, used when no database is configured and in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use time::OffsetDateTime;

use crate::auth::role::Role;
use crate::repos::users::{
    DirectoryError, LoginOutcome, LoginUpsert, NewUser, ProfileUpdate, UserDirectory, UserRecord,
};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    by_email: BTreeMap<String, UserRecord>,
}

impl Inner {
    fn insert(&mut self, mut record: UserRecord) -> UserRecord {
        self.next_id += 1;
        record.id = self.next_id;
        self.by_email.insert(record.email.clone(), record.clone());
        record
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    inner: RwLock<Inner>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record with an explicit role. Roles are otherwise only ever
    /// `user` on creation.
    pub fn seed(&self, email: &str, role: Role, now: OffsetDateTime) -> UserRecord {
        self.inner.write().insert(UserRecord {
            id: 0,
            email: email.to_string(),
            name: None,
            photo_url: None,
            provider: None,
            role,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        })
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self.inner.read().by_email.get(email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        let mut users: Vec<_> = self.inner.read().by_email.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn create_user(
        &self,
        new_user: NewUser,
        now: OffsetDateTime,
    ) -> Result<UserRecord, DirectoryError> {
        let mut inner = self.inner.write();
        if inner.by_email.contains_key(&new_user.email) {
            return Err(DirectoryError::Duplicate {
                email: new_user.email,
            });
        }
        Ok(inner.insert(UserRecord {
            id: 0,
            email: new_user.email,
            name: new_user.name,
            photo_url: new_user.photo_url,
            provider: new_user.provider,
            role: Role::User,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn record_login(&self, login: LoginUpsert) -> Result<LoginOutcome, DirectoryError> {
        let mut inner = self.inner.write();

        if let Some(existing) = inner.by_email.get_mut(&login.email) {
            existing.last_login_at = Some(login.at);
            if login.photo_url.is_some() {
                existing.photo_url = login.photo_url;
            }
            if login.provider.is_some() {
                existing.provider = login.provider;
            }
            existing.updated_at = login.at;
            return Ok(LoginOutcome {
                user: existing.clone(),
                created: false,
            });
        }

        let user = inner.insert(UserRecord {
            id: 0,
            email: login.email,
            name: login.name,
            photo_url: login.photo_url,
            provider: login.provider,
            role: Role::User,
            last_login_at: Some(login.at),
            created_at: login.at,
            updated_at: login.at,
        });
        Ok(LoginOutcome {
            user,
            created: true,
        })
    }

    async fn update_profile(
        &self,
        email: &str,
        update: ProfileUpdate,
        now: OffsetDateTime,
    ) -> Result<Option<UserRecord>, DirectoryError> {
        let mut inner = self.inner.write();
        let Some(existing) = inner.by_email.get_mut(email) else {
            return Ok(None);
        };
        if update.name.is_some() {
            existing.name = update.name;
        }
        if update.photo_url.is_some() {
            existing.photo_url = update.photo_url;
        }
        existing.updated_at = now;
        Ok(Some(existing.clone()))
    }

    async fn delete_user_by_email(&self, email: &str) -> Result<u64, DirectoryError> {
        Ok(u64::from(self.inner.write().by_email.remove(email).is_some()))
    }
}
