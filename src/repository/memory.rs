//! In-process adapters for the repository ports. They back the test suite and
//! local runs without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use eyre::Result;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{CommunityRepository, DuplicateEmail, OtpStore, UserRepository};
use crate::dto::UpdateCommunityDto;
use crate::models::{Community, OtpCode, User, UserRole};

#[derive(Default)]
pub struct InMemoryOtpStore {
    records: Mutex<HashMap<String, OtpCode>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn upsert(&self, record: &OtpCode) -> Result<()> {
        self.records
            .lock()
            .await
            .insert(record.email.clone(), record.clone());
        Ok(())
    }

    async fn find(&self, email: &str) -> Result<Option<OtpCode>> {
        Ok(self.records.lock().await.get(email).cloned())
    }

    async fn record_failed_attempt(&self, email: &str, code: &str) -> Result<i32> {
        let mut records = self.records.lock().await;
        Ok(records
            .get_mut(email)
            .filter(|record| record.code == code)
            .map(|record| {
                record.attempts += 1;
                record.attempts
            })
            .unwrap_or(0))
    }

    async fn consume(&self, email: &str, code: &str) -> Result<bool> {
        let mut records = self.records.lock().await;
        match records.get_mut(email) {
            Some(record) if record.code == code && !record.consumed => {
                record.consumed = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, email: &str, code: &str) -> Result<()> {
        let mut records = self.records.lock().await;
        if records.get(email).is_some_and(|record| record.code == code) {
            records.remove(email);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<User> {
        let mut users = self.users.lock().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(DuplicateEmail.into());
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn mark_verified(&self, email: &str) -> Result<Option<User>> {
        let mut users = self.users.lock().await;
        Ok(users
            .values_mut()
            .find(|user| user.email == email)
            .map(|user| {
                user.is_verified = true;
                user.updated_at = Utc::now();
                user.clone()
            }))
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<Option<User>> {
        let mut users = self.users.lock().await;
        Ok(users.get_mut(&id).map(|user| {
            user.role = role;
            user.is_farmer = role == UserRole::Farmer;
            user.is_admin = role == UserRole::Admin;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[derive(Default)]
pub struct InMemoryCommunityRepository {
    communities: Mutex<HashMap<Uuid, Community>>,
}

impl InMemoryCommunityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommunityRepository for InMemoryCommunityRepository {
    async fn insert(&self, community: &Community) -> Result<Community> {
        self.communities
            .lock()
            .await
            .insert(community.id, community.clone());
        Ok(community.clone())
    }

    async fn list(&self) -> Result<Vec<Community>> {
        let mut all: Vec<Community> = self.communities.lock().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Community>> {
        Ok(self.communities.lock().await.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, changes: &UpdateCommunityDto) -> Result<Option<Community>> {
        let mut communities = self.communities.lock().await;
        Ok(communities.get_mut(&id).map(|community| {
            if let Some(name) = &changes.name {
                community.name = name.clone();
            }
            if let Some(description) = &changes.description {
                community.description = description.clone();
            }
            if let Some(image_url) = &changes.image_url {
                community.image_url = image_url.clone();
            }
            if let Some(categories) = &changes.categories {
                community.categories = categories.clone();
            }
            community.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.communities.lock().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn consume_succeeds_only_once() {
        let store = InMemoryOtpStore::new();
        let record = OtpCode::new(
            "a@x.com".into(),
            "hash".into(),
            Utc::now() + Duration::minutes(5),
        );
        store.upsert(&record).await.unwrap();

        assert!(!store.consume("a@x.com", "other").await.unwrap());
        assert!(store.consume("a@x.com", "hash").await.unwrap());
        assert!(!store.consume("a@x.com", "hash").await.unwrap());
        assert!(!store.consume("missing@x.com", "hash").await.unwrap());
    }

    #[tokio::test]
    async fn stale_hash_leaves_reissued_record_alone() {
        let store = InMemoryOtpStore::new();
        let expires = Utc::now() + Duration::minutes(5);
        store
            .upsert(&OtpCode::new("a@x.com".into(), "second".into(), expires))
            .await
            .unwrap();

        assert_eq!(store.record_failed_attempt("a@x.com", "first").await.unwrap(), 0);
        store.delete("a@x.com", "first").await.unwrap();

        let record = store.find("a@x.com").await.unwrap().unwrap();
        assert_eq!(record.attempts, 0);
        assert!(!record.consumed);
    }

    #[tokio::test]
    async fn upsert_overwrites_previous_record() {
        let store = InMemoryOtpStore::new();
        let expires = Utc::now() + Duration::minutes(5);
        store
            .upsert(&OtpCode::new("a@x.com".into(), "first".into(), expires))
            .await
            .unwrap();
        store.record_failed_attempt("a@x.com", "first").await.unwrap();
        store
            .upsert(&OtpCode::new("a@x.com".into(), "second".into(), expires))
            .await
            .unwrap();

        let record = store.find("a@x.com").await.unwrap().unwrap();
        assert_eq!(record.code, "second");
        assert_eq!(record.attempts, 0);
    }
}
