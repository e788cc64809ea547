use crate::error::{ApiError, ApiResult};
use medibook_common::{drain_into_seen, Notification};
use medibook_db::{UserRepo, UserRow};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Per-user notification mailbox backed by the `users` row. Each user owns
/// two JSONB partitions (unseen and seen) that are always rewritten as a
/// whole; a per-user lock serializes the read-modify-write cycles so
/// concurrent deliveries cannot drop each other's entries.
pub struct Mailbox {
    pool: PgPool,
    locks: RwLock<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl Mailbox {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create the lock guarding a single user's mailbox. The map
    /// grows by one entry per user ever touched and is never evicted;
    /// entries are a single Arc and the population is bounded by the
    /// user table.
    async fn user_lock(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        {
            let locks = self.locks.read().await;
            if let Some(lock) = locks.get(&user_id) {
                return lock.clone();
            }
        }
        let mut locks = self.locks.write().await;
        locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn load_user(&self, user_id: Uuid) -> ApiResult<UserRow> {
        UserRepo::get_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Append a notification to the user's unseen partition.
    pub async fn enqueue(&self, user_id: Uuid, notification: Notification) -> ApiResult<()> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let user = self.load_user(user_id).await?;
        let mut unseen = user.notifications.0;
        unseen.push(notification);
        UserRepo::set_mailbox(&self.pool, user_id, &unseen, &user.seen_notifications.0).await?;
        Ok(())
    }

    /// Move every unseen notification to the seen partition, preserving
    /// order. Returns the resulting (unseen, seen) partitions.
    pub async fn mark_all_seen(
        &self,
        user_id: Uuid,
    ) -> ApiResult<(Vec<Notification>, Vec<Notification>)> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        let user = self.load_user(user_id).await?;
        let mut unseen = user.notifications.0;
        let mut seen = user.seen_notifications.0;
        drain_into_seen(&mut unseen, &mut seen);
        UserRepo::set_mailbox(&self.pool, user_id, &unseen, &seen).await?;
        Ok((unseen, seen))
    }

    /// Empty both partitions. Idempotent.
    pub async fn clear_all(
        &self,
        user_id: Uuid,
    ) -> ApiResult<(Vec<Notification>, Vec<Notification>)> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        // Load first so a missing user still reports NotFound.
        self.load_user(user_id).await?;
        UserRepo::set_mailbox(&self.pool, user_id, &[], &[]).await?;
        Ok((Vec::new(), Vec::new()))
    }
}
