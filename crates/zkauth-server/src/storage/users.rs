use super::{AuthStorage, UserStore};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::Ordering;
use tracing::debug;
use zkauth_types::{User, UserId, ZkAuthError, ZkAuthResult};

#[async_trait]
impl UserStore for AuthStorage {
    async fn create_user(
        &self,
        username: &str,
        commitment: &str,
        nonce: &str,
    ) -> ZkAuthResult<UserId> {
        let user = User {
            id: UserId::generate(),
            username: username.to_string(),
            commitment: commitment.to_string(),
            nonce: nonce.to_string(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_vec(&user)
            .map_err(|e| ZkAuthError::Serialization(format!("Failed to serialize user: {}", e)))?;
        let size = value.len();

        // Insert only if the key is absent; the losing side of a race sees
        // the winner's record and reports a conflict.
        let swapped = self
            .users
            .compare_and_swap(username.as_bytes(), None::<&[u8]>, Some(value))
            .map_err(|e| self.storage_error("Failed to insert user", e))?;

        match swapped {
            Ok(()) => {
                self.metrics.record_write(size);
                debug!(user_id = %user.id, "Stored user {}", username);
                Ok(user.id)
            }
            Err(_) => {
                self.metrics.conflicts.fetch_add(1, Ordering::Relaxed);
                Err(ZkAuthError::Conflict(format!(
                    "username '{}' is already registered",
                    username
                )))
            }
        }
    }

    async fn find_user_by_username(&self, username: &str) -> ZkAuthResult<Option<User>> {
        let Some(bytes) = self
            .users
            .get(username.as_bytes())
            .map_err(|e| self.storage_error("Failed to read user", e))?
        else {
            return Ok(None);
        };

        self.metrics.record_read(bytes.len());
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| self.storage_error("Corrupt user record", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_and_find() {
        let storage = AuthStorage::in_memory().unwrap();
        let id = storage.create_user("alice", "c0ffee", "n-001").await.unwrap();

        let user = storage.find_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.commitment, "c0ffee");
        assert_eq!(user.nonce, "n-001");
        assert!(storage.find_user_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let storage = AuthStorage::in_memory().unwrap();
        storage.create_user("alice", "c1", "n1").await.unwrap();

        let err = storage.create_user("alice", "c2", "n2").await.unwrap_err();
        assert!(matches!(err, ZkAuthError::Conflict(_)));

        // The first registration is untouched
        let user = storage.find_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(user.commitment, "c1");
        assert_eq!(storage.storage_metrics().snapshot().conflicts, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registration_single_winner() {
        let storage = Arc::new(AuthStorage::in_memory().unwrap());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    storage
                        .create_user("alice", &format!("c{}", i), &format!("n{}", i))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(ZkAuthError::Conflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 31);
        assert_eq!(storage.tree_sizes().users, 1);
    }
}
