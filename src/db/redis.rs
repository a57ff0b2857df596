use redis::Client;
use std::fmt::Display;

use crate::models::UserId;

/// Keys under which the Redis interaction store keeps its data
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Set of item ids a user interacted with
    UserItems(UserId),
    /// Hash of item id -> first `recorded_at` for a user
    RecordedAt(UserId),
    /// Set of every user with at least one interaction
    Users,
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKey::UserItems(user) => write!(f, "recs:interactions:{}", user),
            StoreKey::RecordedAt(user) => write!(f, "recs:recorded_at:{}", user),
            StoreKey::Users => write!(f, "recs:users"),
        }
    }
}

/// Creates a Redis client for the interaction store
///
/// Connections are multiplexed per call via `get_multiplexed_async_connection`.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_key_display_user_items() {
        let key = StoreKey::UserItems(UserId::parse("alice").unwrap());
        assert_eq!(format!("{}", key), "recs:interactions:alice");
    }

    #[test]
    fn test_store_key_display_recorded_at() {
        let key = StoreKey::RecordedAt(UserId::parse("alice").unwrap());
        assert_eq!(format!("{}", key), "recs:recorded_at:alice");
    }

    #[test]
    fn test_store_key_display_users() {
        assert_eq!(format!("{}", StoreKey::Users), "recs:users");
    }

    #[test]
    fn test_create_redis_client_rejects_bad_url() {
        assert!(create_redis_client("not a url").is_err());
    }
}
