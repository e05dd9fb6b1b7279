//! Redis storage layer for users, vendor applications, and documents.
//!
//! All functions are async and use redis::AsyncCommands.
//! Data is serialized to JSON for storage in Redis.

pub mod document;
pub mod user;
pub mod vendor;

use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use zeroize::Zeroizing;

/// Reconnect attempts per failure before a command is reported as failed.
const CONNECT_RETRIES: usize = 2;

/// Process-wide handle to the Redis store.
///
/// The connection manager is opened on first use and shared by every clone
/// of the handle. It re-establishes the underlying connection after Redis
/// restarts. `close` drops it during shutdown.
#[derive(Clone)]
pub struct Store {
    client: redis::Client,
    connection: Arc<Mutex<Option<ConnectionManager>>>,
}

impl Store {
    /// Parse the Redis URL. Does not connect.
    pub fn open(redis_url: &str) -> Result<Self, redis::RedisError> {
        Ok(Store {
            client: redis::Client::open(redis_url)?,
            connection: Arc::new(Mutex::new(None)),
        })
    }

    /// Shared connection, established on first call.
    pub async fn connection(&self) -> Result<ConnectionManager, redis::RedisError> {
        let mut slot = self.connection.lock().await;
        if let Some(con) = slot.as_ref() {
            return Ok(con.clone());
        }

        let config = ConnectionManagerConfig::new().set_number_of_retries(CONNECT_RETRIES);
        let con = self.client.get_connection_manager_with_config(config).await?;
        tracing::info!("Connected to Redis");
        *slot = Some(con.clone());
        Ok(con)
    }

    /// Drop the shared connection. Clones already handed out stay usable
    /// until they are dropped.
    pub async fn close(&self) {
        if self.connection.lock().await.take().is_some() {
            tracing::info!("Redis connection closed");
        }
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String, redis::RedisError> {
    serde_json::to_string(value).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "JSON serialize",
            e.to_string(),
        ))
    })
}

/// Read and deserialize a JSON value.
///
/// The raw JSON is zeroized after deserialization.
pub(crate) async fn load_json<C, T>(
    con: &mut C,
    key: &str,
) -> Result<Option<T>, redis::RedisError>
where
    C: AsyncCommands,
    T: DeserializeOwned,
{
    let json: Option<String> = con.get(key).await?;

    match json {
        Some(data) => {
            let zeroizing_data = Zeroizing::new(data);
            let value = serde_json::from_str(&zeroizing_data).map_err(|e| {
                redis::RedisError::from((
                    redis::ErrorKind::TypeError,
                    "JSON deserialize",
                    e.to_string(),
                ))
            })?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Store a record and prepend its id to the owner's index list in one
/// MULTI/EXEC, so listings come back newest first.
pub(crate) async fn store_owned<C, T>(
    con: &mut C,
    record_key: &str,
    index_key: &str,
    id: u64,
    record: &T,
) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
    T: Serialize,
{
    let json = to_json(record)?;

    let () = redis::pipe()
        .atomic()
        .set(record_key, json)
        .ignore()
        .lpush(index_key, id)
        .ignore()
        .query_async(con)
        .await?;

    Ok(())
}

/// Load every record referenced by an owner's index list, in list order.
///
/// Ids whose record has gone missing are skipped.
pub(crate) async fn load_owned<C, T>(
    con: &mut C,
    index_key: &str,
    record_prefix: &str,
) -> Result<Vec<T>, redis::RedisError>
where
    C: AsyncCommands,
    T: DeserializeOwned,
{
    let ids: Vec<u64> = con.lrange(index_key, 0, -1).await?;

    let mut records = Vec::with_capacity(ids.len());
    for id in ids {
        let key = format!("{}:{}", record_prefix, id);
        if let Some(record) = load_json(con, &key).await? {
            records.push(record);
        }
    }

    Ok(records)
}

/// Connect to Redis for tests, or `None` when no server is reachable.
#[cfg(test)]
pub(crate) async fn test_connection() -> Option<ConnectionManager> {
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

    let store = Store::open(&redis_url).ok()?;
    match store.connection().await {
        Ok(con) => Some(con),
        Err(_) => {
            eprintln!("Skipping test: Redis not available");
            None
        }
    }
}
