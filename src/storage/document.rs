//! Document metadata Redis operations.
//!
//! Redis key patterns:
//! - `documents:next_id`: id counter (INCR)
//! - `document:{id}`: document metadata (JSON)
//! - `user_documents:{user_id}`: the user's document ids, newest first (LIST)

use crate::models::{unix_now, Document};
use redis::AsyncCommands;

const DOCUMENT_ID_COUNTER: &str = "documents:next_id";

/// Record an uploaded file's metadata.
pub async fn insert_document<C>(
    con: &mut C,
    user_id: u64,
    file_name: &str,
    file_url: &str,
) -> Result<Document, redis::RedisError>
where
    C: AsyncCommands,
{
    let id: u64 = con.incr(DOCUMENT_ID_COUNTER, 1).await?;

    let document = Document {
        id,
        file_name: file_name.to_string(),
        file_url: file_url.to_string(),
        user_id,
        created_at: unix_now(),
    };

    super::store_owned(
        con,
        &format!("document:{}", id),
        &format!("user_documents:{}", user_id),
        id,
        &document,
    )
    .await?;

    Ok(document)
}

/// List a user's documents, newest first.
pub async fn list_documents<C>(
    con: &mut C,
    user_id: u64,
) -> Result<Vec<Document>, redis::RedisError>
where
    C: AsyncCommands,
{
    super::load_owned(con, &format!("user_documents:{}", user_id), "document").await
}
