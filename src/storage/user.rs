//! User Redis operations.
//!
//! Redis key patterns:
//! - `users:next_id`: id counter (INCR)
//! - `user:{id}`: individual user data (JSON)
//! - `email:{email}`: email lookup to user id (STRING), the uniqueness index

use crate::models::{unix_now, StoredUser};
use redis::AsyncCommands;

const USER_ID_COUNTER: &str = "users:next_id";

/// Claims the email index and writes the user record in one step.
/// Returns 0 without writing anything when the email is already taken.
const INSERT_USER_SCRIPT: &str = r"
if redis.call('SET', KEYS[1], ARGV[1], 'NX') then
    redis.call('SET', KEYS[2], ARGV[2])
    return 1
end
return 0
";

#[derive(Debug)]
pub enum InsertOutcome {
    Created(StoredUser),
    EmailTaken,
}

fn user_key(id: u64) -> String {
    format!("user:{}", id)
}

fn email_key(email: &str) -> String {
    format!("email:{}", email)
}

/// Create a user unless the email is already registered.
///
/// Concurrent inserts for the same email race on a single `SET NX`; exactly
/// one of them creates a record. A losing insert still consumes an id.
pub async fn insert_user<C>(
    con: &mut C,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<InsertOutcome, redis::RedisError>
where
    C: AsyncCommands,
{
    let id: u64 = con.incr(USER_ID_COUNTER, 1).await?;

    let user = StoredUser {
        id,
        name: name.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        created_at: unix_now(),
    };
    let json = super::to_json(&user)?;

    let script = redis::Script::new(INSERT_USER_SCRIPT);
    let created: i64 = script
        .key(email_key(email))
        .key(user_key(id))
        .arg(id)
        .arg(json)
        .invoke_async(con)
        .await?;

    if created == 1 {
        Ok(InsertOutcome::Created(user))
    } else {
        Ok(InsertOutcome::EmailTaken)
    }
}

/// Get a user by ID.
pub async fn get_user<C>(con: &mut C, id: u64) -> Result<Option<StoredUser>, redis::RedisError>
where
    C: AsyncCommands,
{
    super::load_json(con, &user_key(id)).await
}

/// Get a user by email.
///
/// Performs a two-step lookup: email -> user id -> user data.
pub async fn get_user_by_email<C>(
    con: &mut C,
    email: &str,
) -> Result<Option<StoredUser>, redis::RedisError>
where
    C: AsyncCommands,
{
    let user_id: Option<u64> = con.get(email_key(email)).await?;

    match user_id {
        Some(id) => get_user(con, id).await,
        None => Ok(None),
    }
}
