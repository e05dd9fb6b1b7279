//! Vendor application Redis operations.
//!
//! Redis key patterns:
//! - `applications:next_id`: id counter (INCR)
//! - `application:{id}`: application data (JSON)
//! - `user_applications:{user_id}`: the user's application ids, newest first (LIST)

use crate::models::{unix_now, NewApplicationRequest, VendorApplication, STATUS_PENDING};
use redis::AsyncCommands;

const APPLICATION_ID_COUNTER: &str = "applications:next_id";

/// Store a new application in `Pending` status.
pub async fn insert_application<C>(
    con: &mut C,
    user_id: u64,
    req: NewApplicationRequest,
) -> Result<VendorApplication, redis::RedisError>
where
    C: AsyncCommands,
{
    let id: u64 = con.incr(APPLICATION_ID_COUNTER, 1).await?;

    let application = VendorApplication {
        id,
        vendor_name: req.vendor_name,
        stall_type: req.stall_type,
        license_number: req.license_number,
        status: STATUS_PENDING.to_string(),
        user_id,
        created_at: unix_now(),
    };

    super::store_owned(
        con,
        &format!("application:{}", id),
        &format!("user_applications:{}", user_id),
        id,
        &application,
    )
    .await?;

    Ok(application)
}

/// List a user's applications, newest first.
pub async fn list_applications<C>(
    con: &mut C,
    user_id: u64,
) -> Result<Vec<VendorApplication>, redis::RedisError>
where
    C: AsyncCommands,
{
    super::load_owned(con, &format!("user_applications:{}", user_id), "application").await
}
