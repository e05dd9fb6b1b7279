//! Demo data for local development.

use crate::auth::password::{hash_password, HashCost};
use crate::error::AppError;
use crate::models::{NewApplicationRequest, StoredUser};
use crate::storage::{self, user::InsertOutcome, Store};

pub const DEMO_EMAIL: &str = "alice@example.com";
pub const DEMO_NAME: &str = "Alice Example";
pub const DEMO_PASSWORD: &str = "password123";

/// Create the demo account and one pending application.
///
/// An existing demo account is reused; the application is only added for a
/// freshly created account so repeated runs do not pile up duplicates.
pub async fn run(store: &Store, cost: HashCost) -> Result<StoredUser, AppError> {
    let mut con = store.connection().await?;

    let password_hash =
        tokio::task::spawn_blocking(move || hash_password(DEMO_PASSWORD, cost)).await??;

    let user = match storage::user::insert_user(&mut con, DEMO_NAME, DEMO_EMAIL, &password_hash)
        .await?
    {
        InsertOutcome::Created(user) => user,
        InsertOutcome::EmailTaken => {
            tracing::info!(email = DEMO_EMAIL, "Demo user already exists, skipping");
            return storage::user::get_user_by_email(&mut con, DEMO_EMAIL)
                .await?
                .ok_or_else(|| AppError::Internal("Demo user index without record".to_string()));
        }
    };
    tracing::info!(user_id = user.id, email = DEMO_EMAIL, "Demo user created");

    let application = storage::vendor::insert_application(
        &mut con,
        user.id,
        NewApplicationRequest {
            vendor_name: "Alice's Street Tacos".to_string(),
            stall_type: "Food".to_string(),
            license_number: "VEN-2026-0001".to_string(),
        },
    )
    .await?;
    tracing::info!(application_id = application.id, "Demo application created");

    Ok(user)
}
