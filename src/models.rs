//! Request and response models for the API.
//!
//! All models use serde for serialization/deserialization.
//! Storage models represent Redis data structures; JSON field names are
//! camelCase on the wire.

use crate::auth::token::Identity;
use serde::{Deserialize, Serialize};

/// Current Unix time in seconds.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

// ============================================================================
// Auth Models
// ============================================================================

#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// The fields of a user that may leave the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: u64,
    pub name: String,
    pub email: String,
}

// ============================================================================
// Vendor Models
// ============================================================================

pub const STATUS_PENDING: &str = "Pending";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplicationRequest {
    #[serde(default)]
    pub vendor_name: String,
    #[serde(default)]
    pub stall_type: String,
    #[serde(default)]
    pub license_number: String,
}

/// Vendor application as stored in Redis and returned to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorApplication {
    pub id: u64,
    pub vendor_name: String,
    pub stall_type: String,
    pub license_number: String,
    pub status: String,
    pub user_id: u64,
    pub created_at: u64,
}

// ============================================================================
// Document Models
// ============================================================================

/// Uploaded certificate metadata. The bytes themselves are not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: u64,
    pub file_name: String,
    pub file_url: String,
    pub user_id: u64,
    pub created_at: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_name: String,
    pub message: String,
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: PublicUser,
    pub applications: Vec<VendorApplication>,
    pub documents: Vec<Document>,
}

// ============================================================================
// Storage Models
// ============================================================================

/// User data as stored in Redis. Never serialized into a response.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: u64,
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl StoredUser {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

impl From<&Identity> for PublicUser {
    fn from(identity: &Identity) -> Self {
        PublicUser {
            id: identity.user_id,
            name: identity.name.clone(),
            email: identity.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_user_omits_hash() {
        let user = StoredUser {
            id: 7,
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            created_at: 0,
        };

        let json = serde_json::to_value(user.public()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "name": "Alice", "email": "a@x.com"})
        );
        assert!(!format!("{:?}", user).contains("argon2"));
    }

    #[test]
    fn test_signup_request_missing_fields_default_empty() {
        let req: SignupRequest = serde_json::from_str(r#"{"email": "a@x.com"}"#).unwrap();
        assert_eq!(req.email, "a@x.com");
        assert!(req.name.is_empty());
        assert!(req.password.is_empty());
    }

    #[test]
    fn test_login_request_debug_redacts_password() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email": "a@x.com", "password": "secret1"}"#).unwrap();
        assert!(!format!("{:?}", req).contains("secret1"));
    }

    #[test]
    fn test_application_wire_format() {
        let req: NewApplicationRequest = serde_json::from_str(
            r#"{"vendorName": "Tacos", "stallType": "Food", "licenseNumber": "L-1"}"#,
        )
        .unwrap();
        assert_eq!(req.vendor_name, "Tacos");
        assert_eq!(req.stall_type, "Food");
        assert_eq!(req.license_number, "L-1");

        let app = VendorApplication {
            id: 1,
            vendor_name: req.vendor_name,
            stall_type: req.stall_type,
            license_number: req.license_number,
            status: STATUS_PENDING.to_string(),
            user_id: 3,
            created_at: 10,
        };
        let json = serde_json::to_value(&app).unwrap();
        assert_eq!(json["vendorName"], "Tacos");
        assert_eq!(json["status"], "Pending");
        assert_eq!(json["userId"], 3);
        assert_eq!(json["createdAt"], 10);
    }
}
