//! Authentication layer: password hashing, signed session tokens, the session
//! cookie, and the route gate.

pub mod cookie;
pub mod gate;
pub mod middleware;
pub mod password;
pub mod token;

pub use gate::route_gate;
pub use middleware::{AppState, AuthUser, CurrentSession};
pub use password::{hash_password, verify_password, HashCost};
pub use token::{Claims, Identity, TokenSigner};
