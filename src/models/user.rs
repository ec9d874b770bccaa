//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// Registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Generated identifier (also used as document ID)
    pub id: String,
    /// Unique username
    pub username: String,
}

/// Username reservation, keyed by the username itself.
///
/// Firestore has no unique indexes, so uniqueness comes from inserting
/// this document under the username as its ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameClaim {
    pub user_id: String,
}
