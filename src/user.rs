//! User identity types.

use serde::{Deserialize, Serialize};

/// A user as the rest of the system sees one. Carries no credential field,
/// so anything serialized from it is credential-stripped by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Point-in-time copy of a user embedded inside another record (task
/// assignee, project member, comment author).
///
/// A snapshot is taken when the embedding happens and never updated
/// afterwards; it intentionally goes stale if the canonical user changes.
/// The alias exists to make that intent explicit in signatures.
pub type UserSnapshot = User;

/// Directory entry pairing a user with their sign-in credential.
///
/// Lives only in the in-memory directory; never written to storage.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password: String,
}
