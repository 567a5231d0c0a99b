//! User domain types.

use tally_core::{Role, UserId, Username};

/// A login account (domain type).
///
/// The password hash never leaves the repository and authentication service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: Username,
    /// Admin or regular user.
    pub role: Role,
}
