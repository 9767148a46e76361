//! Claims carried by admin bearer tokens.

use serde::{Deserialize, Serialize};

/// Claims embedded in every token minted by `POST /api/auth/login`.
///
/// The authentication middleware inserts the decoded claims into the request
/// extensions so handlers can require them with `Extension<AdminClaims>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Always `true`; there are no other roles.
    pub admin: bool,

    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,

    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}
