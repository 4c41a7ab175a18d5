//! Users
//!
//! Customer identities live with the identity provider; this service only
//! ever sees the UUID carried by a customer API token.

use crate::uuids::TypedUuid;

/// Marker for user identifiers.
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;
