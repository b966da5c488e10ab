//! Bearer-token identity.
//!
//! Tokens are issued by an external identity provider; this server only
//! verifies them. The `sub` claim is matched against `artists.external_id`.

pub mod jwt;

/// Role allowed to manage artist accounts.
pub const ROLE_ADMIN: &str = "admin";

/// Role carried by artists managing their own catalogue.
pub const ROLE_ARTIST: &str = "artist";
