//! Role checks layered on top of [`AuthUser`].

use atelier_core::error::CoreError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::auth::ROLE_ADMIN;
use crate::error::AppError;
use crate::state::AppState;

/// Fail with `Forbidden` unless the caller holds `role`.
fn ensure_role(user: &AuthUser, role: &str) -> Result<(), CoreError> {
    if user.role == role {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "This action requires the '{role}' role"
        )))
    }
}

/// An authenticated caller with the `admin` role; used by the artist
/// registry under `/api/v1/admin`.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        ensure_role(&user, ROLE_ADMIN)?;
        Ok(RequireAdmin(user))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::auth::ROLE_ARTIST;

    fn user(role: &str) -> AuthUser {
        AuthUser {
            external_id: "kc-1".into(),
            role: role.into(),
        }
    }

    #[test]
    fn matching_role_passes() {
        assert!(ensure_role(&user(ROLE_ADMIN), ROLE_ADMIN).is_ok());
    }

    #[test]
    fn other_role_is_forbidden() {
        assert_matches!(
            ensure_role(&user(ROLE_ARTIST), ROLE_ADMIN),
            Err(CoreError::Forbidden(msg)) if msg.contains("admin")
        );
    }
}
