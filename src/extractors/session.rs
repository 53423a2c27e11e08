//! Caller identity from gateway headers (e.g. X-User-Email, X-User-Role).
//!
//! Authentication itself happens upstream; this server trusts the identity
//! headers the gateway forwards and only decides authorization.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Header carrying the authenticated caller's email.
pub const USER_EMAIL_HEADER: &str = "X-User-Email";

/// Header carrying the authenticated caller's role.
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// Caller role as forwarded by the gateway. Anything unrecognized is treated
/// as a regular user; only the exact `admin` value unlocks admin routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    Specialist,
    User,
}

impl Role {
    fn parse(raw: &str) -> Role {
        match raw {
            "admin" => Role::Admin,
            "specialist" => Role::Specialist,
            _ => Role::User,
        }
    }
}

/// Extractor for the authenticated session. Missing or empty email header
/// rejects the request with 401 before the handler runs.
#[derive(Clone, Debug)]
pub struct Session {
    pub email: String,
    pub role: Role,
}

impl Session {
    /// Gate for the admin resource browser.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let email = header_value(parts, USER_EMAIL_HEADER).ok_or(AppError::Unauthorized)?;
        let role = header_value(parts, USER_ROLE_HEADER)
            .map(|raw| Role::parse(&raw))
            .unwrap_or(Role::User);
        Ok(Session { email, role })
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_admin_is_admin() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("Admin"), Role::User);
        assert_eq!(Role::parse("specialist"), Role::Specialist);
        assert_eq!(Role::parse("moderator"), Role::User);
    }

    #[test]
    fn admin_gate() {
        let admin = Session {
            email: "root@example.com".into(),
            role: Role::Admin,
        };
        assert!(admin.require_admin().is_ok());
        let user = Session {
            email: "a@example.com".into(),
            role: Role::User,
        };
        assert!(matches!(user.require_admin(), Err(AppError::Forbidden)));
    }
}
