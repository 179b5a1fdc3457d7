use std::collections::HashSet;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use super::Claim;
use crate::app::AppState;
use crate::errors::AppError;

/// The authenticated session: the caller's identity plus the role and claim
/// snapshot captured when their token was issued.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub username: String,
    roles: HashSet<String>,
    claims: HashSet<Claim>,
}

impl AuthSession {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn has_claim(&self, claim: Claim) -> bool {
        self.claims.contains(&claim)
    }

    /// Gate an endpoint on a permission claim. Pure membership test against
    /// the session snapshot.
    pub fn require_claim(&self, claim: Claim) -> Result<(), AppError> {
        if self.has_claim(claim) {
            return Ok(());
        }

        tracing::debug!(
            user_id = %self.user_id,
            claim = %claim,
            "claim check denied"
        );
        Err(AppError::forbidden(format!("missing claim: {claim}")))
    }

    /// Gate an endpoint on role membership (any of the listed roles).
    pub fn require_role_any(&self, roles: &[&str]) -> Result<(), AppError> {
        if roles.iter().any(|role| self.has_role(role)) {
            return Ok(());
        }

        tracing::debug!(
            user_id = %self.user_id,
            required = ?roles,
            "role check denied"
        );
        Err(AppError::forbidden(format!(
            "requires one of roles: {}",
            roles.join(", ")
        )))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::unauthorized("Authorization header missing"))?;

        let token_claims = state.jwt.decode(token)?;

        Ok(AuthSession {
            user_id: token_claims.sub,
            username: token_claims.username,
            roles: token_claims.roles.into_iter().collect(),
            claims: token_claims.claims.into_iter().collect(),
        })
    }
}
