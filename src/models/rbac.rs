use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::authz::Claim;
use crate::errors::AppError;

// =============================================================================
// ROLE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbRole {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbRole> for Role {
    type Error = AppError;

    fn try_from(value: DbRole) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&value.id)
            .map_err(|err| AppError::internal(format!("invalid role id in store: {err}")))?;
        Ok(Role {
            id,
            name: value.name,
            created_at: value.created_at,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoleRequest {
    #[schema(example = "Sales")]
    pub name: String,
}

// =============================================================================
// USER-ROLE ASSIGNMENT VIEW
// =============================================================================

/// One toggle row in the user-role table. The same shape is sent back on
/// update, so an administrator UI round-trips the document it was given.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleSelection {
    #[schema(example = "Admin")]
    pub role_name: String,
    pub is_selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserRoleView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// One entry per role known to the system, in store enumeration order.
    pub roles: Vec<RoleSelection>,
}

// =============================================================================
// USER-CLAIM ASSIGNMENT VIEW
// =============================================================================

/// One toggle row in the user-claim table. `is_selected` reports the
/// *effective* grant (direct or role-derived); `via_role` is the provenance
/// flag. `via_role == true` implies `is_selected == true`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClaimSelection {
    pub claim: Claim,
    pub is_selected: bool,
    #[serde(default)]
    pub via_role: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserClaimView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// One entry per catalog claim, in catalog order.
    pub claims: Vec<ClaimSelection>,
}

// =============================================================================
// ROLE-CLAIM ASSIGNMENT VIEW
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleClaimSelection {
    pub claim: Claim,
    pub is_selected: bool,
}

/// Full cross-product row for one role: every catalog claim with its on/off
/// state, so the admin UI can render toggles for all roles in one call.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleClaimView {
    #[schema(example = "Admin")]
    pub role_name: String,
    pub claims: Vec<RoleClaimSelection>,
}

// =============================================================================
// UPDATE OUTCOME
// =============================================================================

/// Returned by the permission write endpoints. `refreshed_token` is present
/// when the update touched the calling administrator's own permissions and
/// the session snapshot was reissued.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateOutcome {
    pub updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refreshed_token: Option<String>,
}
