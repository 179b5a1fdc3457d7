//! Permission resolver.
//!
//! Computes the effective permission view for a user (direct user-claims
//! unioned with the claims of every role the user holds) and applies
//! administrative updates to role membership, user-claims and role-claims.
//!
//! All multi-step updates follow the same discipline: read the current set,
//! remove it, then insert the selected set, aborting at the first failure
//! with no compensating rollback. The steps run sequentially because each
//! one reads what the previous one committed. Concurrent updates against
//! the same user are not serialized here; the identity store's row-level
//! consistency is the only protection, and administrative writes to a
//! single user are assumed not to race.

use std::collections::HashSet;

use uuid::Uuid;

use crate::authz::Claim;
use crate::errors::{AppError, AppResult};
use crate::identity::IdentityStore;
use crate::models::rbac::{
    ClaimSelection, RoleClaimSelection, RoleClaimView, RoleSelection, UserClaimView, UserRoleView,
};
use crate::models::user::DbUser;

pub struct PermissionResolver<'a, S: IdentityStore> {
    store: &'a S,
}

impl<'a, S: IdentityStore> PermissionResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn require_user(&self, id: Uuid) -> AppResult<DbUser> {
        self.store
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user does not exist"))
    }

    /// Every role known to the system with an `is_selected` flag for the
    /// given user, in store enumeration order.
    pub async fn user_role_view(&self, user: &DbUser) -> AppResult<UserRoleView> {
        let user_id = user.parsed_id()?;
        let held: HashSet<String> = self.store.user_roles(user_id).await?.into_iter().collect();
        let all_roles = self.store.list_roles().await?;

        let roles = all_roles
            .into_iter()
            .map(|role| RoleSelection {
                is_selected: held.contains(&role.name),
                role_name: role.name,
            })
            .collect();

        Ok(UserRoleView {
            id: user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            roles,
        })
    }

    /// Replace the user's role membership with the selected set.
    ///
    /// Remove-then-add rather than a minimal diff: one code path whether the
    /// target set grows or shrinks, and no duplicate membership rows. If the
    /// add step fails after a successful remove, the user is left with no
    /// roles; that partial state is the documented trade-off of this
    /// strategy, not silently repaired.
    pub async fn update_user_roles(
        &self,
        user_id: Uuid,
        selections: &[RoleSelection],
    ) -> AppResult<()> {
        let user = self.require_user(user_id).await?;
        let user_id = user.parsed_id()?;

        let current = self.store.user_roles(user_id).await?;
        self.store.remove_user_from_roles(user_id, &current).await?;

        let selected: Vec<String> = selections
            .iter()
            .filter(|selection| selection.is_selected)
            .map(|selection| selection.role_name.clone())
            .collect();

        if !selected.is_empty() {
            self.store.add_user_to_roles(user_id, &selected).await?;
        }

        tracing::info!(user_id = %user_id, roles = ?selected, "replaced role membership");
        Ok(())
    }

    /// Effective claim view: one row per catalog claim. `is_selected` is the
    /// effective grant (direct or role-derived), `via_role` its provenance.
    /// Recomputed from persisted state on every call, never cached.
    pub async fn user_claim_view(&self, user: &DbUser) -> AppResult<UserClaimView> {
        let user_id = user.parsed_id()?;
        let direct: HashSet<Claim> = self.store.user_claims(user_id).await?.into_iter().collect();
        let via_roles = self.role_derived_claims(user_id).await?;

        let claims = Claim::ALL
            .iter()
            .map(|&claim| ClaimSelection {
                claim,
                is_selected: direct.contains(&claim) || via_roles.contains(&claim),
                via_role: via_roles.contains(&claim),
            })
            .collect();

        Ok(UserClaimView {
            id: user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            claims,
        })
    }

    /// Replace the user's *direct* claims with the selected set.
    ///
    /// Role-derived claims are never written as user-claims: the incoming
    /// view marks them selected (that is what the administrator sees), so
    /// they are subtracted here against the freshly computed role-derived
    /// set before the insert. Role-claims themselves are never touched.
    pub async fn update_user_claims(
        &self,
        user_id: Uuid,
        selections: &[ClaimSelection],
    ) -> AppResult<()> {
        let user = self.require_user(user_id).await?;
        let user_id = user.parsed_id()?;

        let current = self.store.user_claims(user_id).await?;
        self.store.remove_user_claims(user_id, &current).await?;

        let via_roles = self.role_derived_claims(user_id).await?;
        let selected: Vec<Claim> = selections
            .iter()
            .filter(|selection| selection.is_selected && !via_roles.contains(&selection.claim))
            .map(|selection| selection.claim)
            .collect();

        if !selected.is_empty() {
            self.store.add_user_claims(user_id, &selected).await?;
        }

        tracing::info!(user_id = %user_id, claims = ?selected, "replaced direct user claims");
        Ok(())
    }

    /// The full role × catalog-claim cross-product table.
    pub async fn role_claim_views(&self) -> AppResult<Vec<RoleClaimView>> {
        let roles = self.store.list_roles().await?;
        let mut views = Vec::with_capacity(roles.len());

        for role in roles {
            let existing: HashSet<Claim> =
                self.store.role_claims(&role.name).await?.into_iter().collect();

            let claims = Claim::ALL
                .iter()
                .map(|&claim| RoleClaimSelection {
                    claim,
                    is_selected: existing.contains(&claim),
                })
                .collect();

            views.push(RoleClaimView {
                role_name: role.name,
                claims,
            });
        }

        Ok(views)
    }

    /// Rewrite the whole role-claim table: clear every role's claims, then
    /// add each submitted role's selected set. Same abort-on-first-failure
    /// discipline as the per-user updates.
    pub async fn update_role_claims(&self, forms: &[RoleClaimView]) -> AppResult<()> {
        self.store.clear_all_role_claims().await?;

        for form in forms {
            let selected: Vec<Claim> = form
                .claims
                .iter()
                .filter(|selection| selection.is_selected)
                .map(|selection| selection.claim)
                .collect();

            if !selected.is_empty() {
                self.store.add_role_claims(&form.role_name, &selected).await?;
            }
        }

        tracing::info!(roles = forms.len(), "rewrote role claim table");
        Ok(())
    }

    /// The role and effective-claim sets embedded into a session token at
    /// login and on refresh. Claims come back in catalog order.
    pub async fn session_snapshot(&self, user_id: Uuid) -> AppResult<(Vec<String>, Vec<Claim>)> {
        let roles = self.store.user_roles(user_id).await?;

        let mut effective: HashSet<Claim> =
            self.store.user_claims(user_id).await?.into_iter().collect();
        for role in &roles {
            effective.extend(self.store.role_claims(role).await?);
        }

        let claims = Claim::ALL
            .iter()
            .copied()
            .filter(|claim| effective.contains(claim))
            .collect();

        Ok((roles, claims))
    }

    async fn role_derived_claims(&self, user_id: Uuid) -> AppResult<HashSet<Claim>> {
        let mut derived = HashSet::new();
        for role in self.store.user_roles(user_id).await? {
            derived.extend(self.store.role_claims(&role).await?);
        }
        Ok(derived)
    }
}
