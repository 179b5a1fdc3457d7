use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::authz::Claim;
use crate::models::item::{Item, ItemCreateRequest, ItemUpdateRequest};
use crate::models::rbac::{
    ClaimSelection, CreateRoleRequest, Role, RoleClaimSelection, RoleClaimView, RoleSelection,
    UpdateOutcome, UserClaimView, UserRoleView,
};
use crate::models::user::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, User, UserSummary,
};
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "NoteList API",
        description = "Multi-tenant note and todo-list API with role- and claim-based authorization"
    ),
    paths(
        routes::health::health,
        routes::auth::register,
        routes::auth::login,
        routes::auth::me,
        routes::auth::change_password,
        routes::auth::logout,
        routes::roles::list_roles,
        routes::roles::create_role,
        routes::roles::delete_role,
        routes::admin::list_users,
        routes::admin::user_role_view,
        routes::admin::update_user_roles,
        routes::admin::role_claim_views,
        routes::admin::update_role_claims,
        routes::claims::list_users,
        routes::claims::user_claim_view,
        routes::claims::update_user_claims,
        routes::notes::list_notes,
        routes::notes::get_note,
        routes::notes::create_note,
        routes::notes::update_note,
        routes::notes::delete_note,
        routes::todo_lists::list_todo_lists,
        routes::todo_lists::get_todo_list,
        routes::todo_lists::create_todo_list,
        routes::todo_lists::update_todo_list,
        routes::todo_lists::delete_todo_list,
    ),
    components(schemas(
        Claim,
        User,
        UserSummary,
        RegisterRequest,
        LoginRequest,
        ChangePasswordRequest,
        AuthResponse,
        Role,
        CreateRoleRequest,
        RoleSelection,
        UserRoleView,
        ClaimSelection,
        UserClaimView,
        RoleClaimSelection,
        RoleClaimView,
        UpdateOutcome,
        Item,
        ItemCreateRequest,
        ItemUpdateRequest,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Account registration and login"),
        (name = "Roles", description = "Role administration"),
        (name = "Admin", description = "User-role assignment and the role-claim table"),
        (name = "Claims", description = "Direct user-claim assignment"),
        (name = "Notes", description = "Per-user notes"),
        (name = "TodoLists", description = "Per-user todo lists"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
