use std::sync::Arc;

use axum::http::Method;
use axum::routing::{delete, get, post, put};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::identity::SqliteIdentityStore;
use crate::jwt::JwtConfig;
use crate::routes::{admin, auth, claims, health, notes, roles, todo_lists};
use crate::store::SqliteItemStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: Arc<JwtConfig>,
    pub identity: SqliteIdentityStore,
    pub notes: SqliteItemStore,
    pub todo_lists: SqliteItemStore,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt: JwtConfig) -> Self {
        Self {
            identity: SqliteIdentityStore::new(pool.clone()),
            notes: SqliteItemStore::notes(pool.clone()),
            todo_lists: SqliteItemStore::todo_lists(pool.clone()),
            jwt: Arc::new(jwt),
            pool,
        }
    }
}

pub async fn create_app(pool: SqlitePool) -> Result<Router, AppError> {
    let jwt_config = JwtConfig::from_env()?;
    let state = AppState::new(pool, jwt_config);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/change-password", post(auth::change_password))
        .route("/logout", post(auth::logout));

    // Role administration: SuperAdmin only.
    let role_routes = Router::new()
        .route("/", get(roles::list_roles))
        .route("/", post(roles::create_role))
        .route("/:id", delete(roles::delete_role));

    // User-role assignment and the role-claim table: SuperAdmin only.
    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/:id/roles", get(admin::user_role_view))
        .route("/users/:id/roles", put(admin::update_user_roles))
        .route("/role-claims", get(admin::role_claim_views))
        .route("/role-claims", put(admin::update_role_claims));

    // Direct user-claim assignment: SuperAdmin or Admin.
    let claim_routes = Router::new()
        .route("/users", get(claims::list_users))
        .route("/users/:id", get(claims::user_claim_view))
        .route("/users/:id", put(claims::update_user_claims));

    let note_routes = Router::new()
        .route("/", get(notes::list_notes))
        .route("/", post(notes::create_note))
        .route("/:id", get(notes::get_note))
        .route("/:id", put(notes::update_note))
        .route("/:id", delete(notes::delete_note));

    let todo_list_routes = Router::new()
        .route("/", get(todo_lists::list_todo_lists))
        .route("/", post(todo_lists::create_todo_list))
        .route("/:id", get(todo_lists::get_todo_list))
        .route("/:id", put(todo_lists::update_todo_list))
        .route("/:id", delete(todo_lists::delete_todo_list));

    let router = Router::new()
        .route("/health", get(health::health))
        .nest("/auth", auth_routes)
        .nest("/roles", role_routes)
        .nest("/admin", admin_routes)
        .nest("/claims", claim_routes)
        .nest("/notes", note_routes)
        .nest("/todolists", todo_list_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
