//! Authorization: claim catalog and per-request gate.
//!
//! The gate only ever inspects the role and claim snapshot carried by the
//! authenticated session token. It never consults the database, so a check
//! is a pure membership test and cannot fail on storage problems.

mod catalog;
mod session;

pub use catalog::Claim;
pub use session::AuthSession;

/// Built-in role names.
pub mod roles {
    pub const SUPER_ADMIN: &str = "SuperAdmin";
    pub const ADMIN: &str = "Admin";
    pub const USER: &str = "User";
}
