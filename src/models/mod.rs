pub mod item;
pub mod rbac;
pub mod user;
