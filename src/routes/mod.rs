pub mod admin;
pub mod auth;
pub mod claims;
pub mod health;
pub mod notes;
pub mod roles;
pub mod todo_lists;
