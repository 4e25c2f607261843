//! Well-known role name constants.
//!
//! These must match the seed data in `20260810000002_create_roles_table.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_PROJECT_MANAGER: &str = "project_manager";
pub const ROLE_DEVELOPER: &str = "developer";
pub const ROLE_SUBMITTER: &str = "submitter";
