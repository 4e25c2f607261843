//! Domain logic for the issue tracker, free of any database or HTTP
//! dependencies.
//!
//! - [`invites`] -- invite token generation and the expiry/validity rules.
//! - [`history`] -- ticket snapshot diffing that feeds the audit history.
//! - [`roles`] -- well-known role name constants.
//! - [`error`] / [`types`] -- shared error taxonomy and id/time aliases.

pub mod error;
pub mod history;
pub mod invites;
pub mod roles;
pub mod types;
