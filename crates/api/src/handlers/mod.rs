//! HTTP handlers, grouped by resource.

pub mod auth;
pub mod companies;
pub mod history;
pub mod invites;
pub mod lookups;
pub mod projects;
pub mod tickets;
