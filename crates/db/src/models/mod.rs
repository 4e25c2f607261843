//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod company;
pub mod invite;
pub mod lookup;
pub mod project;
pub mod role;
pub mod session;
pub mod ticket;
pub mod ticket_attachment;
pub mod ticket_comment;
pub mod ticket_history;
pub mod user;
