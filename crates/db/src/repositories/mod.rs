//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod company_repo;
pub mod invite_repo;
pub mod lookup_repo;
pub mod project_repo;
pub mod role_repo;
pub mod session_repo;
pub mod ticket_attachment_repo;
pub mod ticket_comment_repo;
pub mod ticket_history_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use company_repo::CompanyRepo;
pub use invite_repo::InviteRepo;
pub use lookup_repo::LookupRepo;
pub use project_repo::ProjectRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use ticket_attachment_repo::TicketAttachmentRepo;
pub use ticket_comment_repo::TicketCommentRepo;
pub use ticket_history_repo::TicketHistoryRepo;
pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;
