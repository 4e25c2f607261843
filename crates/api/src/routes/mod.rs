pub mod auth;
pub mod company;
pub mod health;
pub mod invites;
pub mod lookups;
pub mod projects;
pub mod tickets;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/register                       invite-based registration (public)
/// /auth/register-company               new tenant bootstrap (public)
/// /auth/logout                         logout (requires auth)
///
/// /company                             own company (GET)
/// /company/members                     member roster (GET)
/// /company/members/role/{role}         members holding a role (GET)
/// /company/members/{id}/role           change member role (PUT, admin)
///
/// /projects                            list, create
/// /projects/archived                   archived projects
/// /projects/mine                       caller's project memberships
/// /projects/unassigned                 projects without a manager (admin)
/// /projects/{id}                       get, update
/// /projects/{id}/archive               archive project + open tickets (POST)
/// /projects/{id}/restore               restore project + its tickets (POST)
/// /projects/{id}/members               list, add
/// /projects/{id}/members/{user_id}     remove (DELETE)
/// /projects/{id}/manager               get, assign (PUT, admin), remove
/// /projects/{id}/tickets               tickets of a project
/// /projects/{id}/history               project activity feed
///
/// /tickets                             list, create
/// /tickets/archived                    archived tickets
/// /tickets/unassigned                  tickets without a developer (manager)
/// /tickets/mine                        caller's submitted/assigned tickets
/// /tickets/{id}                        get, update
/// /tickets/{id}/archive                archive (POST)
/// /tickets/{id}/restore                restore (POST)
/// /tickets/{id}/developer              assign/clear developer (PUT, manager)
/// /tickets/{id}/comments               list, create
/// /tickets/{id}/attachments            list, upload (multipart)
/// /tickets/{id}/attachments/{aid}      download
/// /tickets/{id}/history                audit trail, oldest first
///
/// /invites                             list, create (admin)
/// /invites/validate                    token check (public)
/// /invites/{id}                        get, cancel (admin)
///
/// /history                             company-wide activity feed
///
/// /lookups/ticket-types                seeded pickers
/// /lookups/ticket-statuses
/// /lookups/ticket-priorities
/// /lookups/project-priorities
/// /lookups/roles
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/company", company::router())
        .nest("/projects", projects::router())
        .nest("/tickets", tickets::router())
        .nest("/invites", invites::router())
        .nest("/lookups", lookups::router())
        .route("/history", get(handlers::history::list_company))
}
