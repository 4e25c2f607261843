//! Integration tests for archive and restore behaviour.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Archiving a project cascades onto its open tickets
//! - Restoring a project reopens only the tickets it archived
//! - Individually archived tickets stay archived across a project restore
//! - Ticket archive/restore is idempotent at the repository level

use sqlx::PgPool;

use bugtrail_core::roles::ROLE_SUBMITTER;
use bugtrail_core::types::DbId;
use bugtrail_db::models::company::CreateCompany;
use bugtrail_db::models::project::CreateProject;
use bugtrail_db::models::ticket::CreateTicket;
use bugtrail_db::models::user::CreateUser;
use bugtrail_db::repositories::{CompanyRepo, LookupRepo, ProjectRepo, RoleRepo, TicketRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Fixture {
    company_id: DbId,
    project_id: DbId,
    submitter_id: DbId,
}

async fn seed_project(pool: &PgPool) -> Fixture {
    let company = CompanyRepo::create(
        pool,
        &CreateCompany {
            name: "Acme".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    let role = RoleRepo::find_by_name(pool, ROLE_SUBMITTER)
        .await
        .unwrap()
        .unwrap();
    let submitter = UserRepo::create(
        pool,
        &CreateUser {
            company_id: company.id,
            role_id: role.id,
            email: "sam@acme.test".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Submitter".to_string(),
        },
    )
    .await
    .unwrap();

    let priorities = LookupRepo::project_priorities(pool).await.unwrap();
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            company_id: company.id,
            name: "Apollo".to_string(),
            description: "archive test".to_string(),
            priority_id: priorities[0].id,
            start_date: chrono::Utc::now(),
            end_date: chrono::Utc::now() + chrono::Duration::days(30),
        },
    )
    .await
    .unwrap();

    Fixture {
        company_id: company.id,
        project_id: project.id,
        submitter_id: submitter.id,
    }
}

async fn seed_ticket(pool: &PgPool, fx: &Fixture, title: &str) -> DbId {
    let types = LookupRepo::ticket_types(pool).await.unwrap();
    let priorities = LookupRepo::ticket_priorities(pool).await.unwrap();
    TicketRepo::create(
        pool,
        &CreateTicket {
            project_id: fx.project_id,
            title: title.to_string(),
            description: "archive test".to_string(),
            ticket_type_id: types[0].id,
            ticket_priority_id: priorities[0].id,
            submitter_user_id: fx.submitter_id,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Test: Project archive cascade
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_project_archive_cascades_to_open_tickets(pool: PgPool) {
    let fx = seed_project(&pool).await;
    let ticket_id = seed_ticket(&pool, &fx, "Open ticket").await;

    assert!(ProjectRepo::archive(&pool, fx.project_id, fx.company_id)
        .await
        .unwrap());

    let ticket = TicketRepo::find_by_id(&pool, ticket_id, fx.company_id)
        .await
        .unwrap()
        .unwrap();
    assert!(ticket.archived);
    assert!(ticket.archived_by_project);

    // Archived project drops out of the active listing.
    let active = ProjectRepo::list_by_company(&pool, fx.company_id)
        .await
        .unwrap();
    assert!(active.is_empty());
    let archived = ProjectRepo::list_archived(&pool, fx.company_id)
        .await
        .unwrap();
    assert_eq!(archived.len(), 1);
}

#[sqlx::test]
async fn test_restore_reopens_only_cascaded_tickets(pool: PgPool) {
    let fx = seed_project(&pool).await;
    let cascaded_id = seed_ticket(&pool, &fx, "Open ticket").await;
    let individual_id = seed_ticket(&pool, &fx, "Closed ticket").await;

    // Archive one ticket on its own before archiving the project.
    TicketRepo::archive(&pool, individual_id, fx.company_id)
        .await
        .unwrap()
        .unwrap();

    assert!(ProjectRepo::archive(&pool, fx.project_id, fx.company_id)
        .await
        .unwrap());
    assert!(ProjectRepo::restore(&pool, fx.project_id, fx.company_id)
        .await
        .unwrap());

    let cascaded = TicketRepo::find_by_id(&pool, cascaded_id, fx.company_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!cascaded.archived);
    assert!(!cascaded.archived_by_project);

    // The individually archived ticket stays archived.
    let individual = TicketRepo::find_by_id(&pool, individual_id, fx.company_id)
        .await
        .unwrap()
        .unwrap();
    assert!(individual.archived);
}

#[sqlx::test]
async fn test_archive_missing_project_returns_false(pool: PgPool) {
    let fx = seed_project(&pool).await;
    assert!(!ProjectRepo::archive(&pool, 9999, fx.company_id)
        .await
        .unwrap());
    // Archiving twice reports false the second time.
    assert!(ProjectRepo::archive(&pool, fx.project_id, fx.company_id)
        .await
        .unwrap());
    assert!(!ProjectRepo::archive(&pool, fx.project_id, fx.company_id)
        .await
        .unwrap());
}

// ---------------------------------------------------------------------------
// Test: Individual ticket archive
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_ticket_archive_and_restore(pool: PgPool) {
    let fx = seed_project(&pool).await;
    let ticket_id = seed_ticket(&pool, &fx, "Flaky test").await;

    let archived = TicketRepo::archive(&pool, ticket_id, fx.company_id)
        .await
        .unwrap()
        .unwrap();
    assert!(archived.archived);
    assert!(!archived.archived_by_project);

    // Second archive finds nothing to do.
    assert!(TicketRepo::archive(&pool, ticket_id, fx.company_id)
        .await
        .unwrap()
        .is_none());

    // Hidden from active listings, shown in the archived one.
    assert!(TicketRepo::list_by_company(&pool, fx.company_id)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        TicketRepo::list_archived(&pool, fx.company_id)
            .await
            .unwrap()
            .len(),
        1
    );

    let restored = TicketRepo::restore(&pool, ticket_id, fx.company_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!restored.archived);
    assert_eq!(
        TicketRepo::list_by_project(&pool, fx.project_id, fx.company_id)
            .await
            .unwrap()
            .len(),
        1
    );
}
