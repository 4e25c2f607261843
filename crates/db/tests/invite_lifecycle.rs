//! Integration tests for the invite lifecycle.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Issued invites carry a fresh token and start valid
//! - Redemption is one-shot (second accept returns `false`)
//! - Cancellation and the 7-day window both invalidate a token
//! - Detail lookups join company, project, and invitor names
//! - Listings are scoped to the requesting company

use sqlx::PgPool;

use bugtrail_core::roles::{ROLE_ADMIN, ROLE_SUBMITTER};
use bugtrail_core::types::DbId;
use bugtrail_db::models::company::CreateCompany;
use bugtrail_db::models::invite::CreateInvite;
use bugtrail_db::models::project::CreateProject;
use bugtrail_db::models::user::CreateUser;
use bugtrail_db::repositories::{
    CompanyRepo, InviteRepo, LookupRepo, ProjectRepo, RoleRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a company with one admin, returning `(company_id, admin_id)`.
async fn seed_company(pool: &PgPool, name: &str, admin_email: &str) -> (DbId, DbId) {
    let company = CompanyRepo::create(
        pool,
        &CreateCompany {
            name: name.to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    let admin_role = RoleRepo::find_by_name(pool, ROLE_ADMIN)
        .await
        .unwrap()
        .unwrap();
    let admin = UserRepo::create(
        pool,
        &CreateUser {
            company_id: company.id,
            role_id: admin_role.id,
            email: admin_email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
        },
    )
    .await
    .unwrap();

    (company.id, admin.id)
}

fn new_invite(company_id: DbId, invitor_id: DbId, email: &str) -> CreateInvite {
    CreateInvite {
        company_id,
        project_id: None,
        invitor_id,
        invitee_email: email.to_string(),
        invitee_first_name: "Nina".to_string(),
        invitee_last_name: "Newhire".to_string(),
        message: Some("Welcome aboard".to_string()),
    }
}

/// Shift an invite's issue date into the past by a Postgres interval.
async fn backdate_invite(pool: &PgPool, id: DbId, interval: &str) {
    let query = format!("UPDATE invites SET invite_date = NOW() - INTERVAL '{interval}' WHERE id = $1");
    sqlx::query(&query).bind(id).execute(pool).await.unwrap();
}

// ---------------------------------------------------------------------------
// Test: Issuing
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_create_issues_valid_token(pool: PgPool) {
    let (company_id, admin_id) = seed_company(&pool, "Acme", "ada@acme.test").await;

    let invite = InviteRepo::create(&pool, &new_invite(company_id, admin_id, "nina@example.test"))
        .await
        .unwrap();

    assert!(invite.is_valid);
    assert!(invite.invitee_id.is_none());
    assert!(invite.join_date.is_none());
    assert!(InviteRepo::validate_token(&pool, invite.company_token)
        .await
        .unwrap());
}

#[sqlx::test]
async fn test_tokens_are_unique_per_invite(pool: PgPool) {
    let (company_id, admin_id) = seed_company(&pool, "Acme", "ada@acme.test").await;

    let a = InviteRepo::create(&pool, &new_invite(company_id, admin_id, "a@example.test"))
        .await
        .unwrap();
    let b = InviteRepo::create(&pool, &new_invite(company_id, admin_id, "b@example.test"))
        .await
        .unwrap();

    assert_ne!(a.company_token, b.company_token);
}

// ---------------------------------------------------------------------------
// Test: Redemption
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_accept_is_one_shot(pool: PgPool) {
    let (company_id, admin_id) = seed_company(&pool, "Acme", "ada@acme.test").await;
    let invite = InviteRepo::create(&pool, &new_invite(company_id, admin_id, "nina@example.test"))
        .await
        .unwrap();

    let submitter_role = RoleRepo::find_by_name(&pool, ROLE_SUBMITTER)
        .await
        .unwrap()
        .unwrap();
    let invitee = UserRepo::create(
        &pool,
        &CreateUser {
            company_id,
            role_id: submitter_role.id,
            email: "nina@example.test".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Nina".to_string(),
            last_name: "Newhire".to_string(),
        },
    )
    .await
    .unwrap();

    let redeemed = InviteRepo::accept(&pool, invite.company_token, invitee.id, company_id)
        .await
        .unwrap();
    assert!(redeemed);

    let detail = InviteRepo::find_by_id(&pool, invite.id, company_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!detail.is_valid);
    assert_eq!(detail.invitee_id, Some(invitee.id));
    assert!(detail.join_date.is_some());

    // A consumed token cannot be redeemed again.
    let again = InviteRepo::accept(&pool, invite.company_token, invitee.id, company_id)
        .await
        .unwrap();
    assert!(!again);
}

#[sqlx::test]
async fn test_cancel_invalidates_token(pool: PgPool) {
    let (company_id, admin_id) = seed_company(&pool, "Acme", "ada@acme.test").await;
    let invite = InviteRepo::create(&pool, &new_invite(company_id, admin_id, "nina@example.test"))
        .await
        .unwrap();

    InviteRepo::cancel(&pool, invite.id, company_id)
        .await
        .unwrap();

    assert!(!InviteRepo::validate_token(&pool, invite.company_token)
        .await
        .unwrap());
}

#[sqlx::test]
async fn test_cancel_missing_invite_is_noop(pool: PgPool) {
    let (company_id, _) = seed_company(&pool, "Acme", "ada@acme.test").await;
    InviteRepo::cancel(&pool, 9999, company_id).await.unwrap();
}

// ---------------------------------------------------------------------------
// Test: Expiry window
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_invite_within_seven_days_is_valid(pool: PgPool) {
    let (company_id, admin_id) = seed_company(&pool, "Acme", "ada@acme.test").await;
    let invite = InviteRepo::create(&pool, &new_invite(company_id, admin_id, "nina@example.test"))
        .await
        .unwrap();

    backdate_invite(&pool, invite.id, "6 days 23 hours").await;

    assert!(InviteRepo::validate_token(&pool, invite.company_token)
        .await
        .unwrap());
}

#[sqlx::test]
async fn test_invite_older_than_seven_days_is_rejected(pool: PgPool) {
    let (company_id, admin_id) = seed_company(&pool, "Acme", "ada@acme.test").await;
    let invite = InviteRepo::create(&pool, &new_invite(company_id, admin_id, "nina@example.test"))
        .await
        .unwrap();

    backdate_invite(&pool, invite.id, "8 days").await;

    // Still flagged valid, but outside the window.
    assert!(!InviteRepo::validate_token(&pool, invite.company_token)
        .await
        .unwrap());
}

#[sqlx::test]
async fn test_unknown_token_is_rejected(pool: PgPool) {
    seed_company(&pool, "Acme", "ada@acme.test").await;
    assert!(!InviteRepo::validate_token(&pool, uuid::Uuid::new_v4())
        .await
        .unwrap());
}

// ---------------------------------------------------------------------------
// Test: Lookups and listings
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_find_detail_joins_related_names(pool: PgPool) {
    let (company_id, admin_id) = seed_company(&pool, "Acme", "ada@acme.test").await;
    let priorities = LookupRepo::project_priorities(&pool).await.unwrap();
    let project = ProjectRepo::create(
        &pool,
        &CreateProject {
            company_id,
            name: "Apollo".to_string(),
            description: "Launch tooling".to_string(),
            priority_id: priorities[0].id,
            start_date: chrono::Utc::now(),
            end_date: chrono::Utc::now() + chrono::Duration::days(30),
        },
    )
    .await
    .unwrap();

    let mut input = new_invite(company_id, admin_id, "nina@example.test");
    input.project_id = Some(project.id);
    let invite = InviteRepo::create(&pool, &input).await.unwrap();

    let detail = InviteRepo::find_detail(
        &pool,
        invite.company_token,
        "nina@example.test",
        company_id,
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(detail.company_name, "Acme");
    assert_eq!(detail.project_name.as_deref(), Some("Apollo"));
    assert_eq!(detail.invitor_name, "Ada Admin");

    // The (token, email) pair must match exactly.
    let wrong_email = InviteRepo::find_detail(
        &pool,
        invite.company_token,
        "other@example.test",
        company_id,
    )
    .await
    .unwrap();
    assert!(wrong_email.is_none());
}

#[sqlx::test]
async fn test_list_by_company_is_scoped(pool: PgPool) {
    let (acme_id, acme_admin) = seed_company(&pool, "Acme", "ada@acme.test").await;
    let (other_id, other_admin) = seed_company(&pool, "Globex", "gus@globex.test").await;

    InviteRepo::create(&pool, &new_invite(acme_id, acme_admin, "one@example.test"))
        .await
        .unwrap();
    InviteRepo::create(&pool, &new_invite(acme_id, acme_admin, "two@example.test"))
        .await
        .unwrap();
    InviteRepo::create(&pool, &new_invite(other_id, other_admin, "three@example.test"))
        .await
        .unwrap();

    let invites = InviteRepo::list_by_company(&pool, acme_id).await.unwrap();
    assert_eq!(invites.len(), 2);
    assert!(invites.iter().all(|i| i.company_id == acme_id));
}
