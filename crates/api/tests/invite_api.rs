//! HTTP-level integration tests for the invite endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, get_auth, mint_token, post_json_auth};
use sqlx::PgPool;

use bugtrail_core::roles::{ROLE_ADMIN, ROLE_DEVELOPER};

/// Admins can issue an invite; the response carries the fresh token.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_invite_as_admin(pool: PgPool) {
    let company_id = common::seed_company(&pool, "Acme").await;
    let admin = common::seed_user(&pool, company_id, ROLE_ADMIN, "ada@acme.test").await;
    let token = mint_token(&admin, ROLE_ADMIN);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "invitee_email": "nina@acme.test",
        "invitee_first_name": "Nina",
        "invitee_last_name": "Newhire",
    });
    let response = post_json_auth(app, "/api/v1/invites", &token, body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["invitee_email"], "nina@acme.test");
    assert_eq!(json["is_valid"], true);
    assert!(json["company_token"].is_string());
}

/// Non-admins cannot issue invites.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_invite_requires_admin(pool: PgPool) {
    let company_id = common::seed_company(&pool, "Acme").await;
    let dev = common::seed_user(&pool, company_id, ROLE_DEVELOPER, "dev@acme.test").await;
    let token = mint_token(&dev, ROLE_DEVELOPER);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "invitee_email": "nina@acme.test",
        "invitee_first_name": "Nina",
        "invitee_last_name": "Newhire",
    });
    let response = post_json_auth(app, "/api/v1/invites", &token, body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Inviting an address that already has an account returns 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_invite_existing_email_conflicts(pool: PgPool) {
    let company_id = common::seed_company(&pool, "Acme").await;
    let admin = common::seed_user(&pool, company_id, ROLE_ADMIN, "ada@acme.test").await;
    common::seed_user(&pool, company_id, ROLE_DEVELOPER, "dev@acme.test").await;
    let token = mint_token(&admin, ROLE_ADMIN);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "invitee_email": "dev@acme.test",
        "invitee_first_name": "Already",
        "invitee_last_name": "Here",
    });
    let response = post_json_auth(app, "/api/v1/invites", &token, body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// A malformed invitee email is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_invite_bad_email_rejected(pool: PgPool) {
    let company_id = common::seed_company(&pool, "Acme").await;
    let admin = common::seed_user(&pool, company_id, ROLE_ADMIN, "ada@acme.test").await;
    let token = mint_token(&admin, ROLE_ADMIN);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "invitee_email": "not-an-email",
        "invitee_first_name": "Nina",
        "invitee_last_name": "Newhire",
    });
    let response = post_json_auth(app, "/api/v1/invites", &token, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// The public validate endpoint reports a fresh token as redeemable and a
/// cancelled one as not.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_validate_reflects_cancellation(pool: PgPool) {
    let company_id = common::seed_company(&pool, "Acme").await;
    let admin = common::seed_user(&pool, company_id, ROLE_ADMIN, "ada@acme.test").await;
    let token = mint_token(&admin, ROLE_ADMIN);

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "invitee_email": "nina@acme.test",
        "invitee_first_name": "Nina",
        "invitee_last_name": "Newhire",
    });
    let response = post_json_auth(app, "/api/v1/invites", &token, body).await;
    let created = body_json(response).await;
    let invite_id = created["id"].as_i64().unwrap();
    let invite_token = created["company_token"].as_str().unwrap().to_string();

    // No auth header needed for validation.
    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/invites/validate?token={invite_token}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["valid"], true);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/invites/{invite_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/invites/validate?token={invite_token}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["valid"], false);
}

/// An unknown token validates to false rather than erroring.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_validate_unknown_token_false(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = uuid::Uuid::new_v4();
    let response = get(app, &format!("/api/v1/invites/validate?token={token}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["valid"], false);
}

/// Listings only show the caller's company; detail rows carry joined names.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_scoped_to_company(pool: PgPool) {
    let acme_id = common::seed_company(&pool, "Acme").await;
    let acme_admin = common::seed_user(&pool, acme_id, ROLE_ADMIN, "ada@acme.test").await;
    let other_id = common::seed_company(&pool, "Globex").await;
    let other_admin = common::seed_user(&pool, other_id, ROLE_ADMIN, "hank@globex.test").await;

    let acme_token = mint_token(&acme_admin, ROLE_ADMIN);
    let other_token = mint_token(&other_admin, ROLE_ADMIN);

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "invitee_email": "nina@acme.test",
        "invitee_first_name": "Nina",
        "invitee_last_name": "Newhire",
    });
    let response = post_json_auth(app, "/api/v1/invites", &acme_token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/invites", &acme_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["company_name"], "Acme");
    assert_eq!(listed[0]["invitor_name"], "Test User");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/invites", &other_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);
}
