#[macro_use]
mod helpers;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use serde_json::{json, Value};

use helpers::*;
use melody::models::user_models::{NewUser, Role};
use melody::store::CatalogStore;

#[actix_web::test]
async fn health_is_public() {
    let h = Harness::new();
    let app = test_app!(h);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "OK");
}

#[actix_web::test]
async fn anonymous_callers_are_rejected_with_401() {
    let h = Harness::new();
    let app = test_app!(h);

    for uri in ["/api/playlists", "/api/favorites", "/api/users/me", "/api/admin/users", "/api/artist/uploads", "/api/stats"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");

        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].as_str().unwrap().contains("must be logged in"), "{uri}");
    }
}

#[actix_web::test]
async fn forged_or_inactive_tokens_count_as_anonymous() {
    let h = Harness::new();
    let app = test_app!(h);

    let attempts = [
        (header::AUTHORIZATION, "Bearer not.a.token".to_string()),
        (header::AUTHORIZATION, "Token abc".to_string()),
        bearer_for_session("sess_unknown"),
        bearer_for_session("sess_revoked"),
    ];
    for auth in attempts {
        let req = test::TestRequest::get().uri("/api/playlists").insert_header(auth).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_web::test]
async fn admin_check_answers_200_for_everyone() {
    let h = Harness::new();
    let app = test_app!(h);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/admin/check").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "admin": false }));

    for (auth, expected) in [
        (bearer(FAN), false),
        (bearer(ADMIN), true),
        (bearer_for_session("sess_revoked"), false),
    ] {
        let req = test::TestRequest::get().uri("/api/admin/check").insert_header(auth).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["admin"], expected);
    }
}

#[actix_web::test]
async fn non_admins_are_forbidden_from_admin_and_artist_routes() {
    let h = Harness::new();
    let app = test_app!(h);

    let req = test::TestRequest::get().uri("/api/admin/users").insert_header(bearer(FAN)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Unauthorized - admin only");

    let req = test::TestRequest::get().uri("/api/artist/uploads").insert_header(bearer(FAN)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Artists are not admins either.
    let req = test::TestRequest::get().uri("/api/admin/songs/pending").insert_header(bearer(ARTIST)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get().uri("/api/artist/uploads").insert_header(bearer(ARTIST)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn stored_role_is_the_only_authority() {
    let h = Harness::new();
    let app = test_app!(h);

    let req = test::TestRequest::get().uri("/api/admin/users").insert_header(bearer(ADMIN)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // Demote the admin directly; the matching email must not win it back.
    let admin = h.store.find_user_by_clerk_id(ADMIN).unwrap().unwrap();
    assert_eq!(admin.role, Some(Role::Admin));
    h.store.set_user_role(&admin.id, Role::User).unwrap();

    let req = test::TestRequest::get().uri("/api/admin/users").insert_header(bearer(ADMIN)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get().uri("/api/admin/check").insert_header(bearer(ADMIN)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["admin"], false);
}

#[actix_web::test]
async fn legacy_user_without_role_is_backfilled_from_email() {
    let h = Harness::new();
    let mut legacy = NewUser::new(ADMIN, "Legacy Admin".into(), String::new(), Role::User);
    legacy.role = None;
    h.store.upsert_user(legacy).unwrap();
    let app = test_app!(h);

    let req = test::TestRequest::get().uri("/api/admin/check").insert_header(bearer(ADMIN)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["admin"], true);

    let stored = h.store.find_user_by_clerk_id(ADMIN).unwrap().unwrap();
    assert_eq!(stored.role, Some(Role::Admin));
    assert_eq!(h.store.list_users().unwrap().len(), 2);
}

#[actix_web::test]
async fn unknown_profile_cannot_pass_a_role_gate() {
    let mut identity = FakeIdentity::new();
    identity.add_session("sess_ghost", "user_ghost", "active");
    let h = Harness::with_identity(identity);
    let app = test_app!(h);

    let req = test::TestRequest::get()
        .uri("/api/admin/users")
        .insert_header(bearer_for_session("sess_ghost"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User not found. Please sign in again.");

    let req = test::TestRequest::get()
        .uri("/api/admin/check")
        .insert_header(bearer_for_session("sess_ghost"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["admin"], false);
}

#[actix_web::test]
async fn admin_changes_roles_and_rejects_unknown_ones() {
    let h = Harness::new();
    let app = test_app!(h);

    // First sight of the fan creates a plain user.
    let req = test::TestRequest::get().uri("/api/admin/check").insert_header(bearer(FAN)).to_request();
    test::call_service(&app, req).await;
    let fan = h.store.find_user_by_clerk_id(FAN).unwrap().unwrap();
    assert_eq!(fan.role, Some(Role::User));

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/users/{}", fan.id))
        .insert_header(bearer(ADMIN))
        .set_json(json!({ "role": "superstar" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid role");

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/users/{}", fan.id))
        .insert_header(bearer(ADMIN))
        .set_json(json!({ "role": "artist" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["role"], "artist");

    let req = test::TestRequest::get()
        .uri(&format!("/api/admin/users/{}", fan.id))
        .insert_header(bearer(ADMIN))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["clerkId"], FAN);

    let req = test::TestRequest::get().uri("/api/artist/uploads").insert_header(bearer(FAN)).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri("/api/admin/users/missing")
        .insert_header(bearer(ADMIN))
        .set_json(json!({ "role": "user" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/users/{}", fan.id))
        .insert_header(bearer(ADMIN))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert!(h.store.find_user(&fan.id).unwrap().is_none());
}

#[actix_web::test]
async fn auth_callback_upserts_and_seeds_role() {
    let h = Harness::new();
    let app = test_app!(h);

    let req = test::TestRequest::post()
        .uri("/api/auth/callback")
        .set_json(json!({ "firstName": "Ada" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User ID is required");

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/auth/callback")
            .set_json(json!({ "id": NEWCOMER, "firstName": "New", "lastName": "Comer" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "success": true, "user": { "role": "user" } }));
    }

    let req = test::TestRequest::post()
        .uri("/api/auth/callback")
        .set_json(json!({ "id": ADMIN }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["role"], "admin");

    let newcomer = h.store.find_user_by_clerk_id(NEWCOMER).unwrap().unwrap();
    assert_eq!(newcomer.full_name, "New Comer");
    let admin = h.store.find_user_by_clerk_id(ADMIN).unwrap().unwrap();
    assert_eq!(admin.full_name, "User");
    // Artist seeded by the harness plus the two callbacks.
    assert_eq!(h.store.list_users().unwrap().len(), 3);
}

#[actix_web::test]
async fn malformed_json_is_a_validation_error() {
    let h = Harness::new();
    let app = test_app!(h);

    let req = test::TestRequest::post()
        .uri("/api/playlists")
        .insert_header(bearer(FAN))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[actix_web::test]
async fn unknown_routes_answer_json_404() {
    let h = Harness::new();
    let app = test_app!(h);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/nope").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Not Found");
}
