#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use common::PostSeed;

#[actix_rt::test]
async fn owner_sees_every_post_and_email() {
    let state = common::state();
    let (author, token) = common::user(&state, "leo", false).await;
    common::post(&state, author.id, PostSeed::new("Public")).await;
    common::post(&state, author.id, PostSeed::new("Draft").unpublished()).await;
    common::post(&state, author.id, PostSeed::new("Scheduled").scheduled(6)).await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/profile/leo")
        .insert_header(common::bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["posts"]["total_count"], 3);
    assert_eq!(body["profile"]["email"], "leo@example.com");
}

#[actix_rt::test]
async fn visitors_see_public_posts_only() {
    let state = common::state();
    let (author, _) = common::user(&state, "leo", false).await;
    let (_, visitor_token) = common::user(&state, "anna", false).await;
    common::post(&state, author.id, PostSeed::new("Public")).await;
    common::post(&state, author.id, PostSeed::new("Draft").unpublished()).await;
    let app = init_app!(state);

    let anonymous = test::TestRequest::get().uri("/api/v1/profile/leo").to_request();
    let body: Value = test::call_and_read_body_json(&app, anonymous).await;
    assert_eq!(body["posts"]["total_count"], 1);
    assert!(body["profile"].get("email").is_none());

    let visitor = test::TestRequest::get()
        .uri("/api/v1/profile/leo")
        .insert_header(common::bearer(&visitor_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, visitor).await;
    assert_eq!(body["posts"]["items"][0]["title"], "Public");
    assert_eq!(body["posts"]["total_count"], 1);
}

#[actix_rt::test]
async fn unknown_profile_is_not_found() {
    let state = common::state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/v1/profile/ghost").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_rt::test]
async fn edit_profile_updates_own_account() {
    let state = common::state();
    let (user, token) = common::user(&state, "leo", false).await;
    let app = init_app!(state);

    let req = test::TestRequest::put()
        .uri("/api/v1/profile")
        .insert_header(common::bearer(&token))
        .set_json(json!({
            "username": "leo.tolstoy",
            "first_name": "Leo",
            "last_name": "Tolstoy",
            "email": "leo@yasnaya.ru"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "leo.tolstoy");

    let stored = state.repo.find_user_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.first_name, "Leo");
    assert_eq!(stored.email, "leo@yasnaya.ru");
}

#[actix_rt::test]
async fn edit_profile_keeps_usernames_unique() {
    let state = common::state();
    common::user(&state, "anna", false).await;
    let (_, token) = common::user(&state, "leo", false).await;
    let app = init_app!(state);

    let req = test::TestRequest::put()
        .uri("/api/v1/profile")
        .insert_header(common::bearer(&token))
        .set_json(json!({ "username": "anna" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );

    let req = test::TestRequest::put()
        .uri("/api/v1/profile")
        .insert_header(common::bearer(&token))
        .set_json(json!({ "username": "has space" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}
