#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use common::PostSeed;

#[actix_rt::test]
async fn non_staff_is_forbidden() {
    let state = common::state();
    let (_, token) = common::user(&state, "leo", false).await;
    let app = init_app!(state);

    for uri in [
        "/api/v1/admin/categories",
        "/api/v1/admin/locations",
        "/api/v1/admin/posts",
        "/api/v1/admin/comments",
    ] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(common::bearer(&token))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN,
            "{}",
            uri
        );
    }
}

#[actix_rt::test]
async fn staff_manages_categories() {
    let state = common::state();
    let (_, token) = common::user(&state, "admin", true).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/categories")
        .insert_header(common::bearer(&token))
        .set_json(json!({ "title": "Travel", "description": "Trips", "slug": "travel" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["is_published"], true);
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/categories")
        .insert_header(common::bearer(&token))
        .set_json(json!({ "title": "Again", "slug": "travel" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/admin/categories/{}", id))
        .insert_header(common::bearer(&token))
        .set_json(json!({ "is_published": false }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["is_published"], false);
    assert_eq!(updated["title"], "Travel");

    let req = test::TestRequest::get().uri("/api/v1/categories").to_request();
    let public: Value = test::call_and_read_body_json(&app, req).await;
    assert!(public.as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn deleting_category_keeps_posts() {
    let state = common::state();
    let (admin, token) = common::user(&state, "admin", true).await;
    let travel = common::category(&state, "travel", true).await;
    let post = common::post(&state, admin.id, PostSeed::new("Trip").in_category(travel.id)).await;
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/categories/{}", travel.id))
        .insert_header(common::bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let stored = state.repo.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored.category_id, None);
}

#[actix_rt::test]
async fn staff_manages_locations() {
    let state = common::state();
    let (_, token) = common::user(&state, "admin", true).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/locations")
        .insert_header(common::bearer(&token))
        .set_json(json!({ "name": "Kamchatka" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/admin/locations/{}", id))
        .insert_header(common::bearer(&token))
        .set_json(json!({ "name": "Kamchatka Krai" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["name"], "Kamchatka Krai");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/locations/{}", id))
        .insert_header(common::bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/locations/{}", id))
        .insert_header(common::bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_rt::test]
async fn admin_post_list_searches_titles_across_visibility() {
    let state = common::state();
    let (admin, token) = common::user(&state, "admin", true).await;
    common::post(&state, admin.id, PostSeed::new("Volcano draft").unpublished()).await;
    common::post(&state, admin.id, PostSeed::new("Volcano later").scheduled(12)).await;
    common::post(&state, admin.id, PostSeed::new("Lake Baikal")).await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/posts?search=volcano")
        .insert_header(common::bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_count"], 2);
}

#[actix_rt::test]
async fn moderation_unpublishes_post() {
    let state = common::state();
    let (_, token) = common::user(&state, "admin", true).await;
    let (author, _) = common::user(&state, "leo", false).await;
    let post = common::post(&state, author.id, PostSeed::new("Trip")).await;
    let app = init_app!(state);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/admin/posts/{}", post.id))
        .insert_header(common::bearer(&token))
        .set_json(json!({ "is_published": false }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["is_published"], false);
    assert_eq!(body["author"]["id"], author.id);

    let req = test::TestRequest::get().uri("/api/v1/posts").to_request();
    let index: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(index["total_count"], 0);
}

#[actix_rt::test]
async fn staff_filters_and_removes_comments() {
    let state = common::state();
    let (_, token) = common::user(&state, "admin", true).await;
    let (leo, _) = common::user(&state, "leo", false).await;
    let (anna, _) = common::user(&state, "anna", false).await;
    let post = common::post(&state, leo.id, PostSeed::new("Trip")).await;
    common::comment(&state, post.id, leo.id, "by leo").await;
    let spam = common::comment(&state, post.id, anna.id, "spam").await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/admin/comments?author={}", anna.id))
        .insert_header(common::bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["items"][0]["text"], "spam");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/admin/comments/{}", spam))
        .insert_header(common::bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );
    assert!(state.repo.find_comment(spam).await.unwrap().is_none());
}
