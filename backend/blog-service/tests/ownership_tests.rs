#[macro_use]
mod common;

use actix_web::{http::header, http::StatusCode, test};
use serde_json::{json, Value};

use blog_service::pagination::PageRequest;
use blog_service::repository::PostFilter;
use common::PostSeed;

#[actix_rt::test]
async fn anonymous_mutation_points_to_login() {
    let state = common::state();
    let travel = common::category(&state, "travel", true).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .set_json(json!({ "title": "Hi", "text": "body", "category": travel.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["login_url"], "/api/v1/auth/login");
}

#[actix_rt::test]
async fn malformed_token_is_rejected_even_on_public_pages() {
    let state = common::state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/1")
        .insert_header(common::bearer("not-a-jwt"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_rt::test]
async fn author_creates_post_with_default_pub_date() {
    let state = common::state();
    let (_, token) = common::user(&state, "leo", false).await;
    let travel = common::category(&state, "travel", true).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(common::bearer(&token))
        .set_json(json!({ "title": "Volcanoes", "text": "Hot", "category": travel.id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["author"]["username"], "leo");
    assert_eq!(body["category"]["slug"], "travel");
    assert!(body["pub_date"].is_string());
}

#[actix_rt::test]
async fn create_post_rejects_unknown_category_and_blank_fields() {
    let state = common::state();
    let (_, token) = common::user(&state, "leo", false).await;
    let travel = common::category(&state, "travel", true).await;
    let app = init_app!(state);

    let payloads = [
        json!({ "title": "Trip", "text": "body", "category": travel.id + 100 }),
        json!({ "title": "", "text": "body", "category": travel.id }),
        json!({ "title": "   ", "text": "  ", "category": travel.id }),
        json!({ "title": "Trip", "text": "\n\t ", "category": travel.id }),
        json!({ "title": "Trip", "text": "body" }),
    ];
    for payload in payloads {
        let req = test::TestRequest::post()
            .uri("/api/v1/posts")
            .insert_header(common::bearer(&token))
            .set_json(&payload)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST,
            "{}",
            payload
        );
    }

    let first_page = PageRequest::new(None, 10).unwrap();
    let (items, total) = state
        .repo
        .list_posts(&PostFilter::default(), first_page)
        .await
        .unwrap();
    assert!(items.is_empty());
    assert_eq!(total, 0);
}

#[actix_rt::test]
async fn blank_comment_is_rejected() {
    let state = common::state();
    let (author, token) = common::user(&state, "leo", false).await;
    let post = common::post(&state, author.id, PostSeed::new("Trip")).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/comments", post.id))
        .insert_header(common::bearer(&token))
        .set_json(json!({ "text": "   " }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_rt::test]
async fn only_author_can_edit_post() {
    let state = common::state();
    let (author, author_token) = common::user(&state, "leo", false).await;
    let (_, other_token) = common::user(&state, "anna", false).await;
    let travel = common::category(&state, "travel", true).await;
    let post = common::post(&state, author.id, PostSeed::new("Trip").in_category(travel.id)).await;
    let app = init_app!(state);

    let uri = format!("/api/v1/posts/{}", post.id);
    let payload = json!({ "title": "Edited", "text": "new", "category": travel.id });

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(common::bearer(&other_token))
        .set_json(&payload)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(common::bearer(&author_token))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Edited");
}

#[actix_rt::test]
async fn deleting_post_removes_its_comments() {
    let state = common::state();
    let (author, token) = common::user(&state, "leo", false).await;
    let post = common::post(&state, author.id, PostSeed::new("Trip")).await;
    let comment_id = common::comment(&state, post.id, author.id, "note").await;
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .insert_header(common::bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    assert!(state.repo.find_post(post.id).await.unwrap().is_none());
    assert!(state.repo.find_comment(comment_id).await.unwrap().is_none());
}

#[actix_rt::test]
async fn other_users_cannot_delete_post() {
    let state = common::state();
    let (author, _) = common::user(&state, "leo", false).await;
    let (_, other_token) = common::user(&state, "anna", false).await;
    let post = common::post(&state, author.id, PostSeed::new("Trip")).await;
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/posts/{}", post.id))
        .insert_header(common::bearer(&other_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
    assert!(state.repo.find_post(post.id).await.unwrap().is_some());
}

#[actix_rt::test]
async fn reader_comments_on_public_post() {
    let state = common::state();
    let (author, _) = common::user(&state, "leo", false).await;
    let (_, reader_token) = common::user(&state, "anna", false).await;
    let post = common::post(&state, author.id, PostSeed::new("Trip")).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/comments", post.id))
        .insert_header(common::bearer(&reader_token))
        .set_json(json!({ "text": "Lovely" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["author"]["username"], "anna");
    assert_eq!(body["post_title"], "Trip");
}

#[actix_rt::test]
async fn cannot_comment_on_hidden_post_of_someone_else() {
    let state = common::state();
    let (author, author_token) = common::user(&state, "leo", false).await;
    let (_, reader_token) = common::user(&state, "anna", false).await;
    let post = common::post(&state, author.id, PostSeed::new("Soon").scheduled(10)).await;
    let app = init_app!(state);

    let uri = format!("/api/v1/posts/{}/comments", post.id);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(common::bearer(&reader_token))
        .set_json(json!({ "text": "early" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(common::bearer(&author_token))
        .set_json(json!({ "text": "note to self" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );
}

#[actix_rt::test]
async fn comment_edits_require_author_and_matching_post() {
    let state = common::state();
    let (author, _) = common::user(&state, "leo", false).await;
    let (commenter, commenter_token) = common::user(&state, "anna", false).await;
    let (_, other_token) = common::user(&state, "ivan", false).await;
    let post = common::post(&state, author.id, PostSeed::new("Trip")).await;
    let other_post = common::post(&state, author.id, PostSeed::new("Other")).await;
    let comment_id = common::comment(&state, post.id, commenter.id, "first").await;
    let app = init_app!(state);

    let edit = |post_id: i64, token: &str| {
        test::TestRequest::put()
            .uri(&format!("/api/v1/posts/{}/comments/{}", post_id, comment_id))
            .insert_header(common::bearer(token))
            .set_json(json!({ "text": "edited" }))
            .to_request()
    };

    let resp = test::call_service(&app, edit(post.id, &other_token)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, edit(other_post.id, &commenter_token)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, edit(post.id, &commenter_token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["text"], "edited");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/posts/{}/comments/{}", post.id, comment_id))
        .insert_header(common::bearer(&commenter_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );
    assert!(state.repo.find_comment(comment_id).await.unwrap().is_none());
}

#[actix_rt::test]
async fn other_users_cannot_delete_comment() {
    let state = common::state();
    let (author, _) = common::user(&state, "leo", false).await;
    let (commenter, _) = common::user(&state, "anna", false).await;
    let (_, other_token) = common::user(&state, "ivan", false).await;
    let post = common::post(&state, author.id, PostSeed::new("Trip")).await;
    let comment_id = common::comment(&state, post.id, commenter.id, "mine").await;
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/posts/{}/comments/{}", post.id, comment_id))
        .insert_header(common::bearer(&other_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let stored = state.repo.find_comment(comment_id).await.unwrap();
    assert_eq!(stored.map(|c| c.text), Some("mine".to_string()));
}
