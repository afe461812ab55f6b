//! Shared fixtures for HTTP integration tests.
//!
//! Every test gets its own in-memory repository, so tests never share data.
#![allow(dead_code)]

use actix_web::http::header;
use chrono::{Duration, Utc};

use blog_service::config::Config;
use blog_service::models::{
    Category, Location, NewCategory, NewLocation, NewPost, NewUser, Post, PostModeration, User,
};
use blog_service::AppState;

/// Build the full application around `state`.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .configure(blog_service::routes::configure),
        )
        .await
    };
}

pub fn state() -> AppState {
    AppState::in_memory(Config::for_memory())
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Create an account directly in storage and issue a token for it.
pub async fn user(state: &AppState, username: &str, is_staff: bool) -> (User, String) {
    let user = state
        .repo
        .create_user(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: "not-a-real-hash".to_string(),
            is_staff,
        })
        .await
        .expect("create user");
    let token = state.jwt.issue(user.id, &user.username).expect("issue token");
    (user, token)
}

pub async fn category(state: &AppState, slug: &str, is_published: bool) -> Category {
    state
        .repo
        .create_category(NewCategory {
            title: slug.to_uppercase(),
            description: format!("{} posts", slug),
            slug: slug.to_string(),
            is_published,
        })
        .await
        .expect("create category")
}

pub async fn location(state: &AppState, name: &str, is_published: bool) -> Location {
    state
        .repo
        .create_location(NewLocation {
            name: name.to_string(),
            is_published,
        })
        .await
        .expect("create location")
}

/// Builder-style options for seeding a post.
pub struct PostSeed {
    pub title: String,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub hours_from_now: i64,
    pub is_published: bool,
}

impl PostSeed {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            category_id: None,
            location_id: None,
            hours_from_now: -1,
            is_published: true,
        }
    }

    pub fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn at_location(mut self, location_id: i64) -> Self {
        self.location_id = Some(location_id);
        self
    }

    pub fn scheduled(mut self, hours_from_now: i64) -> Self {
        self.hours_from_now = hours_from_now;
        self
    }

    pub fn unpublished(mut self) -> Self {
        self.is_published = false;
        self
    }
}

pub async fn post(state: &AppState, author_id: i64, seed: PostSeed) -> Post {
    let post = state
        .repo
        .create_post(NewPost {
            title: seed.title,
            text: "Some text".to_string(),
            pub_date: Utc::now() + Duration::hours(seed.hours_from_now),
            image: None,
            author_id,
            category_id: seed.category_id,
            location_id: seed.location_id,
        })
        .await
        .expect("create post");

    if seed.is_published {
        return post;
    }

    state
        .repo
        .moderate_post(
            post.id,
            PostModeration {
                is_published: Some(false),
                ..Default::default()
            },
        )
        .await
        .expect("unpublish post")
}

pub async fn comment(state: &AppState, post_id: i64, author_id: i64, text: &str) -> i64 {
    state
        .repo
        .create_comment(post_id, author_id, text)
        .await
        .expect("create comment")
        .id
}
