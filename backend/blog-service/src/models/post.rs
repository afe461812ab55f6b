use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use super::{truncate_chars, DISPLAY_LEN};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub text: String,
    /// Publication moment; a future value schedules the post.
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(truncate_chars(&self.title, DISPLAY_LEN))
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
}

/// Author-editable fields. Replaces all of them at once.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
}

impl PostChanges {
    pub fn apply(self, post: &mut Post) {
        post.title = self.title;
        post.text = self.text;
        post.pub_date = self.pub_date;
        post.image = self.image;
        post.category_id = self.category_id;
        post.location_id = self.location_id;
    }
}

/// Staff edits from the post listing. `None` leaves a field untouched;
/// `Some(None)` clears a nullable reference.
#[derive(Debug, Clone, Default)]
pub struct PostModeration {
    pub pub_date: Option<DateTime<Utc>>,
    pub category_id: Option<Option<i64>>,
    pub location_id: Option<Option<i64>>,
    pub is_published: Option<bool>,
}

impl PostModeration {
    pub fn apply(self, post: &mut Post) {
        if let Some(pub_date) = self.pub_date {
            post.pub_date = pub_date;
        }
        if let Some(category_id) = self.category_id {
            post.category_id = category_id;
        }
        if let Some(location_id) = self.location_id {
            post.location_id = location_id;
        }
        if let Some(is_published) = self.is_published {
            post.is_published = is_published;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorRef {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRef {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationRef {
    pub id: i64,
    pub name: String,
    pub is_published: bool,
}

/// Post joined with its author, category and location plus the number of
/// comments. This is what listings and the detail page return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetails {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub author: AuthorRef,
    pub category: Option<CategoryRef>,
    pub location: Option<LocationRef>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub comment_count: i64,
}

impl PostDetails {
    /// Visible to everyone: published, in a published category (or none),
    /// and not scheduled for later than `now`.
    pub fn is_public_at(&self, now: DateTime<Utc>) -> bool {
        self.is_published
            && self.category.as_ref().map_or(true, |c| c.is_published)
            && self.pub_date <= now
    }

    /// Unpublished locations are not shown on pages.
    pub fn without_hidden_location(mut self) -> Self {
        if matches!(&self.location, Some(loc) if !loc.is_published) {
            self.location = None;
        }
        self
    }
}

impl fmt::Display for PostDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(truncate_chars(&self.title, DISPLAY_LEN))
    }
}
