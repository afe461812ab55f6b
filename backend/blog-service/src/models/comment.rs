use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use super::{truncate_chars, AuthorRef, DISPLAY_LEN};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub post_id: i64,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with its author and the title of its post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDetails {
    pub id: i64,
    pub text: String,
    pub post_id: i64,
    pub post_title: String,
    pub author: AuthorRef,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for CommentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" (by {} on post \"{}\")",
            truncate_chars(&self.text, DISPLAY_LEN),
            self.author.username,
            self.post_title
        )
    }
}
