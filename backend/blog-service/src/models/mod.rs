/// Data models for blog-service
///
/// - User: accounts that write posts and comments
/// - Category / Location: reference data a post can point at
/// - Post: a publication, plus the joined `PostDetails` read view
/// - Comment: a remark on a post, plus the joined `CommentDetails` view
pub mod category;
pub mod comment;
pub mod location;
pub mod post;
pub mod user;

pub use category::{Category, CategoryChanges, NewCategory};
pub use comment::{Comment, CommentDetails};
pub use location::{Location, LocationChanges, NewLocation};
pub use post::{
    AuthorRef, CategoryRef, LocationRef, NewPost, Post, PostChanges, PostDetails, PostModeration,
};
pub use user::{NewUser, PublicProfile, User, UserChanges};

/// Characters kept when an entity is rendered as a short label.
pub const DISPLAY_LEN: usize = 30;

/// Cut `text` to at most `limit` characters without splitting a code point.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("short", 30), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("Привет, мир", 6), "Привет");
    }
}
