/// Request payloads and their validation rules
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

// Hardcoded patterns; a failure here is a programming error.
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("hardcoded username regex is invalid"));

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("hardcoded slug regex is invalid"));

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Required text fields must carry something besides whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, max = 256), custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,
    /// Defaults to the moment of submission
    pub pub_date: Option<DateTime<Utc>>,
    pub category: i64,
    pub location: Option<i64>,
    #[validate(length(max = 512))]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserEditForm {
    #[validate(length(min = 1, max = 150), regex(path = *USERNAME_RE))]
    pub username: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub first_name: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegistrationForm {
    #[validate(length(min = 1, max = 150), regex(path = *USERNAME_RE))]
    pub username: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub first_name: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 256), custom(function = "validate_not_blank"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 64), regex(path = *SLUG_RE))]
    pub slug: String,
    #[serde(default = "published_by_default")]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CategoryPatch {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 64), regex(path = *SLUG_RE))]
    pub slug: Option<String>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LocationForm {
    #[validate(length(min = 1, max = 256), custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default = "published_by_default")]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LocationPatch {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,
    pub is_published: Option<bool>,
}

/// Fields staff may change straight from the post listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostModerationForm {
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<i64>>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminPostQuery {
    pub search: Option<String>,
    pub category: Option<i64>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminCommentQuery {
    pub author: Option<i64>,
    pub post: Option<i64>,
    pub page: Option<String>,
}

fn published_by_default() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_overlong_title() {
        let form: PostForm = serde_json::from_value(json!({
            "title": "x".repeat(257),
            "text": "body",
            "category": 1
        }))
        .unwrap();
        assert!(form.validate().is_err());
    }

    #[test]
    fn whitespace_only_text_is_blank() {
        let post: PostForm = serde_json::from_value(json!({
            "title": "   ",
            "text": "  \n\t",
            "category": 1
        }))
        .unwrap();
        let errors = post.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("text"));

        let comment = CommentForm {
            text: " ".to_string(),
        };
        assert!(comment.validate().is_err());

        let comment = CommentForm {
            text: " fine ".to_string(),
        };
        assert!(comment.validate().is_ok());
    }

    #[test]
    fn username_allows_word_chars_and_symbols() {
        let mut form = UserEditForm {
            username: "leo.t+blog@home-1".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: None,
        };
        assert!(form.validate().is_ok());

        form.username = "leo tolstoy".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn slug_pattern_is_enforced() {
        let form: CategoryForm = serde_json::from_value(json!({
            "title": "Travel",
            "slug": "travel/notes"
        }))
        .unwrap();
        assert!(form.is_published);
        assert!(form.validate().is_err());
    }

    #[test]
    fn moderation_distinguishes_null_from_missing() {
        let form: PostModerationForm =
            serde_json::from_value(json!({ "category": null, "is_published": false })).unwrap();
        assert_eq!(form.category, Some(None));
        assert_eq!(form.location, None);
        assert_eq!(form.is_published, Some(false));
    }
}
