/// Storage layer
///
/// Services talk to [`BlogRepository`]; `PostgresBlogRepository` is the
/// production implementation and `InMemoryBlogRepository` backs local runs
/// and the test suite.
mod memory_repository;
mod postgres_repository;
mod r#trait;

pub use memory_repository::InMemoryBlogRepository;
pub use postgres_repository::PostgresBlogRepository;
pub use r#trait::{BlogRepository, CommentFilter, PostFilter};

/// Escape LIKE metacharacters and wrap the term for a substring match.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
