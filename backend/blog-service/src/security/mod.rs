/// Security primitives for blog-service
///
/// - password: Argon2id hashing and verification
/// - jwt: HS256 bearer tokens issued at login
pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtKeys};
pub use password::{hash_password, validate_password, verify_password};
