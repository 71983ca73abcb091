/// Authentication: password hashing, JWT tokens, request identity

pub mod context;
pub mod jwt;
pub mod password;

pub use context::AuthContext;
pub use jwt::{create_token, validate_access_token, validate_token, Claims, JwtError, TokenType};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordError};
