pub mod guard;
mod jwt;
pub mod models;
mod password;
mod service;

pub use guard::authenticate;
pub use jwt::{create_token, decode_token, extract_token, TOKEN_EXPIRY_HOURS};
pub use password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
pub use service::AuthService;
