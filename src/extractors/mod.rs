mod auth;

pub use auth::BearerToken;
