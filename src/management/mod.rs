mod auth;

pub use auth::TokenCacheError;
pub use auth::TokenManager;
