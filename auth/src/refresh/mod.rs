pub mod errors;
pub mod manager;

pub use errors::RefreshTokenError;
pub use manager::RefreshTokenManager;
