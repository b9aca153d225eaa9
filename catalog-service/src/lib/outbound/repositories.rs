pub mod credential;

pub use credential::SqliteCredentialRepository;
