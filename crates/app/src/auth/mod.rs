//! Authentication

mod errors;
mod models;
mod password;
mod repository;
mod service;
mod sign_up;
mod token;

pub use errors::*;
pub use models::*;
pub use password::{PasswordError, hash_password, verify_password};
pub use repository::PgAuthRepository;
pub use service::*;
pub use sign_up::*;
pub use token::*;
