//! Authentication

mod errors;
mod models;
mod repository;
mod service;
mod token;
mod verifier;

pub use errors::*;
pub use models::*;
pub use repository::PgAuthRepository;
pub use service::*;
pub use token::*;
pub use verifier::TokenVerifier;
